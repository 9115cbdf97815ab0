//! Rendering hints derived from parameter schemas.
//!
//! The engine does not render anything itself. This module only maps each
//! [`FieldSpec`] onto the kind of input control a front end should show, so
//! that every caller renders the same schema the same way.

use crate::core::schema::{ChoiceOption, DefaultContext, FieldKind, FieldSpec, ParameterSchema};
use crate::core::params::ParamValue;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Select,
    Checkbox,
    /// Slider; only offered for numeric fields bounded on both sides.
    Range,
    Number,
}

impl ControlType {
    pub fn for_field(field: &FieldSpec) -> Self {
        match field.kind {
            FieldKind::Choice => ControlType::Select,
            FieldKind::Boolean => ControlType::Checkbox,
            _ if field.min.is_some() && field.max.is_some() => ControlType::Range,
            _ => ControlType::Number,
        }
    }
}

/// One input control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormControl {
    pub name: &'static str,
    pub control: ControlType,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    /// Initial value, when the default can be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    /// Percentages are stored as fractions and shown as percents.
    pub percent: bool,
    pub readonly: bool,
}

impl FormControl {
    pub fn from_field(field: &FieldSpec, ctx: Option<&DefaultContext>) -> Self {
        Self {
            name: field.name,
            control: ControlType::for_field(field),
            label: field.label,
            description: field.description,
            initial: field.default.resolve(ctx),
            min: field.min,
            max: field.max,
            step: field.step,
            options: field.options.clone(),
            percent: field.kind == FieldKind::Percentage,
            readonly: field.readonly,
        }
    }
}

/// Controls for every field of `schema`, in declaration order.
pub fn form_controls(schema: &ParameterSchema, ctx: Option<&DefaultContext>) -> Vec<FormControl> {
    schema
        .fields()
        .iter()
        .map(|field| FormControl::from_field(field, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::ExitKind;
    use crate::scenario::params::scenario_schema;
    use crate::strategy::StrategyKind;

    fn control<'a>(controls: &'a [FormControl], name: &str) -> &'a FormControl {
        controls.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_scenario_controls() {
        let controls = form_controls(&scenario_schema(), None);
        assert_eq!(control(&controls, "direction").control, ControlType::Select);
        assert_eq!(control(&controls, "direction").options.len(), 3);
        assert_eq!(control(&controls, "annual_volatility").control, ControlType::Range);
        assert!(control(&controls, "annual_volatility").percent);
        assert_eq!(control(&controls, "seed").control, ControlType::Number);
        assert_eq!(control(&controls, "seed").initial, None);
    }

    #[test]
    fn test_strategy_controls_resolve_against_context() {
        let ctx = DefaultContext {
            spot_price: 20.0,
            volatility: 0.15,
            time_horizon_years: 0.5,
        };
        let controls = form_controls(&StrategyKind::LongCall.schema(), Some(&ctx));
        let strike = control(&controls, "strike_price");
        assert_eq!(strike.control, ControlType::Number);
        assert_eq!(strike.initial, Some(ParamValue::Number(20.0)));

        let premium = control(&controls, "premium_per_contract");
        assert!(premium.readonly);
        assert_eq!(premium.initial, None);

        assert_eq!(control(&controls, "volatility").initial, Some(ParamValue::Number(0.15)));
    }

    #[test]
    fn test_hold_to_expiry_has_no_controls() {
        assert!(form_controls(&ExitKind::HoldToExpiry.schema(), None).is_empty());
    }
}
