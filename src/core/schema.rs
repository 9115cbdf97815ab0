//! Declarative parameter schemas.
//!
//! Every configurable object in the engine (scenario, strategy, exit policy)
//! describes its inputs as a [`ParameterSchema`]. The same three operations
//! apply to all of them: validate a record, fill a partial record with
//! defaults, and expose field metadata for a rendering layer.

use crate::core::error::{FieldErrors, SimulationError};
use crate::core::params::{ParamRecord, ParamValue};
use serde::Serialize;

/// How a field's value is interpreted and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Percentage,
    Range,
    Choice,
    Boolean,
    Currency,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::Number | FieldKind::Percentage | FieldKind::Range | FieldKind::Currency
        )
    }
}

/// One entry of an enumerated field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub value: ParamValue,
    pub label: &'static str,
}

/// Values a default may resolve against at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultContext {
    /// Current spot price of the underlying.
    pub spot_price: f64,
    /// Annual volatility assumed by the scenario.
    pub volatility: f64,
    /// Full horizon of the position, in years.
    pub time_horizon_years: f64,
}

/// Where a field's default comes from.
///
/// Most defaults are literals, but strikes and volatilities default relative
/// to the scenario the position is opened in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum DefaultRule {
    /// No default; the field stays absent.
    Unset,
    Fixed(ParamValue),
    /// The current spot price (at-the-money).
    Spot,
    /// A fraction of the current spot price.
    SpotFraction(f64),
    /// The scenario's annual volatility.
    ScenarioVolatility,
    /// Derived by the owning catalog entry from other fields.
    Computed,
}

impl DefaultRule {
    /// Resolve this rule. Context-relative rules need a context.
    pub fn resolve(&self, ctx: Option<&DefaultContext>) -> Option<ParamValue> {
        match self {
            DefaultRule::Unset | DefaultRule::Computed => None,
            DefaultRule::Fixed(v) => Some(v.clone()),
            DefaultRule::Spot => ctx.map(|c| ParamValue::Number(c.spot_price)),
            DefaultRule::SpotFraction(f) => ctx.map(|c| ParamValue::Number(c.spot_price * f)),
            DefaultRule::ScenarioVolatility => ctx.map(|c| ParamValue::Number(c.volatility)),
        }
    }
}

/// Additional validation run against a present field value.
pub type FieldCheck = fn(&ParamValue) -> Option<String>;

/// Metadata describing one parameter.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub default: DefaultRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    pub readonly: bool,
    #[serde(skip)]
    pub check: Option<FieldCheck>,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind, label: &'static str) -> Self {
        Self {
            name,
            kind,
            label,
            description: None,
            default: DefaultRule::Unset,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            readonly: false,
            check: None,
        }
    }

    pub fn description(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }

    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = DefaultRule::Fixed(value.into());
        self
    }

    pub fn default_rule(mut self, rule: DefaultRule) -> Self {
        self.default = rule;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn option(mut self, value: impl Into<ParamValue>, label: &'static str) -> Self {
        self.options.push(ChoiceOption {
            value: value.into(),
            label,
        });
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn check(mut self, check: FieldCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Validate a present value against this field's declaration.
    pub fn validate_value(&self, value: &ParamValue) -> Option<String> {
        if self.kind.is_numeric() {
            match value.as_f64() {
                Some(n) if n.is_finite() => {}
                _ => return Some("Must be a number".to_string()),
            }
        }
        if self.kind == FieldKind::Boolean && value.as_bool().is_none() {
            return Some("Must be true or false".to_string());
        }
        if self.kind == FieldKind::Choice && !self.options.iter().any(|o| same_value(&o.value, value)) {
            let allowed: Vec<String> = self.options.iter().map(|o| o.value.to_string()).collect();
            return Some(format!("Must be one of: {}", allowed.join(", ")));
        }

        if let Some(message) = self.check.and_then(|check| check(value)) {
            return Some(message);
        }

        let n = value.as_f64()?;
        if let Some(min) = self.min {
            if n < min {
                return Some(format!("Must be at least {}", min));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Some(format!("Must be at most {}", max));
            }
        }
        None
    }
}

fn same_value(a: &ParamValue, b: &ParamValue) -> bool {
    match (a, b) {
        (ParamValue::Number(x), ParamValue::Number(y)) => (x - y).abs() < 1e-12,
        _ => a == b,
    }
}

/// Outcome of validating a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: FieldErrors,
}

impl ValidationResult {
    pub fn from_errors(errors: FieldErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Merge another result into this one.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.valid = self.errors.is_empty();
        self
    }

    pub fn into_result(self, target: &str) -> Result<(), SimulationError> {
        if self.valid {
            Ok(())
        } else {
            Err(SimulationError::invalid(target, self.errors))
        }
    }
}

/// An ordered set of field declarations.
///
/// # Examples
///
/// ```
/// use fx_hedge_sim::core::params::ParamRecord;
/// use fx_hedge_sim::core::schema::{FieldKind, FieldSpec, ParameterSchema};
///
/// let schema = ParameterSchema::new(vec![
///     FieldSpec::new("rate", FieldKind::Percentage, "Rate")
///         .default_value(0.05)
///         .min(0.0)
///         .max(0.20),
/// ]);
///
/// assert!(!schema.validate(&ParamRecord::new().with("rate", 0.5)).valid);
/// let filled = schema.fill_defaults(&ParamRecord::new(), None);
/// assert_eq!(filled.number("rate"), Some(0.05));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    fields: Vec<FieldSpec>,
}

impl ParameterSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every present field. Absent fields pass; they take defaults later.
    /// Fields not declared by the schema are ignored.
    pub fn validate(&self, record: &ParamRecord) -> ValidationResult {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Some(value) = record.get(field.name) {
                if let Some(message) = field.validate_value(value) {
                    errors.insert(field.name, message);
                }
            }
        }
        ValidationResult::from_errors(errors)
    }

    /// Return a copy of `partial` with every absent field set from its default
    /// rule. `Computed` and unresolvable rules leave the field absent.
    pub fn fill_defaults(&self, partial: &ParamRecord, ctx: Option<&DefaultContext>) -> ParamRecord {
        let mut filled = partial.clone();
        for field in &self.fields {
            if filled.contains(field.name) {
                continue;
            }
            if let Some(value) = field.default.resolve(ctx) {
                filled.set(field.name, value);
            }
        }
        filled
    }
}
