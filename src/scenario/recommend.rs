use crate::scenario::params::{Direction, ScenarioParameters};
use crate::strategy::StrategyKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A strategy suggested for a scenario, with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRecommendation {
    pub strategy: StrategyKind,
    pub reason: String,
    pub confidence: Confidence,
}

impl StrategyRecommendation {
    fn new(strategy: StrategyKind, reason: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            strategy,
            reason: reason.into(),
            confidence,
        }
    }
}

/// Suggest strategies that fit the scenario's view.
///
/// Each strategy appears at most once; when several rules propose the same
/// strategy the first (most specific) reason is kept.
pub fn recommend(params: &ScenarioParameters) -> Vec<StrategyRecommendation> {
    let direction = params.direction();
    let magnitude = params.expected_magnitude();
    let volatility = params.annual_volatility();

    let mut candidates = Vec::new();

    if direction == Direction::Down && magnitude > 0.10 {
        candidates.push(StrategyRecommendation::new(
            StrategyKind::ProtectivePut,
            format!("Hedge against {:.0}% decline", magnitude * 100.0),
            Confidence::High,
        ));
        candidates.push(StrategyRecommendation::new(
            StrategyKind::LongPut,
            "Profit from expected decline",
            Confidence::Medium,
        ));
    }

    if volatility > 0.20 {
        let confidence = if direction == Direction::Neutral {
            Confidence::High
        } else {
            Confidence::Medium
        };
        candidates.push(StrategyRecommendation::new(
            StrategyKind::LongStraddle,
            format!("High volatility ({:.0}%) favors straddles", volatility * 100.0),
            confidence,
        ));
    }

    if direction == Direction::Up && magnitude > 0.08 {
        candidates.push(StrategyRecommendation::new(
            StrategyKind::LongCall,
            "Benefit from expected appreciation",
            Confidence::Medium,
        ));
    }

    if direction == Direction::Down || magnitude > 0.15 {
        candidates.push(StrategyRecommendation::new(
            StrategyKind::ProtectivePut,
            "Conservative downside protection",
            Confidence::High,
        ));
    }

    let mut recommendations: Vec<StrategyRecommendation> = Vec::new();
    for candidate in candidates {
        if !recommendations.iter().any(|r| r.strategy == candidate.strategy) {
            recommendations.push(candidate);
        }
    }
    recommendations
}
