use serde::{Deserialize, Serialize};
use std::fmt;

/// Year fraction used for the one-day theta roll.
const THETA_DAY: f64 = 1.0 / 365.0;
/// Relative spot bump used for the delta difference.
const DELTA_BUMP: f64 = 0.01;

/// Right conveyed by a European option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff if exercised at `spot`.
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Standard normal cumulative distribution function.
///
/// Abramowitz & Stegun 7.1.26 rational approximation of `erf`, absolute
/// error below 1.5e-7. Symmetric by construction: `norm_cdf(x) + norm_cdf(-x)`
/// is 1 for every `x != 0`.
pub fn norm_cdf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Black-Scholes value of a European option.
///
/// At or past expiry the option is worth its intrinsic value. When the
/// diffusion term `sigma * sqrt(T)` vanishes the price collapses to the
/// discounted forward payoff instead of dividing by zero.
///
/// # Examples
///
/// ```
/// use fx_hedge_sim::pricing::{price, OptionType};
///
/// assert_eq!(price(20.0, 18.0, 0.0, 0.05, 0.12, OptionType::Call), 2.0);
/// let atm = price(18.5, 18.5, 0.25, 0.05, 0.12, OptionType::Call);
/// assert!(atm > 0.0 && atm < 18.5);
/// ```
pub fn price(
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> f64 {
    if time_to_expiry <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let discounted_strike = strike * (-risk_free_rate * time_to_expiry).exp();
    let vol_sqrt_t = volatility * time_to_expiry.sqrt();
    if vol_sqrt_t < 1e-12 {
        return option_type.intrinsic(spot, discounted_strike);
    }

    let d1 = ((spot / strike).ln() + (risk_free_rate + 0.5 * volatility * volatility) * time_to_expiry)
        / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// Price plus finite-difference sensitivities.
///
/// These are numerical approximations for attribution, not exact
/// derivatives: `delta` is a central difference with spot bumped by ±1%,
/// `theta` is the change in price from rolling one calendar day (1/365 year)
/// forward, clamped at expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Greeks {
    pub price: f64,
    pub delta: f64,
    pub theta: f64,
}

/// Compute [`Greeks`] for a European option.
pub fn greeks(
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> Greeks {
    let value = |s: f64, t: f64| price(s, strike, t, risk_free_rate, volatility, option_type);

    let base = value(spot, time_to_expiry);

    let bump = spot * DELTA_BUMP;
    let delta = if bump > 0.0 {
        (value(spot + bump, time_to_expiry) - value(spot - bump, time_to_expiry)) / (2.0 * bump)
    } else {
        0.0
    };

    let tomorrow = (time_to_expiry - THETA_DAY).max(0.0);
    let theta = value(spot, tomorrow) - base;

    Greeks {
        price: base,
        delta,
        theta,
    }
}
