//! Closed-form option valuation.

pub mod black_scholes;

pub use black_scholes::{greeks, norm_cdf, price, Greeks, OptionType};
