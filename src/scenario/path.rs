//! Synthetic price paths under geometric Brownian motion.

use crate::scenario::params::ScenarioParameters;
use log::debug;
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

/// Seeded linear-congruential generator.
///
/// Deliberately simple and non-cryptographic. The constants reproduce the
/// classic `(seed * 9301 + 49297) % 233280` sequence, so seeded paths stay
/// bit-compatible with earlier simulation runs; changing them changes every
/// seeded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    const MULTIPLIER: u128 = 9301;
    const INCREMENT: u128 = 49297;
    const MODULUS: u128 = 233_280;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next sample in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        let next = (self.state as u128 * Self::MULTIPLIER + Self::INCREMENT) % Self::MODULUS;
        self.state = next as u64;
        self.state as f64 / Self::MODULUS as f64
    }
}

enum UniformSource {
    Seeded(Lcg),
    Entropy(rand::rngs::ThreadRng),
}

impl UniformSource {
    fn next_uniform(&mut self) -> f64 {
        match self {
            UniformSource::Seeded(lcg) => lcg.next_uniform(),
            UniformSource::Entropy(rng) => rng.gen::<f64>(),
        }
    }
}

/// Price of the underlying on one simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub day: usize,
    pub price: f64,
}

/// Ordered daily prices, day 0 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PricePath {
    points: Vec<PricePoint>,
}

impl PricePath {
    /// Build a path from daily prices, numbering days from zero.
    ///
    /// # Panics
    ///
    /// Panics if `prices` is empty or contains a non-positive price.
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let points: Vec<PricePoint> = prices
            .into_iter()
            .enumerate()
            .map(|(day, price)| {
                assert!(price > 0.0, "Path prices must be positive, got {} on day {}", price, day);
                PricePoint { day, price }
            })
            .collect();
        assert!(!points.is_empty(), "A price path needs at least day 0");
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of simulated days after day 0.
    pub fn trading_days(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn initial_price(&self) -> f64 {
        self.points[0].price
    }

    pub fn final_price(&self) -> f64 {
        self.points[self.points.len() - 1].price
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Descriptive statistics of the path. `dt` is the step length in years.
    pub fn summary(&self, dt: f64) -> PathSummary {
        let initial = self.initial_price();
        let final_price = self.final_price();

        let mut peak = initial;
        let mut max_drawdown: f64 = 0.0;
        for price in self.prices() {
            peak = peak.max(price);
            max_drawdown = max_drawdown.max((peak - price) / peak);
        }

        let returns: Vec<f64> = self
            .points
            .windows(2)
            .map(|w| (w[1].price / w[0].price).ln())
            .collect();
        let realized_volatility = if returns.len() > 1 && dt > 0.0 {
            let n = returns.len() as f64;
            let mean = returns.iter().sum::<f64>() / n;
            let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            (variance / dt).sqrt()
        } else {
            0.0
        };

        PathSummary {
            final_price,
            total_return: (final_price - initial) / initial,
            max_drawdown,
            realized_volatility,
        }
    }
}

/// Headline statistics of a simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathSummary {
    pub final_price: f64,
    /// Fractional change from day 0 to the last day.
    pub total_return: f64,
    /// Largest peak-to-trough decline, as a fraction of the peak.
    pub max_drawdown: f64,
    /// Annualised standard deviation of daily log returns.
    pub realized_volatility: f64,
}

/// Simulate one price path for `params`.
///
/// Each day draws two uniforms, turns them into a standard normal with the
/// Box-Muller transform and applies the exact GBM step
/// `S <- S * exp((mu - sigma^2/2) dt + sigma sqrt(dt) z)`.
///
/// With a seed the output is bit-identical across runs; without one it is
/// drawn from the thread-local entropy source.
pub fn generate_price_path(params: &ScenarioParameters) -> PricePath {
    let source = match params.seed() {
        Some(seed) => UniformSource::Seeded(Lcg::new(seed)),
        None => UniformSource::Entropy(rand::thread_rng()),
    };
    debug!(
        "generating {} day path for {} (seed: {:?})",
        params.trading_days(),
        params.currency_pair(),
        params.seed()
    );
    simulate_gbm(params, source)
}

fn simulate_gbm(params: &ScenarioParameters, mut source: UniformSource) -> PricePath {
    let days = params.trading_days();
    let mut points = Vec::with_capacity(days + 1);
    points.push(PricePoint {
        day: 0,
        price: params.initial_price(),
    });
    if days == 0 {
        return PricePath { points };
    }

    let dt = params.dt();
    let sigma = params.annual_volatility();
    let drift_term = (params.drift() - 0.5 * sigma * sigma) * dt;
    let diffusion = sigma * dt.sqrt();

    let mut price = params.initial_price();
    for day in 1..=days {
        // ln(0) would send the path to zero or infinity
        let u1 = source.next_uniform().max(f64::MIN_POSITIVE);
        let u2 = source.next_uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();

        price *= (drift_term + diffusion * z).exp();
        points.push(PricePoint { day, price });
    }

    PricePath { points }
}
