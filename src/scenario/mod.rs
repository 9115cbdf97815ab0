//! Scenario description, path generation and scenario-level guidance.

pub mod params;
pub mod path;
pub mod presets;
pub mod recommend;

pub use params::{Direction, ScenarioParameters};
pub use path::{generate_price_path, PricePath, PricePoint};
