pub mod currency;
pub mod error;
pub mod params;
pub mod schema;
