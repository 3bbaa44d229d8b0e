//! Geo Atlas: a continent → country → city registry backed by SQLite,
//! enriched with REST Countries metadata and OpenWeatherMap conditions.

pub mod config;
pub mod error;
pub mod external;
pub mod server;
pub mod store;

pub use error::{AtlasError, Result};
