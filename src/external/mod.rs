//! Third-party data sources: country metadata and current weather.
//!
//! Both lookups pass localized country names through [`translate`] before
//! they reach the English-keyed upstream APIs. Nothing is cached.

pub mod countries;
pub mod gateway;
pub mod translate;
pub mod transport;
pub mod types;
pub mod weather;

pub use gateway::{Gateway, GatewaySettings};
pub use transport::{Fetch, FetchError, UreqFetch};
pub use types::{CountryInfo, WeatherMethod, WeatherQuery, WeatherReport};
