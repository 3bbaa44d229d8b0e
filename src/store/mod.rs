//! Hierarchy store: continents own countries, countries own cities.
//!
//! # Invariants
//! - A country's `continent_id` and a city's `country_id` reference existing
//!   rows at write time.
//! - Rows with children cannot be deleted.
//! - `id` never changes after insert.

pub mod city;
pub mod continent;
pub mod country;
pub mod db;
pub mod repo;

pub use city::{City, CityInput};
pub use continent::{Continent, ContinentInput};
pub use country::{Country, CountryInput};
pub use repo::{Entity, Repository};
