//! Gateway inputs and outputs, plus the upstream wire formats they are
//! projected from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder for fields the metadata service leaves out.
pub const NOT_AVAILABLE: &str = "N/A";

// ─── Country info ───────────────────────────────────────────────

/// Normalized country metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInfo {
    /// Canonical common name reported by the service.
    pub name: String,
    pub flag: String,
    pub capital: String,
    pub area: f64,
    pub population: u64,
    pub currency: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestCountry {
    pub name: RestCountryName,
    #[serde(default)]
    pub flags: RestFlags,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub currencies: BTreeMap<String, RestCurrency>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestCountryName {
    pub common: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RestFlags {
    #[serde(default)]
    pub png: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestCurrency {
    pub name: String,
}

impl From<RestCountry> for CountryInfo {
    fn from(c: RestCountry) -> Self {
        Self {
            name: c.name.common,
            flag: c.flags.png,
            capital: c
                .capital
                .into_iter()
                .next()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            area: c.area,
            population: c.population,
            currency: join_or_na(c.currencies.into_values().map(|cur| cur.name)),
            language: join_or_na(c.languages.into_values()),
        }
    }
}

fn join_or_na(names: impl Iterator<Item = String>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

// ─── Weather ────────────────────────────────────────────────────

/// Which step of the fallback chain produced a weather report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherMethod {
    ByCoordinates,
    ByCityAndCountry,
    ByCityOnly,
}

impl WeatherMethod {
    /// Attempt order.
    pub const CHAIN: [WeatherMethod; 3] =
        [Self::ByCoordinates, Self::ByCityAndCountry, Self::ByCityOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByCoordinates => "by_coordinates",
            Self::ByCityAndCountry => "by_city_and_country",
            Self::ByCityOnly => "by_city_only",
        }
    }
}

impl fmt::Display for WeatherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to a weather lookup.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub latitude: String,
    pub longitude: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl WeatherQuery {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            city: None,
            country: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Normalized current-weather report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Degrees Celsius, rounded to the nearest whole degree.
    pub temperature: i64,
    pub condition: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
    pub city: String,
    pub country_code: String,
    pub method: WeatherMethod,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmCurrent {
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    #[serde(default)]
    pub wind: OwmWind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: OwmSys,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmCondition {
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OwmWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OwmSys {
    #[serde(default)]
    pub country: String,
}

impl OwmCurrent {
    pub(crate) fn into_report(self, method: WeatherMethod) -> WeatherReport {
        WeatherReport {
            temperature: self.main.temp.round() as i64,
            condition: self
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_default(),
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            city: self.name,
            country_code: self.sys.country,
            method,
        }
    }
}
