//! Gateway to the third-party country and weather services.

use super::transport::{Fetch, UreqFetch};

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_WEATHER_LANG: &str = "pt_br";

/// Upstream endpoints and credentials.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub countries_url: String,
    pub weather_url: String,
    /// OpenWeatherMap key. Weather lookups fail with a configuration error
    /// while this is unset.
    pub weather_api_key: Option<String>,
    /// Locale for weather descriptions.
    pub weather_lang: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.into(),
            weather_url: DEFAULT_WEATHER_URL.into(),
            weather_api_key: None,
            weather_lang: DEFAULT_WEATHER_LANG.into(),
        }
    }
}

/// Stateless: every call is a fresh upstream query.
pub struct Gateway<F = UreqFetch> {
    pub(super) fetch: F,
    pub(super) settings: GatewaySettings,
}

impl Gateway<UreqFetch> {
    pub fn new(settings: GatewaySettings) -> Self {
        Self::with_fetch(UreqFetch::default(), settings)
    }
}

impl<F: Fetch> Gateway<F> {
    pub fn with_fetch(fetch: F, settings: GatewaySettings) -> Self {
        Self { fetch, settings }
    }
}
