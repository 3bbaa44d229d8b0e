//! Current-weather lookup (OpenWeatherMap) with the fallback chain:
//! coordinates → "city,country" → city only.

use super::gateway::Gateway;
use super::transport::{Fetch, FetchError};
use super::translate;
use super::types::{OwmCurrent, WeatherMethod, WeatherQuery, WeatherReport};
use crate::error::{AtlasError, Result};
use tracing::{debug, info, warn};

/// Search parameters for one step of the chain.
enum Lookup {
    Coordinates { lat: String, lon: String },
    Named(String),
}

impl Lookup {
    /// The step's precondition: `None` when the query lacks what the
    /// method needs.
    fn plan(method: WeatherMethod, query: &WeatherQuery) -> Option<Self> {
        let city = non_empty(query.city.as_deref());
        let country = non_empty(query.country.as_deref());
        match method {
            WeatherMethod::ByCoordinates => Some(Self::Coordinates {
                lat: query.latitude.trim().to_string(),
                lon: query.longitude.trim().to_string(),
            }),
            WeatherMethod::ByCityAndCountry => {
                let (city, country) = (city?, country?);
                Some(Self::Named(
                    format!("{},{}", city, translate::to_english(country)).to_lowercase(),
                ))
            }
            WeatherMethod::ByCityOnly => city.map(|c| Self::Named(c.to_lowercase())),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl<F: Fetch> Gateway<F> {
    /// Current weather for a location, trying each method of
    /// [`WeatherMethod::CHAIN`] in turn until one succeeds.
    pub fn weather(&self, query: &WeatherQuery) -> Result<WeatherReport> {
        let api_key = self
            .settings
            .weather_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AtlasError::Configuration("OpenWeatherMap API key is not configured".into())
            })?;

        let mut attempted: Vec<WeatherMethod> = Vec::with_capacity(WeatherMethod::CHAIN.len());

        for method in WeatherMethod::CHAIN {
            let Some(lookup) = Lookup::plan(method, query) else {
                continue;
            };
            attempted.push(method);
            debug!(%method, "weather attempt");

            match self.fetch_current(&lookup, api_key) {
                Ok(current) => {
                    let report = current.into_report(method);
                    info!(%method, city = %report.city, "weather resolved");
                    return Ok(report);
                }
                Err(FetchError::Status(401, msg)) => {
                    return Err(AtlasError::Unauthorized(format!(
                        "OpenWeatherMap API key is invalid or expired ({})",
                        msg
                    )));
                }
                Err(e) => warn!(%method, error = %e, "weather attempt failed"),
            }
        }

        if non_empty(query.city.as_deref()).is_none() {
            return Err(AtlasError::InvalidInput(
                "coordinates lookup failed and no city name was given to fall back on".into(),
            ));
        }

        let tried = attempted
            .iter()
            .map(WeatherMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Err(AtlasError::Unavailable(format!(
            "no weather data found for the given location; methods tried: {}",
            tried
        )))
    }

    fn fetch_current(&self, lookup: &Lookup, api_key: &str) -> std::result::Result<OwmCurrent, FetchError> {
        let url = format!("{}/weather", self.settings.weather_url.trim_end_matches('/'));
        let lang = self.settings.weather_lang.as_str();

        let body = match lookup {
            Lookup::Coordinates { lat, lon } => self.fetch.get_json(
                &url,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", api_key), ("units", "metric"), ("lang", lang)],
            ),
            Lookup::Named(q) => self.fetch.get_json(
                &url,
                &[("q", q.as_str()), ("appid", api_key), ("units", "metric"), ("lang", lang)],
            ),
        }?;

        serde_json::from_value(body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
