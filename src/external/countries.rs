//! Country metadata lookup (REST Countries v3.1).

use super::gateway::Gateway;
use super::transport::{Fetch, FetchError};
use super::translate;
use super::types::{CountryInfo, RestCountry};
use crate::error::{AtlasError, Result};
use tracing::{debug, warn};

impl<F: Fetch> Gateway<F> {
    /// Look up metadata for a (possibly Portuguese) country name.
    ///
    /// Error messages always quote `country_name` as given, not the
    /// translated form sent upstream.
    pub fn country_info(&self, country_name: &str) -> Result<CountryInfo> {
        let english = translate::to_english(country_name);
        debug!(input = country_name, translated = %english, "country info lookup");

        let url = format!(
            "{}/name/{}",
            self.settings.countries_url.trim_end_matches('/'),
            urlencoding::encode(&english),
        );

        let body = self.fetch.get_json(&url, &[]).map_err(|e| match e {
            FetchError::Status(404, _) => country_not_found(country_name),
            other => {
                warn!(country = country_name, error = %other, "country info lookup failed");
                AtlasError::Unknown(format!(
                    "failed to fetch info for country '{}': {}",
                    country_name, other
                ))
            }
        })?;

        let results: Vec<RestCountry> = serde_json::from_value(body).map_err(|e| {
            AtlasError::Unknown(format!(
                "failed to fetch info for country '{}': invalid response: {}",
                country_name, e
            ))
        })?;

        results
            .into_iter()
            .next()
            .map(CountryInfo::from)
            .ok_or_else(|| country_not_found(country_name))
    }
}

fn country_not_found(name: &str) -> AtlasError {
    AtlasError::NotFound(format!(
        "country '{}' not found; check the name and try again",
        name
    ))
}
