//! Runtime configuration: command-line flags with environment fallbacks.

use crate::external::gateway::{
    GatewaySettings, DEFAULT_COUNTRIES_URL, DEFAULT_WEATHER_LANG, DEFAULT_WEATHER_URL,
};
use clap::Args;
use std::path::PathBuf;

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// SQLite database file. Defaults to <data dir>/geo-atlas/atlas.db.
    #[arg(long, env = "GEO_ATLAS_DB", global = true)]
    pub db: Option<PathBuf>,

    /// OpenWeatherMap API key. Weather lookups are refused without it.
    #[arg(long, env = "OPEN_WEATHER_API_KEY", hide_env_values = true, global = true)]
    pub weather_api_key: Option<String>,

    /// Locale for weather descriptions (OpenWeatherMap `lang`).
    #[arg(long, env = "WEATHER_LANG", default_value = DEFAULT_WEATHER_LANG, global = true)]
    pub weather_lang: String,

    /// REST Countries base URL.
    #[arg(long, env = "REST_COUNTRIES_URL", default_value = DEFAULT_COUNTRIES_URL, global = true)]
    pub countries_url: String,

    /// OpenWeatherMap base URL.
    #[arg(long, env = "OPEN_WEATHER_URL", default_value = DEFAULT_WEATHER_URL, global = true)]
    pub weather_url: String,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(default_db_path)
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            countries_url: self.countries_url.clone(),
            weather_url: self.weather_url.clone(),
            weather_api_key: self
                .weather_api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            weather_lang: self.weather_lang.clone(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("geo-atlas").join("atlas.db"))
        .unwrap_or_else(|| PathBuf::from("atlas.db"))
}
