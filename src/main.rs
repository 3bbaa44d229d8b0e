use clap::{Parser, Subcommand};
use geo_atlas::config::Config;
use geo_atlas::external::{Fetch, Gateway, UreqFetch, WeatherQuery};
use geo_atlas::server::{self, AppState};
use geo_atlas::store::db;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Geo Atlas: continent / country / city registry with live lookups.
///
/// Examples:
///   geo-atlas serve --port 3000
///   geo-atlas country-info Japão
///   geo-atlas weather --lat 48.8566 --lon 2.3522 --city Paris --country França
#[derive(Parser)]
#[command(name = "geo-atlas", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "GEO_ATLAS_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', env = "GEO_ATLAS_PORT", default_value_t = 3000)]
        port: u16,
    },

    /// Look up REST Countries data by (possibly localized) country name.
    CountryInfo {
        name: String,
    },

    /// Current weather, trying coordinates, then city+country, then city.
    Weather {
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: String,

        #[arg(long)]
        city: Option<String>,

        /// Country name; localized names are translated.
        #[arg(long)]
        country: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve { host, port } => serve(&cli.config, &host, port),
        Command::CountryInfo { name } => match lookup_gateway(&cli.config).country_info(&name) {
            Ok(details) => print_json(&details),
            Err(e) => fail(e),
        },
        Command::Weather { lat, lon, city, country } => {
            let mut query = WeatherQuery::new(&lat, &lon);
            if let Some(city) = city.as_deref() {
                query = query.with_city(city);
            }
            if let Some(country) = country.as_deref() {
                query = query.with_country(country);
            }
            match lookup_gateway(&cli.config).weather(&query) {
                Ok(report) => print_json(&report),
                Err(e) => fail(e),
            }
        }
    }
}

fn serve(config: &Config, host: &str, port: u16) {
    let conn = db::open(config.db_path()).unwrap_or_else(|e| fail(e));
    let fetch: Box<dyn Fetch> = Box::new(UreqFetch::default());
    let gateway = Gateway::with_fetch(fetch, config.gateway_settings());
    let state = AppState::new(conn, gateway);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
    if let Err(e) = runtime.block_on(server::start(host, port, state)) {
        fail(format!("server error on {}:{}: {}", host, port, e));
    }
}

fn lookup_gateway(config: &Config) -> Gateway {
    Gateway::new(config.gateway_settings())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("geo_atlas=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
