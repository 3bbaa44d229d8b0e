//! JSON REST API over the hierarchy store and the external gateway.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::store::{City, Continent, Country};
use handlers::*;

pub use handlers::ApiError;
pub use state::{AppState, SharedGateway};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/continents",
            get(list_all::<Continent>).post(create::<Continent>),
        )
        .route(
            "/continents/{id}",
            get(get_one::<Continent>)
                .put(update::<Continent>)
                .delete(delete::<Continent>),
        )
        .route("/countries", get(list_all::<Country>).post(create::<Country>))
        .route(
            "/countries/{id}",
            get(get_one::<Country>)
                .put(update::<Country>)
                .delete(delete::<Country>),
        )
        .route("/countries/continent/{id}", get(list_children::<Country>))
        .route("/countries/{id}/info", get(country_info_by_id))
        .route("/countries/info/name/{name}", get(country_info_by_name))
        .route("/cities", get(list_all::<City>).post(create::<City>))
        .route(
            "/cities/{id}",
            get(get_one::<City>).put(update::<City>).delete(delete::<City>),
        )
        .route("/cities/country/{id}", get(list_children::<City>))
        .route("/cities/continent/{id}", get(cities_by_continent))
        .route("/cities/{id}/weather", get(city_weather))
        .layer(
            TraceLayer::new_for_http()
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app = build_router(Arc::new(state));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("geo-atlas listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::gateway::testing::ScriptedFetch;
    use crate::external::transport::FetchError;
    use crate::external::{Fetch, Gateway, GatewaySettings};
    use crate::store::db;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(replies: Vec<Result<Value, FetchError>>, api_key: Option<&str>) -> Router {
        let settings = GatewaySettings {
            countries_url: "http://countries.test".into(),
            weather_url: "http://weather.test".into(),
            weather_api_key: api_key.map(str::to_string),
            ..GatewaySettings::default()
        };
        let fetch: Box<dyn Fetch> = Box::new(ScriptedFetch::new(replies));
        let state = AppState::new(db::open_in_memory().unwrap(), Gateway::with_fetch(fetch, settings));
        build_router(Arc::new(state))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Europa → França → Paris; returns the three ids.
    async fn seed(app: &Router) -> (i64, i64, i64) {
        let (_, continent) = send(
            app,
            Method::POST,
            "/continents",
            Some(json!({"name": "Europa", "description": "Velho continente"})),
        )
        .await;
        let (_, country) = send(
            app,
            Method::POST,
            "/countries",
            Some(json!({
                "name": "França", "population": 68000000,
                "official_language": "Francês", "currency": "Euro",
                "continent_id": continent["id"]
            })),
        )
        .await;
        let (_, city) = send(
            app,
            Method::POST,
            "/cities",
            Some(json!({
                "name": "Paris", "population": 2100000,
                "latitude": "48.8566", "longitude": "2.3522",
                "country_id": country["id"]
            })),
        )
        .await;
        (
            continent["id"].as_i64().unwrap(),
            country["id"].as_i64().unwrap(),
            city["id"].as_i64().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(vec![], None);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_crud_flow_with_parent_chain() {
        let app = app(vec![], None);
        let (_, _, city_id) = seed(&app).await;

        let (status, city) = send(&app, Method::GET, &format!("/cities/{city_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(city["name"], "Paris");
        assert_eq!(city["latitude"], "48.8566");
        assert_eq!(city["country"]["name"], "França");
        assert_eq!(city["country"]["continent"]["name"], "Europa");

        let (status, list) = send(&app, Method::GET, "/cities", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let app = app(vec![], None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/continents",
            Some(json!({"name": "Oceania"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Oceania");
        assert_eq!(body["description"], "");
    }

    #[tokio::test]
    async fn test_missing_parent_is_400() {
        let app = app(vec![], None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/countries",
            Some(json!({
                "name": "Brasil", "population": 1,
                "official_language": "Português", "currency": "Real",
                "continent_id": 99
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "continent 99 not found");
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let app = app(vec![], None);
        let (status, body) = send(&app, Method::POST, "/countries", Some(json!({"name": "Brasil"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("missing required fields"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = app(vec![], None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/continents",
            Some(json!({"name": 12})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_delete_guarded_then_allowed() {
        let app = app(vec![], None);
        let (continent_id, country_id, city_id) = seed(&app).await;

        let (status, _) = send(&app, Method::DELETE, &format!("/continents/{continent_id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, &format!("/countries/{country_id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for uri in [
            format!("/cities/{city_id}"),
            format!("/countries/{country_id}"),
            format!("/continents/{continent_id}"),
        ] {
            let (status, body) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::NO_CONTENT, "{uri}");
            assert_eq!(body, Value::Null);
        }

        let (status, _) = send(&app, Method::GET, &format!("/continents/{continent_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_json_400() {
        let app = app(vec![], None);
        for (method, uri) in [
            (Method::GET, "/cities/abc"),
            (Method::DELETE, "/continents/abc"),
            (Method::GET, "/countries/continent/x1"),
            (Method::GET, "/cities/abc/weather"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], 400, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_update_with_bad_id_is_json_400() {
        let app = app(vec![], None);
        let (status, body) = send(
            &app,
            Method::PUT,
            "/continents/abc",
            Some(json!({"name": "Europa"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_delete_missing_city_is_404() {
        let app = app(vec![], None);
        let (status, _) = send(&app, Method::DELETE, "/cities/12345", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let app = app(vec![], None);
        let (continent_id, ..) = seed(&app).await;
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/continents/{continent_id}"),
            Some(json!({"name": "Europe", "description": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], continent_id);
        assert_eq!(body["name"], "Europe");
    }

    #[tokio::test]
    async fn test_filtered_lists() {
        let app = app(vec![], None);
        let (continent_id, country_id, _) = seed(&app).await;

        let (_, countries) = send(&app, Method::GET, &format!("/countries/continent/{continent_id}"), None).await;
        assert_eq!(countries.as_array().unwrap().len(), 1);

        let (_, cities) = send(&app, Method::GET, &format!("/cities/country/{country_id}"), None).await;
        assert_eq!(cities.as_array().unwrap().len(), 1);

        let (_, cities) = send(&app, Method::GET, &format!("/cities/continent/{continent_id}"), None).await;
        assert_eq!(cities[0]["name"], "Paris");

        let (_, none) = send(&app, Method::GET, "/cities/continent/777", None).await;
        assert!(none.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_city_weather_uses_stored_names() {
        let weather = json!({
            "weather": [{"description": "chuva leve"}],
            "main": {"temp": 9.5, "humidity": 90},
            "wind": {"speed": 6.2},
            "sys": {"country": "FR"},
            "name": "Paris"
        });
        let app = app(
            vec![Err(FetchError::Status(404, String::new())), Ok(weather)],
            Some("key"),
        );
        let (_, _, city_id) = seed(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/cities/{city_id}/weather"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "by_city_and_country");
        assert_eq!(body["temperature"], 10);
        assert_eq!(body["condition"], "chuva leve");
    }

    #[tokio::test]
    async fn test_city_weather_without_key_is_500() {
        let app = app(vec![], None);
        let (_, _, city_id) = seed(&app).await;
        let (status, body) = send(&app, Method::GET, &format!("/cities/{city_id}/weather"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_weather_for_missing_city_is_404() {
        let app = app(vec![], Some("key"));
        let (status, _) = send(&app, Method::GET, "/cities/5/weather", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_country_info_by_name() {
        let app = app(
            vec![Ok(json!([{"name": {"common": "Germany"}, "capital": ["Berlin"]}]))],
            None,
        );
        let (status, body) = send(&app, Method::GET, "/countries/info/name/Alemanha", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Germany");
        assert_eq!(body["capital"], "Berlin");
        assert_eq!(body["currency"], "N/A");
    }

    #[tokio::test]
    async fn test_country_info_not_found_is_404() {
        let app = app(vec![Ok(json!([]))], None);
        let (status, body) = send(&app, Method::GET, "/countries/info/name/Wakanda", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Wakanda"));
    }

    #[tokio::test]
    async fn test_country_info_by_stored_id() {
        let app = app(
            vec![Ok(json!([{"name": {"common": "France"}, "capital": ["Paris"]}]))],
            None,
        );
        let (_, country_id, _) = seed(&app).await;
        let (status, body) = send(&app, Method::GET, &format!("/countries/{country_id}/info"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "France");
    }
}
