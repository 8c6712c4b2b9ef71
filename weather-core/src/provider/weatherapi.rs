use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    model::{Location, WeatherSnapshot},
};

use super::WeatherProvider;

/// Client for weatherapi.com's `search.json` and `forecast.json` endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%endpoint, status = status.as_u16(), "weatherapi request failed");
            // weatherapi wraps most failures in {"error": {"code", "message"}}.
            if let Ok(envelope) = serde_json::from_str::<WaErrorEnvelope>(&body) {
                return Err(ApiError::Provider {
                    code: envelope.error.code,
                    message: envelope.error.message,
                });
            }
            return Err(ApiError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorDetail,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        tracing::debug!(%query, "searching locations");
        self.get_json("search.json", &[("q", query)]).await
    }

    async fn fetch_forecast(
        &self,
        city_name: &str,
        days: u8,
    ) -> Result<WeatherSnapshot, ApiError> {
        tracing::debug!(city = %city_name, days, "fetching forecast");
        let days = days.to_string();
        let snapshot: WeatherSnapshot = self
            .get_json(
                "forecast.json",
                &[("q", city_name), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;

        if snapshot.forecast.forecastday.is_empty() {
            return Err(ApiError::EmptyResult);
        }

        Ok(snapshot)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body(days: usize) -> serde_json::Value {
        let forecastday: Vec<_> = (0..days)
            .map(|i| {
                serde_json::json!({
                    "date": format!("2024-03-{:02}", 4 + i),
                    "day": {"avgtemp_c": 25.0 + i as f64, "condition": {"text": "Sunny"}},
                    "astro": {"sunrise": "06:52 AM", "sunset": "06:40 PM"}
                })
            })
            .collect();

        serde_json::json!({
            "location": {"name": "Jalna", "region": "Maharashtra", "country": "India",
                         "lat": 19.83, "lon": 75.88},
            "current": {"temp_c": 31.0, "condition": {"text": "Sunny"},
                        "wind_kph": 11.2, "humidity": 30},
            "forecast": {"forecastday": forecastday}
        })
    }

    #[tokio::test]
    async fn fetch_forecast_sends_key_city_and_days() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "Jalna"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7)))
            .expect(1)
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), server.uri());
        let snap = provider.fetch_forecast("Jalna", 7).await.unwrap();

        assert_eq!(snap.location.name, "Jalna");
        assert_eq!(snap.forecast.forecastday.len(), 7);
        assert_eq!(snap.forecast.forecastday[6].date, "2024-03-10");
    }

    #[tokio::test]
    async fn fetch_locations_returns_candidates_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "Lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "London", "region": "Greater London", "country": "United Kingdom",
                 "lat": 51.52, "lon": -0.11, "url": "london"},
                {"id": 2, "name": "Londrina", "region": "Parana", "country": "Brazil",
                 "lat": -23.3, "lon": -51.15, "url": "londrina"}
            ])))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), format!("{}/", server.uri()));
        let locs = provider.fetch_locations("Lon").await.unwrap();

        let names: Vec<_> = locs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["London", "Londrina"]);
    }

    #[tokio::test]
    async fn provider_error_envelope_is_decoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), server.uri());
        let err = provider.fetch_forecast("Nowhere", 7).await.unwrap_err();

        match err {
            ApiError::Provider { code, message } => {
                assert_eq!(code, 1006);
                assert_eq!(message, "No matching location found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_becomes_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), server.uri());
        let err = provider.fetch_locations("Lon").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), server.uri());
        let err = provider.fetch_forecast("Jalna", 7).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn forecast_without_days_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(0)))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), server.uri());
        let err = provider.fetch_forecast("Jalna", 7).await.unwrap_err();

        assert!(matches!(err, ApiError::EmptyResult));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Grab a free port, then release it so nothing is listening there.
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let provider = WeatherApiProvider::with_base_url("KEY".into(), format!("http://{addr}"));
        let err = provider.fetch_locations("Lon").await.unwrap_err();

        assert!(err.is_network());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
