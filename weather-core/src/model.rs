use serde::{Deserialize, Serialize};

/// A place returned by the location search endpoint.
///
/// The forecast endpoint embeds the same shape without an `id`, so it is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl Location {
    /// "Name, Country", as shown in headers and search rows.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub humidity: u8,
    #[serde(default)]
    pub feelslike_c: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub avgtemp_c: f64,
    #[serde(default)]
    pub maxtemp_c: Option<f64>,
    #[serde(default)]
    pub mintemp_c: Option<f64>,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    #[serde(default)]
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date as `YYYY-MM-DD`, local to the forecast location.
    pub date: String,
    pub day: DaySummary,
    pub astro: Astro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

/// Full current + forecast payload for one location.
///
/// A new snapshot always replaces the previous one; nothing is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

impl WeatherSnapshot {
    /// Sunrise of the first forecast day, if any day is present.
    pub fn first_sunrise(&self) -> Option<&str> {
        self.forecast.forecastday.first().map(|d| d.astro.sunrise.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST_JSON: &str = r#"{
        "location": {"name": "Jalna", "region": "Maharashtra", "country": "India",
                     "lat": 19.83, "lon": 75.88, "tz_id": "Asia/Kolkata"},
        "current": {"temp_c": 31.2, "condition": {"text": "Sunny", "code": 1000},
                    "wind_kph": 14.4, "humidity": 28, "feelslike_c": 30.1,
                    "last_updated": "2024-03-04 14:15"},
        "forecast": {"forecastday": [
            {"date": "2024-03-04",
             "day": {"avgtemp_c": 27.5, "maxtemp_c": 34.0, "mintemp_c": 19.2,
                     "condition": {"text": "Sunny"}},
             "astro": {"sunrise": "06:52 AM", "sunset": "06:40 PM"},
             "hour": []}
        ]}
    }"#;

    #[test]
    fn parses_forecast_payload_and_ignores_unknown_fields() {
        let snap: WeatherSnapshot = serde_json::from_str(FORECAST_JSON).unwrap();

        assert_eq!(snap.location.display_name(), "Jalna, India");
        assert_eq!(snap.location.id, None);
        assert_eq!(snap.current.humidity, 28);
        assert_eq!(snap.current.condition.text, "Sunny");
        assert_eq!(snap.forecast.forecastday.len(), 1);
        assert_eq!(snap.first_sunrise(), Some("06:52 AM"));
    }

    #[test]
    fn parses_search_rows() {
        let rows = r#"[{"id": 2801268, "name": "London", "region": "City of London, Greater London",
                        "country": "United Kingdom", "lat": 51.52, "lon": -0.11, "url": "london-city-of-london"}]"#;
        let locs: Vec<Location> = serde_json::from_str(rows).unwrap();

        assert_eq!(locs[0].id, Some(2801268));
        assert_eq!(locs[0].display_name(), "London, United Kingdom");
    }

    #[test]
    fn first_sunrise_is_none_without_days() {
        let mut snap: WeatherSnapshot = serde_json::from_str(FORECAST_JSON).unwrap();
        snap.forecast.forecastday.clear();
        assert_eq!(snap.first_sunrise(), None);
    }
}
