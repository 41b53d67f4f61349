use crate::errors::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const POPULAR_CITIES: [&str; 6] = [
    "Bagalkot",
    "Bangalore",
    "Mumbai",
    "Delhi",
    "Hyderabad",
    "Chennai",
];

pub fn default_city() -> &'static str {
    POPULAR_CITIES[0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub humidity: i64,
    pub wind_kph: i64,
    pub condition: String,
    pub icon_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    location: Option<ApiLocation>,
    current: Option<ApiCurrent>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: f64,
    wind_kph: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

impl WeatherReport {
    pub fn from_response(body: serde_json::Value) -> Result<Self, AppError> {
        let response: ApiResponse = serde_json::from_value(body)
            .map_err(|err| AppError::bad_gateway(format!("unexpected weather response: {err}")))?;

        if let Some(error) = response.error {
            debug!("weather service error: {error}");
            return Err(AppError::not_found("City not found"));
        }

        let (Some(location), Some(current)) = (response.location, response.current) else {
            return Err(AppError::bad_gateway("weather response is missing location or current"));
        };

        Ok(Self {
            city: location.name,
            temperature_c: current.temp_c.round() as i64,
            feels_like_c: current.feelslike_c.round() as i64,
            humidity: current.humidity.round() as i64,
            wind_kph: current.wind_kph.round() as i64,
            condition: current.condition.text,
            icon_url: absolute_icon_url(&current.condition.icon),
        })
    }
}

fn absolute_icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon.to_string()
    }
}

/// Client for the current-conditions endpoint. One request per lookup, no
/// timeout and no retry.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn current(&self, city: &str) -> Result<WeatherReport, AppError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::bad_request("city is required"));
        }
        if self.api_key.is_empty() {
            warn!("WEATHER_API_KEY is not set; the lookup will likely be rejected");
        }

        let url = format!("{}/current.json", self.base_url.trim_end_matches('/'));
        let body: serde_json::Value = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await?
            .json()
            .await?;

        WeatherReport::from_response(body)
    }
}
