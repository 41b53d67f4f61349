use std::{env, path::PathBuf};

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub weather_api_key: String,
    pub weather_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8080),
            data_dir: resolve_data_dir(),
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            weather_api_url: env::var("WEATHER_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
        }
    }
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}
