use crate::extension::FRAME_INTERVAL;
use serde::Deserialize;
use std::fs;

fn default_settings_db() -> String {
    "settings.db".to_string()
}

fn default_tab_url() -> String {
    "https://www.linkedin.com/jobs/search/".to_string()
}

fn default_frame_interval_ms() -> u64 {
    FRAME_INTERVAL.as_millis() as u64
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub profile: String,
    pub resume: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_settings_db")]
    pub settings_db: String,
    /// Local path or http(s) URL of the results page to load.
    pub page: String,
    /// URL the loaded page is treated as being served from.
    #[serde(default = "default_tab_url")]
    pub tab_url: String,
    #[serde(default)]
    pub seed: Option<SeedConfig>,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default)]
    pub autofill_on_start: bool,
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
