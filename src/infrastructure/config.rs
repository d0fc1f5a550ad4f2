use crate::application::dispatcher::DEFAULT_QUIET_PERIOD;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub backend: BackendSettings,
    pub render: RenderSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderSettings {
    pub channel_index: i64,
    pub vmin: f64,
    pub vmax: f64,
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RenderSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    build_client_config("config/client")
}

/// Defaults, then the optional TOML file, then `ECHOGRAM__SECTION__KEY` variables.
pub fn build_client_config(file: &str) -> anyhow::Result<ClientConfig> {
    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://localhost:5001")?
        .set_default("backend.request_timeout_secs", 60)?
        .set_default("render.channel_index", 0)?
        .set_default("render.vmin", -80.0)?
        .set_default("render.vmax", -30.0)?
        .set_default("render.debounce_ms", DEFAULT_QUIET_PERIOD.as_millis() as u64)?
        .set_default("output.dir", "output")?
        .add_source(config::File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix("ECHOGRAM").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
