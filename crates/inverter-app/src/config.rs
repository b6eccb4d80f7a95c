use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use config_schema::RawConfig;

pub const CONFIG_ENV: &str = "INVERTER_CONFIG";

/// Reads the raw configuration from an explicit path, or from the path in
/// `INVERTER_CONFIG`. A `.json` extension selects JSON, anything else TOML.
pub fn load_raw_config(config_path: Option<&str>) -> Result<RawConfig> {
    let path = match config_path {
        Some(path) => path.to_string(),
        None => env::var(CONFIG_ENV)
            .with_context(|| format!("no config path given and {CONFIG_ENV} unset"))?,
    };

    let content = fs::read_to_string(&path).with_context(|| format!("read config file {path}"))?;
    let ext = Path::new(&path).extension().and_then(|value| value.to_str());

    let raw = match ext {
        Some("json") => serde_json::from_str(&content).context("parse json config")?,
        _ => toml::from_str(&content).context("parse toml config")?,
    };

    Ok(raw)
}
