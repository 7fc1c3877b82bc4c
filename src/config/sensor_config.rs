use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;

use crate::errors::{ConfigError, ConfigResult};

/// Root configuration struct expecting `[[sensor]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct SensorConfig {
    #[serde(rename = "sensor", default)]
    pub sensors: Vec<SensorEntry>,
}

/// One sensor entry, matching each `[[sensor]]` section.
///
/// Everything besides `name` and `model` is kept as a raw table and decoded
/// by the model's own schema.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorEntry {
    pub name: String,
    pub model: String,
    #[serde(flatten)]
    pub attributes: toml::Table,
}

impl SensorEntry {
    /// Decode the model-specific attributes into `T`
    pub fn attributes<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        let parsed = toml::Value::Table(self.attributes.clone()).try_into()?;
        Ok(parsed)
    }
}

/// Loads config from TOML file
pub fn load_sensor_config(path: &str) -> ConfigResult<SensorConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    parse_sensor_config(&content)
}

pub fn parse_sensor_config(content: &str) -> ConfigResult<SensorConfig> {
    let parsed: SensorConfig = toml::from_str(content)?;
    Ok(parsed)
}
