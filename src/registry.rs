use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::bus::{BusMap, I2CBus};
use crate::config::{SensorConfig, SensorEntry};
use crate::errors::{ConfigError, ConfigResult, RegistryError, RegistryResult};
use crate::sensors::{Sensor, SensorFactory};

/// Sensor models known to the host, keyed by model name.
///
/// Nothing registers itself: the host builds a registry at startup, usually
/// with [`Registry::with_builtin_models`], and adds its own factories.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<&'static str, &'static dyn SensorFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every model enabled through cargo features
    pub fn with_builtin_models() -> Self {
        let mut registry = Self::new();
        for factory in crate::sensors::BUILTIN_FACTORIES {
            registry.factories.insert(factory.model(), *factory);
        }
        registry
    }

    pub fn register(&mut self, factory: &'static dyn SensorFactory) -> RegistryResult<()> {
        let model = factory.model();
        if self.factories.contains_key(model) {
            return Err(RegistryError::DuplicateModel {
                model: model.to_string(),
            });
        }
        self.factories.insert(model, factory);
        Ok(())
    }

    /// Registered model names, sorted
    pub fn models(&self) -> Vec<&'static str> {
        let mut models: Vec<_> = self.factories.keys().copied().collect();
        models.sort_unstable();
        models
    }

    pub fn create(&self, entry: &SensorEntry, buses: &mut BusMap) -> RegistryResult<Arc<dyn Sensor>> {
        let factory = self
            .factories
            .get(entry.model.as_str())
            .ok_or_else(|| RegistryError::UnsupportedModel {
                model: entry.model.clone(),
            })?;
        factory.create(entry, buses)
    }

    /// Build every configured sensor. Stops at the first entry that fails.
    pub fn init_all(
        &self,
        sensor_config: &SensorConfig,
        buses: &mut BusMap,
    ) -> RegistryResult<Vec<Arc<dyn Sensor>>> {
        info!("[registry] initializing {} sensors...", sensor_config.sensors.len());
        let mut sensors = Vec::with_capacity(sensor_config.sensors.len());
        for entry in sensor_config.sensors.iter() {
            let sensor = self.create(entry, buses)?;
            info!("[registry] registered sensor: name={} model={}", entry.name, entry.model);
            sensors.push(sensor);
        }
        Ok(sensors)
    }
}

/// Decode and validate an entry's attributes
pub(crate) fn entry_config<T: DeserializeOwned>(
    entry: &SensorEntry,
    validate: impl FnOnce(&T) -> ConfigResult<()>,
) -> RegistryResult<T> {
    let config_error = |source: ConfigError| RegistryError::Config {
        sensor: entry.name.clone(),
        source,
    };
    let config: T = entry.attributes().map_err(config_error)?;
    validate(&config).map_err(config_error)?;
    Ok(config)
}

pub(crate) fn resolve_address(entry: &SensorEntry, configured: Option<u8>, default: u8) -> u8 {
    configured.unwrap_or_else(|| {
        warn!("[{}] using default i2c address {:#04x}", entry.name, default);
        default
    })
}

pub(crate) fn bus_for(buses: &mut BusMap, bus_name: &str) -> RegistryResult<Arc<dyn I2CBus>> {
    buses.get_or_open(bus_name).map_err(|source| RegistryError::BusInit {
        bus: bus_name.to_string(),
        source,
    })
}
