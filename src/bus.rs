pub mod exclusive;
pub mod i2c;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use self::exclusive::ExclusiveBus;
use self::i2c::{bus_path, I2CError, LinuxI2CBus};

/// A physical I2C bus that hands out short-lived device handles.
///
/// Providers built by [`BusMap`] are wrapped in [`ExclusiveBus`], so only one
/// handle transacts at a time and `open` waits for the previous one to be
/// closed or dropped.
#[async_trait]
pub trait I2CBus: Send + Sync {
    /// Open a handle to the device at `address`.
    async fn open(&self, address: u8) -> Result<Box<dyn I2CHandle>, I2CError>;

    /// Bus identifier, as named in the configuration
    fn name(&self) -> &str;
}

/// An open handle to one device on an [`I2CBus`].
///
/// Dropping the handle releases exclusive access, so a transaction that is
/// cancelled mid-flight never leaves the bus locked.
#[async_trait]
pub trait I2CHandle: Send {
    async fn write(&mut self, data: &[u8]) -> Result<(), I2CError>;

    /// Read exactly `count` bytes.
    async fn read(&mut self, count: usize) -> Result<Vec<u8>, I2CError>;

    /// Release the device and any lock held with it. Calling it more than
    /// once is a no-op.
    fn close(&mut self);
}

/// Bus providers keyed by the character device a bus name resolves to.
///
/// `"1"`, `"i2c-1"` and `"/dev/i2c-1"` all share one provider, and with it
/// the provider's lock.
#[derive(Default)]
pub struct BusMap {
    buses: HashMap<String, Arc<dyn I2CBus>>,
}

impl BusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already constructed provider under its own name.
    pub fn insert(&mut self, bus: Arc<dyn I2CBus>) {
        self.buses.insert(bus_path(bus.name()), bus);
    }

    /// Look up the provider for `name`, creating an exclusive Linux bus if
    /// none exists yet for the same device.
    pub fn get_or_open(&mut self, name: &str) -> Result<Arc<dyn I2CBus>, I2CError> {
        let path = bus_path(name);
        if let Some(bus) = self.buses.get(&path) {
            return Ok(bus.clone());
        }
        let bus: Arc<dyn I2CBus> = Arc::new(ExclusiveBus::new(LinuxI2CBus::new(name)?));
        debug!("[bus] created provider for '{}' ({})", name, path);
        self.buses.insert(path, bus.clone());
        Ok(bus)
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockI2CBus;
    use super::*;

    #[test]
    fn test_bus_map_reuses_inserted_provider() {
        let mut buses = BusMap::new();
        buses.insert(Arc::new(MockI2CBus::new("1")));

        let a = buses.get_or_open("1").unwrap();
        let b = buses.get_or_open("1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(buses.len(), 1);
    }

    #[test]
    fn test_bus_map_aliases_share_inserted_provider() {
        let mut buses = BusMap::new();
        assert!(buses.is_empty());
        buses.insert(Arc::new(MockI2CBus::new("1")));

        let a = buses.get_or_open("1").unwrap();
        let b = buses.get_or_open("/dev/i2c-1").unwrap();
        let c = buses.get_or_open("i2c-1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(buses.len(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_bus_map_aliases_share_created_provider() {
        let mut buses = BusMap::new();

        let a = buses.get_or_open("1").unwrap();
        let b = buses.get_or_open("/dev/i2c-1").unwrap();
        let c = buses.get_or_open("i2c-1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));

        buses.get_or_open("2").unwrap();
        assert_eq!(buses.len(), 2);
    }
}
