//! `nau7802` model.
//!
//! Older schema for the same multiplexer wiring: the bus is named `i2c_bus`,
//! the address defaults to the NAU7802's own `0x2A`, and calibration fields are
//! accepted. Only channel selection is supported; `readings` reports
//! unimplemented.

use std::sync::Arc;

use super::tca9548a::{Capability, Tca9548a};
use super::{Sensor, SensorFactory};
use crate::bus::BusMap;
use crate::config::device_config::{Nau7802Config, NAU7802_DEFAULT_ADDRESS};
use crate::config::SensorEntry;
use crate::errors::RegistryResult;
use crate::registry::{bus_for, entry_config, resolve_address};

pub static NAU7802_FACTORY: Nau7802Factory = Nau7802Factory;

pub struct Nau7802Factory;

impl SensorFactory for Nau7802Factory {
    fn model(&self) -> &'static str {
        "nau7802"
    }

    fn create(&self, entry: &SensorEntry, buses: &mut BusMap) -> RegistryResult<Arc<dyn Sensor>> {
        let config: Nau7802Config = entry_config(entry, Nau7802Config::validate)?;
        let address = resolve_address(entry, config.address(), NAU7802_DEFAULT_ADDRESS);
        let bus = bus_for(buses, &config.i2c_bus)?;

        let device = Tca9548a::new(entry.name.clone(), self.model(), bus, address, Capability::SelectOnly)
            .with_calibration(config.calibration);
        Ok(Arc::new(device))
    }
}
