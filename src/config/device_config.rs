//! Per-model attribute schemas.
//!
//! The two schemas name the bus field differently and default to different
//! addresses. They are separate versions, not aliases of one another.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};
use crate::sensors::tca9548a::DEFAULT_PERIPHERAL_CHANNEL;

pub const TCA9548A_DEFAULT_ADDRESS: u8 = 0x70;
pub const NAU7802_DEFAULT_ADDRESS: u8 = 0x2A;

const MAX_7BIT_ADDRESS: i64 = 0x7F;

/// Peripheral-side calibration parameters.
///
/// Reserved: accepted and stored, never applied to readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub samples: Option<u32>,
    pub zero_offset: Option<i32>,
    pub calibration_factor: Option<f64>,
    pub gain: Option<u32>,
}

/// Attributes of a `tca9548a` sensor entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tca9548aConfig {
    #[serde(default)]
    pub bus_name: String,
    pub i2c_addr: Option<i64>,
    /// Channel the ADC is wired to, defaults to 2. Range-checked when the
    /// device is built.
    pub peripheral_channel: Option<u8>,
}

/// Attributes of a `nau7802` sensor entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nau7802Config {
    #[serde(default)]
    pub i2c_bus: String,
    pub i2c_addr: Option<i64>,
    #[serde(flatten)]
    pub calibration: Calibration,
}

impl Tca9548aConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require("bus_name", &self.bus_name)?;
        check_address(self.i2c_addr)
    }

    /// Configured address, or `None` when the default applies
    pub fn address(&self) -> Option<u8> {
        configured_address(self.i2c_addr)
    }

    pub fn peripheral_channel(&self) -> u8 {
        self.peripheral_channel.unwrap_or(DEFAULT_PERIPHERAL_CHANNEL)
    }
}

impl Nau7802Config {
    pub fn validate(&self) -> ConfigResult<()> {
        require("i2c_bus", &self.i2c_bus)?;
        check_address(self.i2c_addr)
    }

    /// Configured address, or `None` when the default applies
    pub fn address(&self) -> Option<u8> {
        configured_address(self.i2c_addr)
    }
}

fn require(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn check_address(addr: Option<i64>) -> ConfigResult<()> {
    match addr {
        Some(a) if !(0..=MAX_7BIT_ADDRESS).contains(&a) => Err(ConfigError::InvalidValue {
            field: "i2c_addr".to_string(),
            reason: format!("{:#x} is not a 7-bit I2C address", a),
        }),
        _ => Ok(()),
    }
}

// Zero means "unset"
fn configured_address(addr: Option<i64>) -> Option<u8> {
    addr.filter(|&a| a > 0 && a <= MAX_7BIT_ADDRESS).map(|a| a as u8)
}
