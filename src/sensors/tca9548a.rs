//! TCA9548A 8-channel I2C multiplexer.
//!
//! Datasheet: https://www.ti.com/lit/ds/symlink/tca9548a.pdf
//!
//! The control register is a single byte with one bit per downstream channel.
//! Writing `1 << n` connects channel `n`; the peripheral behind it is then read
//! back through the same address.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::reading::{RawReading, RAW_READING_LEN};
use super::{Attributes, Sensor, SensorFactory};
use crate::bus::i2c::I2CError;
use crate::bus::{BusMap, I2CBus};
use crate::config::device_config::{Calibration, Tca9548aConfig, TCA9548A_DEFAULT_ADDRESS};
use crate::config::SensorEntry;
use crate::errors::{ConfigError, RegistryError, RegistryResult, SensorError, SensorResult};
use crate::registry::{bus_for, entry_config, resolve_address};

pub const CHANNEL_COUNT: u8 = 8;

/// Channel the ADC peripheral is wired to on the reference board
pub const DEFAULT_PERIPHERAL_CHANNEL: u8 = 2;

/// Key under which [`Sensor::readings`] reports the decoded sample
pub const READING_KEY: &str = "adcData";

/// A downstream channel, 0 through 7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel(u8);

impl Channel {
    pub fn new(channel: u8) -> SensorResult<Self> {
        if channel >= CHANNEL_COUNT {
            return Err(SensorError::InvalidChannel { channel });
        }
        Ok(Self(channel))
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Control register value that connects this channel
    pub fn command(&self) -> u8 {
        1 << self.0
    }
}

/// What the device does beyond switching channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Channel selection only; `readings` is unimplemented
    SelectOnly,
    /// Select `channel` and decode the 24-bit sample behind it
    PeripheralRead { channel: Channel },
}

pub struct Tca9548a {
    name: String,
    model: &'static str,
    bus: Arc<dyn I2CBus>,
    address: u8,
    capability: Capability,
    calibration: Calibration,
}

impl Tca9548a {
    pub fn new(
        name: String,
        model: &'static str,
        bus: Arc<dyn I2CBus>,
        address: u8,
        capability: Capability,
    ) -> Self {
        Self {
            name,
            model,
            bus,
            address,
            capability,
            calibration: Calibration::default(),
        }
    }

    /// Attach calibration parameters. They are stored but not yet applied.
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus_name(&self) -> &str {
        self.bus.name()
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Connect `channel` and read one raw sample from the peripheral behind it.
    ///
    /// Performs exactly one write and one read. Nothing touches the bus when
    /// `channel` is out of range, and failures are not retried.
    pub async fn select_channel(&self, channel: u8) -> SensorResult<RawReading> {
        let channel = Channel::new(channel)?;
        self.transact(channel).await
    }

    async fn transact(&self, channel: Channel) -> SensorResult<RawReading> {
        let address = self.address;

        // The handle releases the bus on drop, so every early return below
        // gives up exclusive access too.
        let mut handle = self
            .bus
            .open(address)
            .await
            .map_err(|source| SensorError::BusOpen { address, source })?;

        debug!(
            "[{}] selecting channel {} (command {:#04x}) at {:#04x}",
            self.name,
            channel.index(),
            channel.command(),
            address
        );
        handle
            .write(&[channel.command()])
            .await
            .map_err(|source| SensorError::BusWrite { address, source })?;

        let bytes = handle
            .read(RAW_READING_LEN)
            .await
            .map_err(|source| SensorError::BusRead { address, source })?;
        handle.close();

        RawReading::try_from(bytes.as_slice()).map_err(|_| SensorError::BusRead {
            address,
            source: I2CError::ShortRead {
                expected: RAW_READING_LEN,
                actual: bytes.len(),
            },
        })
    }
}

#[async_trait]
impl Sensor for Tca9548a {
    async fn readings(&self) -> SensorResult<Attributes> {
        let channel = match self.capability {
            Capability::PeripheralRead { channel } => channel,
            Capability::SelectOnly => return Err(SensorError::unimplemented("readings")),
        };
        let raw = self.transact(channel).await?;
        let value = raw.decode();
        debug!("[{}] channel {} raw={:02x?} value={}", self.name, channel.index(), raw.bytes(), value);

        let mut readings = Attributes::new();
        readings.insert(READING_KEY.to_string(), Value::from(value));
        Ok(readings)
    }

    async fn do_command(&self, _command: Attributes) -> SensorResult<Attributes> {
        Err(SensorError::unimplemented("do_command"))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        self.model
    }
}

pub static TCA9548A_FACTORY: Tca9548aFactory = Tca9548aFactory;

/// `tca9548a` model: multiplexer with the ADC read behind its peripheral channel
pub struct Tca9548aFactory;

impl SensorFactory for Tca9548aFactory {
    fn model(&self) -> &'static str {
        "tca9548a"
    }

    fn create(&self, entry: &SensorEntry, buses: &mut BusMap) -> RegistryResult<Arc<dyn Sensor>> {
        let config: Tca9548aConfig = entry_config(entry, Tca9548aConfig::validate)?;
        let address = resolve_address(entry, config.address(), TCA9548A_DEFAULT_ADDRESS);
        let channel = Channel::new(config.peripheral_channel()).map_err(|e| RegistryError::Config {
            sensor: entry.name.clone(),
            source: ConfigError::InvalidValue {
                field: "peripheral_channel".to_string(),
                reason: e.to_string(),
            },
        })?;
        let bus = bus_for(buses, &config.bus_name)?;

        Ok(Arc::new(Tca9548a::new(
            entry.name.clone(),
            self.model(),
            bus,
            address,
            Capability::PeripheralRead { channel },
        )))
    }
}
