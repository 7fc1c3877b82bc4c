use async_trait::async_trait;
use thiserror::Error;

#[cfg(target_os = "linux")]
use i2cdev::core::I2CDevice;
#[cfg(target_os = "linux")]
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use super::{I2CBus, I2CHandle};

/// I2C transport error
#[derive(Error, Debug)]
pub enum I2CError {
    #[cfg(target_os = "linux")]
    #[error(transparent)]
    Linux(#[from] LinuxI2CError),

    #[error("I2C not supported on this platform: {0}")]
    Unsupported(String),

    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("handle is closed")]
    Closed,

    /// Failure reported by a transport other than i2c-dev
    #[error("device error: {0}")]
    Device(String),
}

/// Map a configured bus name to its character device.
///
/// `"1"` and `"i2c-1"` both resolve to `/dev/i2c-1`; absolute paths are kept.
pub fn bus_path(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else if name.starts_with("i2c-") {
        format!("/dev/{}", name)
    } else {
        format!("/dev/i2c-{}", name)
    }
}

/// I2C bus backed by the Linux i2c-dev interface.
///
/// Handles are not serialised here; wrap the bus in
/// [`ExclusiveBus`](super::exclusive::ExclusiveBus) for that.
#[cfg(target_os = "linux")]
pub struct LinuxI2CBus {
    name: String,
    path: String,
}

#[cfg(not(target_os = "linux"))]
pub struct LinuxI2CBus {
    name: String,
}

#[cfg(target_os = "linux")]
impl LinuxI2CBus {
    pub fn new(name: &str) -> Result<Self, I2CError> {
        Ok(Self {
            name: name.to_string(),
            path: bus_path(name),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(not(target_os = "linux"))]
impl LinuxI2CBus {
    pub fn new(name: &str) -> Result<Self, I2CError> {
        Err(I2CError::Unsupported(format!(
            "bus '{}' requires the Linux i2c-dev interface",
            name
        )))
    }
}

#[cfg(target_os = "linux")]
#[async_trait]
impl I2CBus for LinuxI2CBus {
    async fn open(&self, address: u8) -> Result<Box<dyn I2CHandle>, I2CError> {
        let device = LinuxI2CDevice::new(&self.path, address as u16)?;
        Ok(Box::new(LinuxI2CHandle {
            device: Some(device),
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(not(target_os = "linux"))]
#[async_trait]
impl I2CBus for LinuxI2CBus {
    async fn open(&self, _address: u8) -> Result<Box<dyn I2CHandle>, I2CError> {
        Err(I2CError::Unsupported("I2C is only supported on Linux".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(target_os = "linux")]
struct LinuxI2CHandle {
    device: Option<LinuxI2CDevice>,
}

#[cfg(target_os = "linux")]
#[async_trait]
impl I2CHandle for LinuxI2CHandle {
    async fn write(&mut self, data: &[u8]) -> Result<(), I2CError> {
        let device = self.device.as_mut().ok_or(I2CError::Closed)?;
        device.write(data)?;
        Ok(())
    }

    async fn read(&mut self, count: usize) -> Result<Vec<u8>, I2CError> {
        let device = self.device.as_mut().ok_or(I2CError::Closed)?;
        let mut buf = vec![0u8; count];
        device.read(&mut buf)?;
        Ok(buf)
    }

    fn close(&mut self) {
        self.device.take();
    }
}
