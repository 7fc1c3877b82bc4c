use thiserror::Error;
use crate::bus::i2c::I2CError;

/// Driver-level errors surfaced by a multiplexer sensor
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("invalid channel: {channel} (valid channels are 0-7)")]
    InvalidChannel { channel: u8 },

    #[error("failed to open I2C handle at {address:#04x}: {source}")]
    BusOpen {
        address: u8,
        #[source]
        source: I2CError,
    },

    #[error("failed to write to I2C at {address:#04x}: {source}")]
    BusWrite {
        address: u8,
        #[source]
        source: I2CError,
    },

    #[error("failed to read from I2C at {address:#04x}: {source}")]
    BusRead {
        address: u8,
        #[source]
        source: I2CError,
    },

    #[error("malformed reading: expected 3 bytes, got {len}")]
    MalformedReading { len: usize },

    #[error("unimplemented: {what}")]
    Unimplemented { what: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Missing required configuration field: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Registry and initialization errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unsupported sensor model: '{model}'")]
    UnsupportedModel { model: String },

    #[error("Sensor model '{model}' is already registered")]
    DuplicateModel { model: String },

    #[error("Invalid configuration for sensor '{sensor}': {source}")]
    Config {
        sensor: String,
        #[source]
        source: ConfigError,
    },

    #[error("Bus '{bus}' could not be initialized: {source}")]
    BusInit {
        bus: String,
        #[source]
        source: I2CError,
    },
}

impl SensorError {
    pub fn unimplemented(what: impl Into<String>) -> Self {
        SensorError::Unimplemented { what: what.into() }
    }
}

/// Result type aliases for convenience
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
