pub mod device_config;
pub mod sensor_config;

pub use device_config::{Calibration, Nau7802Config, Tca9548aConfig};
pub use sensor_config::{load_sensor_config, parse_sensor_config, SensorConfig, SensorEntry};
