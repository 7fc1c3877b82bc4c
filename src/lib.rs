// Public modules
pub mod bus;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registry;
pub mod sensors;

// Re-export commonly used types
pub use bus::{BusMap, I2CBus, I2CHandle};
pub use config::{load_sensor_config, SensorConfig};
pub use errors::{SensorError, SensorResult};
pub use messages::ReadingReport;
pub use registry::Registry;
pub use sensors::reading::{decode_adc_bytes, RawReading};
pub use sensors::tca9548a::{Capability, Channel, Tca9548a};
pub use sensors::{Attributes, Sensor};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Build every sensor in `<config_path>/sensors.toml` and report one reading from each.
///
/// A sensor whose read fails is reported and skipped; configuration and
/// registration failures abort the run.
pub async fn run(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("[tca9548a-mux] starting up...");

    let sensor_config_path = format!("{}/sensors.toml", config_path);
    let sensor_config = load_sensor_config(&sensor_config_path)?;
    info!("[config] loaded {} sensor(s)", sensor_config.sensors.len());

    let registry = Registry::with_builtin_models();
    info!("[registry] models: {:?}", registry.models());

    let mut buses = BusMap::new();
    let sensors = registry.init_all(&sensor_config, &mut buses)?;
    info!("[registry] {} sensor(s) on {} bus(es)", sensors.len(), buses.len());

    for (seq, sensor) in sensors.iter().enumerate() {
        let report = ReadingReport::new(sensor.as_ref(), seq as u64, sensor.readings().await);
        let json = report.to_json()?;
        if report.is_ok() {
            info!("[{}] {}", sensor.name(), json);
        } else {
            error!("[{}] {}", sensor.name(), json);
        }
    }

    Ok(())
}
