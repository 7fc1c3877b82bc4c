use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::bus::BusMap;
use crate::config::SensorEntry;
use crate::errors::{RegistryResult, SensorResult};

pub mod reading;
pub mod tca9548a;
#[cfg(feature = "nau7802")]
pub mod nau7802;

/// String-keyed values, the shape of both readings and commands
pub type Attributes = Map<String, Value>;

/// Surface a host sensor framework consumes.
///
/// Implementations hold no per-call mutable state, so both methods may be
/// called repeatedly and from several tasks at once.
#[async_trait]
pub trait Sensor: Send + Sync {
    async fn readings(&self) -> SensorResult<Attributes>;
    async fn do_command(&self, command: Attributes) -> SensorResult<Attributes>;
    fn name(&self) -> &str;
    fn model(&self) -> &str;
}

/// Builds sensors of one model from a configuration entry
pub trait SensorFactory: Sync {
    fn model(&self) -> &'static str;
    fn create(&self, entry: &SensorEntry, buses: &mut BusMap) -> RegistryResult<Arc<dyn Sensor>>;
}

#[cfg(feature = "tca9548a")]
pub use self::tca9548a::TCA9548A_FACTORY;
#[cfg(feature = "nau7802")]
pub use self::nau7802::NAU7802_FACTORY;

pub static BUILTIN_FACTORIES: &[&dyn SensorFactory] = &[
    #[cfg(feature = "tca9548a")]
    &TCA9548A_FACTORY,
    #[cfg(feature = "nau7802")]
    &NAU7802_FACTORY,
];
