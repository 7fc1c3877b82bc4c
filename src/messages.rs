use serde::{Deserialize, Serialize};

use crate::errors::SensorResult;
use crate::sensors::{Attributes, Sensor};

/// Outcome of one `readings` request, as published by the host
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReadingReport {
    /// Configured sensor name
    pub sensor: String,
    pub model: String,
    /// Sequence number for message ordering
    pub seq: u64,
    /// UTC timestamp in nanoseconds
    pub t_utc_ns: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readings: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadingReport {
    pub fn new(sensor: &dyn Sensor, seq: u64, result: SensorResult<Attributes>) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let t_utc_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        let (readings, error) = match result {
            Ok(readings) => (Some(readings), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            sensor: sensor.name().to_string(),
            model: sensor.model().to_string(),
            seq,
            t_utc_ns,
            readings,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
