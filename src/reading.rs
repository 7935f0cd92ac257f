//! Sensor reading value type and derived views.
//!
//! A [`SensorReading`] is an immutable value: updating metadata produces a
//! new reading, so copies already buffered in a window never observe later
//! edits.

use crate::ledger::{BlockPayload, PayloadValue};

/// Length of the regression feature vector: 4 scalars + 14 resistances.
pub const FEATURE_LEN: usize = 18;

/// Number of MOX sensor resistance channels in the array.
pub const RESISTANCE_CHANNELS: usize = 14;

/// Length of the (currently inert) classifier feature vector.
pub const CLASSIFIER_FEATURE_LEN: usize = 4;

// ---------------------------------------------------------------------------
// SensorReading
// ---------------------------------------------------------------------------

/// One point-in-time multi-sensor telemetry reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Unix seconds.
    pub timestamp: u64,
    /// Carbon monoxide concentration (ppm). Drives the alert decision.
    pub co_ppm: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Ambient temperature (°C).
    pub temperature: f64,
    /// Sample flow rate through the sensor chamber.
    pub flow_rate: f64,
    /// MOX heater voltage (V).
    pub heater_voltage: f64,
    /// Resistance readings from the sensor array (expected 14 channels).
    pub sensor_resistances: Vec<f64>,
    /// Free-form annotations carried alongside the reading.
    pub metadata: BlockPayload,
}

impl SensorReading {
    /// Regression feature vector:
    /// `[temperature, humidity, heater_voltage, flow_rate] ++ resistances`.
    ///
    /// Expected length is [`FEATURE_LEN`]; callers must check — a short or
    /// long resistance array is an upstream data fault.
    pub fn feature_vector(&self) -> Vec<f64> {
        let mut features = Vec::with_capacity(FEATURE_LEN);
        features.push(self.temperature);
        features.push(self.humidity);
        features.push(self.heater_voltage);
        features.push(self.flow_rate);
        features.extend_from_slice(&self.sensor_resistances);
        features
    }

    /// Classifier feature vector (parity with the optional classifier path).
    pub fn classifier_features(&self) -> [f64; CLASSIFIER_FEATURE_LEN] {
        [
            self.temperature,
            self.humidity,
            self.heater_voltage,
            self.co_ppm,
        ]
    }

    /// Return a new reading with `key` set in metadata; all other fields
    /// unchanged. The receiver is not modified.
    pub fn with_metadata(&self, key: &str, value: PayloadValue) -> Self {
        let mut updated = self.clone();
        updated.metadata.insert(key.into(), value);
        updated
    }

    /// Flatten into a block payload: the sensor fields, the derived hazard
    /// level, then metadata entries for keys not already present (sensor
    /// fields win over metadata on collision).
    pub fn to_block_payload(&self) -> BlockPayload {
        let mut payload = BlockPayload::new();
        payload.insert("timestamp".into(), PayloadValue::Num(self.timestamp as f64));
        payload.insert("co_ppm".into(), PayloadValue::Num(self.co_ppm));
        payload.insert("humidity".into(), PayloadValue::Num(self.humidity));
        payload.insert("temperature".into(), PayloadValue::Num(self.temperature));
        payload.insert("flow_rate".into(), PayloadValue::Num(self.flow_rate));
        payload.insert(
            "heater_voltage".into(),
            PayloadValue::Num(self.heater_voltage),
        );
        payload.insert(
            "sensor_resistances".into(),
            PayloadValue::Series(self.sensor_resistances.clone()),
        );
        payload.insert(
            "hazard_level".into(),
            PayloadValue::Text(HazardLevel::from_ppm(self.co_ppm).as_str().into()),
        );

        for (key, value) in &self.metadata {
            if !payload.contains_key(key) {
                payload.insert(key.clone(), value.clone());
            }
        }
        payload
    }
}

// ---------------------------------------------------------------------------
// HazardLevel
// ---------------------------------------------------------------------------

/// Three-way CO hazard classification recorded with every ledger entry.
///
/// Boundaries follow the health-guideline thresholds used by the
/// prediction model: below 9 ppm is safe, 35 ppm and above is danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardLevel {
    Safe,
    Warning,
    Danger,
}

impl HazardLevel {
    pub fn from_ppm(co_ppm: f64) -> Self {
        if co_ppm < 9.0 {
            Self::Safe
        } else if co_ppm < 35.0 {
            Self::Warning
        } else {
            Self::Danger
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl core::fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
