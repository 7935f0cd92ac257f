//! System configuration parameters.
//!
//! All tunable parameters for a CoSentry deployment. Values can be
//! overridden via a JSON config file passed to the binary. The alert
//! threshold is deliberately **not** here — it is a named constant
//! ([`crate::alert::ALERT_THRESHOLD_PPM`]), part of the wire contract.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Device identifier embedded in every broadcast frame.
    pub device_id: u32,

    /// Ingestion tick interval (milliseconds).
    pub sample_interval_ms: u64,

    /// Path to the telemetry CSV dataset.
    pub dataset_path: String,

    /// Path to the append-only block store; `None` disables persistence.
    pub store_path: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            device_id: 0x1234_5678,
            sample_interval_ms: 10_000, // 10 s between sensor reads
            dataset_path: "data/co_telemetry.csv".into(),
            store_path: Some("co_ledger.jsonl".into()),
        }
    }
}

impl SystemConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults (first run); a present but
    /// unparseable file is an error — a half-applied config is worse
    /// than none.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|_| Error::Config("config file unreadable"))?;
        serde_json::from_str(&raw).map_err(|_| Error::Config("config file malformed"))
    }
}
