//! Business-rule contracts executed against each ledger entry.
//!
//! Contracts are advisory side effects: the service hands every appended
//! block payload to the configured contract and logs — never propagates —
//! its failures. The name is historical; there is no VM or gas here, just
//! a rule over the flattened payload mapping.

use anyhow::Result;
use log::{error, info};

use crate::ledger::{BlockPayload, PayloadValue};
use crate::reading::HazardLevel;

/// A rule executed once per appended ledger entry.
pub trait SmartContract {
    /// Inspect a just-appended payload and perform any side effects.
    /// The return value is logged by the core and otherwise ignored.
    fn execute(&mut self, payload: &BlockPayload) -> Result<()>;
}

/// Raises the CO alarm when a payload's hazard level reaches `danger`.
pub struct CoAlertContract {
    alarms_raised: u64,
}

impl CoAlertContract {
    pub fn new() -> Self {
        Self { alarms_raised: 0 }
    }

    /// Number of alarm activations since construction.
    pub fn alarms_raised(&self) -> u64 {
        self.alarms_raised
    }

    fn trigger_alarm(&mut self) {
        self.alarms_raised += 1;
        error!("CONTRACT | CO alarm triggered");
    }

    fn notify_occupants(&self) {
        info!("CONTRACT | notifying occupants");
    }
}

impl Default for CoAlertContract {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartContract for CoAlertContract {
    fn execute(&mut self, payload: &BlockPayload) -> Result<()> {
        if let Some(PayloadValue::Text(level)) = payload.get("hazard_level") {
            if level == HazardLevel::Danger.as_str() {
                self.trigger_alarm();
                self.notify_occupants();
            }
        }
        Ok(())
    }
}
