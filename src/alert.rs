//! Broadcast alert controller.
//!
//! A two-state machine gating the broadcast transport:
//!
//! ```text
//!          co_ppm >= 35.0
//!   Idle ──────────────────▶ Advertising
//!    ▲                           │
//!    └───────────────────────────┘
//!          co_ppm < 35.0
//! ```
//!
//! The decision uses the reading's **raw** CO concentration, never the
//! predicted value. There is deliberately no hysteresis band: a sequence
//! oscillating around the threshold toggles the transport every tick.
//! That matches the certified detector behaviour; adding damping is a
//! product decision, not a code fix.

use log::{info, warn};

/// CO concentration (ppm) at and above which the alert broadcast runs.
/// Part of the wire contract — not runtime-configurable.
pub const ALERT_THRESHOLD_PPM: f64 = 35.0;

/// Controller state: whether the transport is currently broadcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    Idle,
    Advertising,
}

/// Transport instruction produced by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastAction {
    /// Begin advertising the current alert frame.
    Start,
    /// Cease advertising.
    Stop,
}

/// Threshold-crossing supervisor for the broadcast transport.
pub struct AlertController {
    state: BroadcastState,
}

impl AlertController {
    pub fn new() -> Self {
        Self {
            state: BroadcastState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> BroadcastState {
        self.state
    }

    /// Evaluate one reading's raw CO level against the threshold.
    ///
    /// Returns an action only on a state transition; self-loops are no-ops
    /// (the transport is idempotent anyway, but we don't spam it).
    pub fn evaluate(&mut self, co_ppm: f64) -> Option<BroadcastAction> {
        let above = co_ppm >= ALERT_THRESHOLD_PPM;
        match (self.state, above) {
            (BroadcastState::Idle, true) => {
                self.state = BroadcastState::Advertising;
                warn!("ALERT | CO {co_ppm:.2} ppm >= {ALERT_THRESHOLD_PPM} — broadcast start");
                Some(BroadcastAction::Start)
            }
            (BroadcastState::Advertising, false) => {
                self.state = BroadcastState::Idle;
                info!("ALERT | CO {co_ppm:.2} ppm cleared — broadcast stop");
                Some(BroadcastAction::Stop)
            }
            _ => None,
        }
    }
}

impl Default for AlertController {
    fn default() -> Self {
        Self::new()
    }
}
