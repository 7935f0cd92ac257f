//! Log-backed broadcast transport.
//!
//! Implements [`BroadcastPort`] by writing start/stop events and the hex
//! frame to the logger. Stands in for a real BLE peripheral stack, which
//! is platform glue outside this crate. Idempotent: repeated calls in the
//! same state only refresh the frame, they don't re-announce.

use log::{debug, info};

use crate::app::ports::BroadcastPort;
use crate::frame::FRAME_LEN;

pub struct LogBroadcast {
    advertising: bool,
}

impl LogBroadcast {
    pub fn new() -> Self {
        Self { advertising: false }
    }

    /// Whether the transport is currently advertising.
    pub fn is_advertising(&self) -> bool {
        self.advertising
    }
}

impl Default for LogBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPort for LogBroadcast {
    fn start_broadcast(&mut self, frame: &[u8; FRAME_LEN]) {
        if self.advertising {
            debug!("BLE | advertising refresh, frame={}", hex::encode(frame));
        } else {
            info!("BLE | advertising start, frame={}", hex::encode(frame));
        }
        self.advertising = true;
    }

    fn stop_broadcast(&mut self) {
        if self.advertising {
            info!("BLE | advertising stop");
        }
        self.advertising = false;
    }
}
