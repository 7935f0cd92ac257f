//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   SensorSource ──▶ ┌──────────────────────────┐ ──▶ BroadcastPort
//!                    │      MonitorService       │
//!   Predictor ──────▶│  windows · ledger · alert │ ──▶ SmartContract
//!                    └──────────────────────────┘ ──▶ ReadingObserver
//! ```
//!
//! Adapters (CSV readers, ML models, BLE stacks, notification sinks)
//! implement these traits. The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches a file,
//! a model runtime, or a radio directly.

use crate::frame::FRAME_LEN;
use crate::reading::{FEATURE_LEN, SensorReading};

// ───────────────────────────────────────────────────────────────
// Sensor source (driven adapter: data → domain)
// ───────────────────────────────────────────────────────────────

/// A lazy, finite, non-restartable sequence of readings in arrival order.
pub trait SensorSource {
    /// The next reading, or `None` once the source is exhausted.
    /// Exhaustion is the pipeline's clean terminal condition, not an error.
    fn next_reading(&mut self) -> Option<SensorReading>;
}

// ───────────────────────────────────────────────────────────────
// Predictor (driven adapter: domain → model)
// ───────────────────────────────────────────────────────────────

/// The predictive model behind the regression window.
///
/// Injected at the call site rather than held as process-wide state, so
/// tests substitute a double and deployments swap model runtimes freely.
pub trait Predictor {
    /// Predict the CO concentration from an ordered window of exactly
    /// [`REGRESSION_SEQUENCE_LEN`](crate::window::REGRESSION_SEQUENCE_LEN)
    /// feature vectors, oldest first.
    ///
    /// `None` signals the prediction is unavailable this tick (model not
    /// loaded, inference failure). The call is synchronous and blocking —
    /// there is no timeout or retry in this design.
    fn predict_co(&mut self, sequence: &[[f64; FEATURE_LEN]]) -> Option<f64>;
}

// ───────────────────────────────────────────────────────────────
// Broadcast transport (driven adapter: domain → radio)
// ───────────────────────────────────────────────────────────────

/// The constrained-bandwidth broadcast medium carrying alert frames.
///
/// Implementations must be idempotent under repeated calls in the same
/// state; the service only issues calls on state transitions regardless.
pub trait BroadcastPort {
    /// Begin (or refresh) broadcasting the given alert frame.
    fn start_broadcast(&mut self, frame: &[u8; FRAME_LEN]);

    /// Cease broadcasting.
    fn stop_broadcast(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Observers (driven adapter: domain → UI / notification glue)
// ───────────────────────────────────────────────────────────────

/// Callback invoked with the updated reading at the end of each tick.
///
/// Invocation is synchronous and best-effort: an observer must not
/// assume it is the only one registered, and the service continues the
/// tick regardless of what observers do.
pub trait ReadingObserver {
    fn on_reading(&mut self, reading: &SensorReading);
}
