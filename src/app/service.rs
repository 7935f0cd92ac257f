//! Monitor service — the hexagonal core.
//!
//! [`MonitorService`] owns the ledger, both sliding windows, the alert
//! controller, and the observer registry. One call to [`tick`] runs the
//! full ingestion pipeline for a single reading:
//!
//! 1. fetch the next reading from the source (`None` ⇒ clean stop)
//! 2. integrity-check and buffer its feature vectors
//! 3. run the predictor once the regression window is full
//! 4. append the annotated reading to the tamper-evident ledger
//! 5. execute the smart contract against the appended payload
//! 6. drive the alert broadcast from the raw CO level
//! 7. notify registered observers
//!
//! Single-writer by design: the service and everything it owns belong to
//! the one task driving `tick`, so no internal locking is needed.
//!
//! [`tick`]: MonitorService::tick

use log::{debug, info, warn};

use crate::alert::{AlertController, BroadcastAction, BroadcastState};
use crate::config::SystemConfig;
use crate::error::{ReadingError, Result};
use crate::frame::AlertFrame;
use crate::ledger::{Ledger, PayloadValue};
use crate::reading::{FEATURE_LEN, SensorReading};
use crate::window::{ClassifierWindow, RegressionWindow, SlidingWindow};

use super::ports::{BroadcastPort, Predictor, ReadingObserver, SensorSource};
use crate::contract::SmartContract;

/// Metadata key carrying the regression output on each ledger entry.
pub const PREDICTED_CO_KEY: &str = "predicted_co_ppm";

/// Metadata marker while the window is filling or the predictor fails.
pub const PREDICTION_PENDING: &str = "pending";

/// Handle returned by [`MonitorService::register_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u32);

/// Result of one ingestion tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The reading was processed end-to-end; carries the updated reading.
    Processed(SensorReading),
    /// The reading failed a data-integrity check and was dropped.
    Rejected(ReadingError),
    /// The source is exhausted; the pipeline stopped cleanly.
    Exhausted,
}

/// The application service orchestrating all domain logic.
pub struct MonitorService {
    ledger: Ledger,
    regression_window: RegressionWindow,
    classifier_window: ClassifierWindow,
    alert: AlertController,
    device_id: u32,
    observers: Vec<(ObserverId, Box<dyn ReadingObserver>)>,
    next_observer_id: u32,
    tick_count: u64,
}

impl MonitorService {
    /// Construct the service with a fresh ledger (genesis only).
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_ledger(config, Ledger::new())
    }

    /// Construct the service around an existing (e.g. restored) ledger.
    pub fn with_ledger(config: &SystemConfig, ledger: Ledger) -> Self {
        Self {
            ledger,
            regression_window: SlidingWindow::new(),
            classifier_window: SlidingWindow::new(),
            alert: AlertController::new(),
            device_id: config.device_id,
            observers: Vec::new(),
            next_observer_id: 0,
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full ingestion cycle against the injected ports.
    pub fn tick(
        &mut self,
        source: &mut impl SensorSource,
        predictor: &mut impl Predictor,
        transport: &mut impl BroadcastPort,
        contract: &mut impl SmartContract,
    ) -> Result<TickOutcome> {
        let Some(reading) = source.next_reading() else {
            info!("SOURCE | end of sensor data after {} ticks", self.tick_count);
            return Ok(TickOutcome::Exhausted);
        };
        self.tick_count += 1;
        debug!(
            "SOURCE | t={} CO={:.2}ppm T={:.1}C RH={:.1}%",
            reading.timestamp, reading.co_ppm, reading.temperature, reading.humidity
        );

        // 1. Feature integrity. A wrong-arity vector is an upstream data
        //    fault: drop the reading, keep the pipeline alive.
        let features: [f64; FEATURE_LEN] = match reading.feature_vector().try_into() {
            Ok(f) => f,
            Err(bad) => {
                let err = ReadingError::FeatureLength { got: bad.len() };
                warn!("DATA | reading rejected: {err}");
                return Ok(TickOutcome::Rejected(err));
            }
        };

        // 2. Buffer. The classifier window is kept in lock-step for the
        //    optional classifier path even though nothing consumes it yet.
        self.regression_window.push(features);
        self.classifier_window.push(reading.classifier_features());

        // 3./4. Predict only on a full window; below capacity the reading
        //       is annotated as pending (startup transient, not an error).
        let prediction = if self.regression_window.is_full() {
            let sequence = self.regression_window.snapshot();
            let predicted = predictor.predict_co(&sequence);
            match predicted {
                Some(ppm) => debug!("PREDICT | {ppm:.2} ppm"),
                None => warn!("PREDICT | unavailable this tick"),
            }
            predicted
        } else {
            debug!(
                "PREDICT | window filling {}/{}",
                self.regression_window.len(),
                self.regression_window.capacity()
            );
            None
        };

        // 5. Annotate and persist. The updated reading is a new value;
        //    copies already in the windows are unaffected.
        let updated = match prediction {
            Some(ppm) => reading.with_metadata(PREDICTED_CO_KEY, PayloadValue::Num(ppm)),
            None => reading.with_metadata(
                PREDICTED_CO_KEY,
                PayloadValue::Text(PREDICTION_PENDING.into()),
            ),
        };
        let payload = updated.to_block_payload();
        let block_index = self.ledger.append(payload.clone())?.index();
        debug!("LEDGER | block {block_index} appended");

        // Contract execution is advisory: log failures, never propagate.
        if let Err(e) = contract.execute(&payload) {
            warn!("CONTRACT | execution failed: {e:#}");
        }

        // 6. Alert decision on the *raw* CO level, never the prediction.
        match self.alert.evaluate(updated.co_ppm) {
            Some(BroadcastAction::Start) => {
                let frame = AlertFrame::from_reading(&updated, self.device_id);
                transport.start_broadcast(&frame.to_bytes());
            }
            Some(BroadcastAction::Stop) => transport.stop_broadcast(),
            None => {}
        }

        // 7. Observers last, with the fully annotated reading.
        for (_, observer) in &mut self.observers {
            observer.on_reading(&updated);
        }

        Ok(TickOutcome::Processed(updated))
    }

    // ── Observer registry ─────────────────────────────────────

    /// Register an observer; it is invoked at the end of every processed
    /// tick until unregistered.
    pub fn register_observer(&mut self, observer: Box<dyn ReadingObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove a previously registered observer. Returns `false` if the id
    /// is unknown (already removed).
    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    // ── Queries ───────────────────────────────────────────────

    /// The tamper-evident ledger (read-only).
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Current broadcast controller state.
    pub fn broadcast_state(&self) -> BroadcastState {
        self.alert.state()
    }

    /// Readings processed (accepted or rejected) since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Regression window fill level `(len, capacity)`.
    pub fn window_fill(&self) -> (usize, usize) {
        (
            self.regression_window.len(),
            self.regression_window.capacity(),
        )
    }

    /// Classifier window fill level `(len, capacity)`. Maintained in
    /// lock-step with the regression window; nothing consumes it yet.
    pub fn classifier_fill(&self) -> (usize, usize) {
        (
            self.classifier_window.len(),
            self.classifier_window.capacity(),
        )
    }
}
