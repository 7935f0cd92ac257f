//! Recording mock adapters for integration tests.
//!
//! Each mock records every port call so tests can assert on the full
//! interaction history without real I/O.

use std::cell::RefCell;
use std::rc::Rc;

use cosentry::app::ports::{BroadcastPort, Predictor, ReadingObserver, SensorSource};
use cosentry::contract::SmartContract;
use cosentry::frame::FRAME_LEN;
use cosentry::ledger::BlockPayload;
use cosentry::reading::{FEATURE_LEN, SensorReading};

// ── Reading builders ──────────────────────────────────────────

/// A well-formed reading; `temperature` doubles as a marker so tests can
/// identify which reading a buffered feature vector came from.
#[allow(dead_code)]
pub fn reading(timestamp: u64, co_ppm: f64) -> SensorReading {
    SensorReading {
        timestamp,
        co_ppm,
        humidity: 45.0,
        temperature: timestamp as f64,
        flow_rate: 0.8,
        heater_voltage: 5.0,
        sensor_resistances: vec![10_000.0; 14],
        metadata: BlockPayload::new(),
    }
}

/// One reading per CO level, timestamps counting up from 1.
#[allow(dead_code)]
pub fn readings(co_levels: &[f64]) -> Vec<SensorReading> {
    co_levels
        .iter()
        .enumerate()
        .map(|(i, &co_ppm)| reading(i as u64 + 1, co_ppm))
        .collect()
}

// ── Source ────────────────────────────────────────────────────

pub struct VecSource {
    items: std::vec::IntoIter<SensorReading>,
}

#[allow(dead_code)]
impl VecSource {
    pub fn new(items: Vec<SensorReading>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl SensorSource for VecSource {
    fn next_reading(&mut self) -> Option<SensorReading> {
        self.items.next()
    }
}

// ── Predictor ─────────────────────────────────────────────────

/// Records every sequence it is handed and replies with a fixed response.
pub struct RecordingPredictor {
    pub calls: Vec<Vec<[f64; FEATURE_LEN]>>,
    pub response: Option<f64>,
}

#[allow(dead_code)]
impl RecordingPredictor {
    pub fn replying(response: Option<f64>) -> Self {
        Self {
            calls: Vec::new(),
            response,
        }
    }
}

impl Predictor for RecordingPredictor {
    fn predict_co(&mut self, sequence: &[[f64; FEATURE_LEN]]) -> Option<f64> {
        self.calls.push(sequence.to_vec());
        self.response
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Start([u8; FRAME_LEN]),
    Stop,
}

pub struct RecordingTransport {
    pub calls: Vec<TransportCall>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }
}

impl BroadcastPort for RecordingTransport {
    fn start_broadcast(&mut self, frame: &[u8; FRAME_LEN]) {
        self.calls.push(TransportCall::Start(*frame));
    }

    fn stop_broadcast(&mut self) {
        self.calls.push(TransportCall::Stop);
    }
}

// ── Contract ──────────────────────────────────────────────────

/// Records payloads; optionally fails every execution to prove failures
/// are swallowed.
pub struct RecordingContract {
    pub payloads: Vec<BlockPayload>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingContract {
    pub fn new() -> Self {
        Self {
            payloads: Vec::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            payloads: Vec::new(),
            fail: true,
        }
    }
}

impl SmartContract for RecordingContract {
    fn execute(&mut self, payload: &BlockPayload) -> anyhow::Result<()> {
        self.payloads.push(payload.clone());
        if self.fail {
            anyhow::bail!("contract executor down");
        }
        Ok(())
    }
}

// ── Observer ──────────────────────────────────────────────────

/// Observer whose call history is shared with the test through an `Rc`,
/// since the service takes ownership of the box.
pub struct SharedObserver {
    seen: Rc<RefCell<Vec<SensorReading>>>,
}

#[allow(dead_code)]
impl SharedObserver {
    pub fn new() -> (Self, Rc<RefCell<Vec<SensorReading>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        (Self { seen: seen.clone() }, seen)
    }
}

impl ReadingObserver for SharedObserver {
    fn on_reading(&mut self, reading: &SensorReading) {
        self.seen.borrow_mut().push(reading.clone());
    }
}
