//! Baseline CO predictor.
//!
//! A two-point linear calibration from the window-averaged sensor-array
//! resistance to a CO concentration. MOX resistance drops as reducing-gas
//! concentration rises, so the mapping runs from `zero_ohms` (clean air)
//! down to `span_ohms` (full-scale CO).
//!
//! This is a stand-in for the external LSTM regression model — it lets
//! the binary run end-to-end without a model runtime, and deployments
//! swap in a real [`Predictor`] implementation without touching the core.

use crate::app::ports::Predictor;
use crate::reading::FEATURE_LEN;

/// Two-point calibration for the resistance → ppm mapping.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    /// Mean array resistance in clean air (0 ppm).
    pub zero_ohms: f64,
    /// Mean array resistance at full scale.
    pub span_ohms: f64,
    /// Concentration at full scale (ppm).
    pub span_ppm: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            zero_ohms: 12_000.0,
            span_ohms: 2_000.0,
            span_ppm: 100.0,
        }
    }
}

pub struct CalibratedPredictor {
    cal: Calibration,
}

impl CalibratedPredictor {
    pub fn new(cal: Calibration) -> Self {
        Self { cal }
    }
}

impl Default for CalibratedPredictor {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

impl Predictor for CalibratedPredictor {
    fn predict_co(&mut self, sequence: &[[f64; FEATURE_LEN]]) -> Option<f64> {
        if sequence.is_empty() {
            return None;
        }
        let range = self.cal.zero_ohms - self.cal.span_ohms;
        if range <= 0.0 {
            return None; // inverted calibration, refuse to guess
        }

        // Mean resistance across every channel of every time step.
        // Channels occupy the tail of the vector, after the four scalars.
        let mut sum = 0.0;
        let mut count = 0usize;
        for vector in sequence {
            for r in &vector[4..] {
                sum += r;
                count += 1;
            }
        }
        let mean = sum / count as f64;

        let normalised = ((self.cal.zero_ohms - mean) / range).clamp(0.0, 1.0);
        Some(normalised * self.cal.span_ppm)
    }
}
