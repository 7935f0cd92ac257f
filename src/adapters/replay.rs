//! In-memory replay source.
//!
//! Drains a pre-built vector of readings in order — the simulator path
//! for demos, and the standard source double in tests.

use crate::app::ports::SensorSource;
use crate::reading::SensorReading;

pub struct ReplaySource {
    events: std::vec::IntoIter<SensorReading>,
}

impl ReplaySource {
    pub fn new(events: Vec<SensorReading>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl SensorSource for ReplaySource {
    fn next_reading(&mut self) -> Option<SensorReading> {
        self.events.next()
    }
}
