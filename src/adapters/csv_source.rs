//! CSV telemetry dataset source.
//!
//! Reads the 20-column telemetry export lazily, one row per tick:
//!
//! ```text
//! timestamp,co_ppm,humidity,temperature,flow_rate,heater_voltage,r1,...,r14
//! ```
//!
//! The header row is skipped. Malformed rows (wrong arity, unparseable
//! numbers) are logged and skipped — one bad export line must not end the
//! whole run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use log::warn;

use crate::app::ports::SensorSource;
use crate::ledger::PayloadValue;
use crate::reading::{RESISTANCE_CHANNELS, SensorReading};

/// timestamp + five scalars + the resistance channels.
const COLUMNS: usize = 6 + RESISTANCE_CHANNELS;

pub struct CsvSource {
    lines: Lines<BufReader<File>>,
    /// 1-based line number of the last line read (header = 1).
    line_no: usize,
    source_tag: String,
}

impl CsvSource {
    /// Open a dataset file and position past the header row.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();
        let _ = lines.next(); // header
        let source_tag = path
            .file_name()
            .map_or_else(|| "csv".into(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            lines,
            line_no: 1,
            source_tag,
        })
    }

    fn parse_row(&self, line: &str) -> Option<SensorReading> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < COLUMNS {
            return None;
        }

        let timestamp = fields[0].parse::<u64>().ok()?;
        let mut scalars = [0.0f64; 5];
        for (slot, field) in scalars.iter_mut().zip(&fields[1..6]) {
            *slot = field.parse().ok()?;
        }
        let mut resistances = Vec::with_capacity(RESISTANCE_CHANNELS);
        for field in &fields[6..COLUMNS] {
            resistances.push(field.parse::<f64>().ok()?);
        }

        let mut metadata = crate::ledger::BlockPayload::new();
        metadata.insert(
            "source".into(),
            PayloadValue::Text(self.source_tag.clone()),
        );

        Some(SensorReading {
            timestamp,
            co_ppm: scalars[0],
            humidity: scalars[1],
            temperature: scalars[2],
            flow_rate: scalars[3],
            heater_voltage: scalars[4],
            sensor_resistances: resistances,
            metadata,
        })
    }
}

impl SensorSource for CsvSource {
    fn next_reading(&mut self) -> Option<SensorReading> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    warn!("CSV | read error after line {}: {e}", self.line_no);
                    return None;
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            match self.parse_row(&line) {
                Some(reading) => return Some(reading),
                None => warn!("CSV | skipping malformed row at line {}", self.line_no),
            }
        }
    }
}
