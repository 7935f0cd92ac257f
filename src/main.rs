//! CoSentry demo binary.
//!
//! Wires the telemetry dataset (or built-in sample events when no dataset
//! is present) through the monitor service at the configured interval,
//! persists blocks as they are created, and verifies the chain at
//! end-of-data.
//!
//! Usage: `cosentry [config.json]` — a missing config file runs defaults.
//! Log verbosity via `RUST_LOG` (default `info`).

use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{info, warn};

use cosentry::adapters::csv_source::CsvSource;
use cosentry::adapters::log_broadcast::LogBroadcast;
use cosentry::adapters::predictor::CalibratedPredictor;
use cosentry::adapters::replay::ReplaySource;
use cosentry::adapters::store::JsonlBlockStore;
use cosentry::app::ports::{ReadingObserver, SensorSource};
use cosentry::app::service::{MonitorService, PREDICTED_CO_KEY, TickOutcome};
use cosentry::config::SystemConfig;
use cosentry::contract::CoAlertContract;
use cosentry::ledger::{BlockPayload, Ledger, PayloadValue};
use cosentry::reading::SensorReading;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cosentry.json".into());
    let config = SystemConfig::load(Path::new(&config_path))?;

    let dataset = Path::new(&config.dataset_path);
    if dataset.exists() {
        info!("SOURCE | dataset {}", config.dataset_path);
        let mut source = CsvSource::open(dataset)
            .with_context(|| format!("opening dataset {}", config.dataset_path))?;
        run(&config, &mut source)
    } else {
        warn!(
            "SOURCE | dataset {} not found, replaying built-in sample events",
            config.dataset_path
        );
        let mut source = ReplaySource::new(sample_events());
        run(&config, &mut source)
    }
}

fn run(config: &SystemConfig, source: &mut impl SensorSource) -> Result<()> {
    let mut store = config.store_path.as_ref().map(JsonlBlockStore::new);

    // Resume a persisted chain when one exists; integrity is re-verified
    // block by block on the way in.
    let resumed = store.as_ref().is_some_and(JsonlBlockStore::exists);
    let ledger = if let (Some(s), true) = (&store, resumed) {
        let blocks = s.load_blocks().context("reading block store")?;
        let ledger = Ledger::from_blocks(blocks).context("verifying persisted chain")?;
        info!(
            "LEDGER | resumed {} blocks from {}",
            ledger.len(),
            s.path().display()
        );
        ledger
    } else {
        Ledger::new()
    };

    let mut service = MonitorService::with_ledger(config, ledger);
    service.register_observer(Box::new(ConsoleObserver));

    // A fresh store starts with the genesis block on disk.
    if let (Some(s), false) = (&mut store, resumed) {
        s.save_block(service.ledger().latest()?)?;
    }

    let mut predictor = CalibratedPredictor::default();
    let mut transport = LogBroadcast::new();
    let mut contract = CoAlertContract::new();
    let interval = Duration::from_millis(config.sample_interval_ms);

    info!("RUN | starting, tick every {} ms", config.sample_interval_ms);
    loop {
        match service.tick(source, &mut predictor, &mut transport, &mut contract)? {
            TickOutcome::Processed(_) => {
                if let Some(s) = &mut store {
                    s.save_block(service.ledger().latest()?)?;
                }
            }
            TickOutcome::Rejected(_) => {} // already logged by the service
            TickOutcome::Exhausted => break,
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    // End-of-run self test, like a detector's power-on check.
    if service.ledger().validate() {
        info!(
            "LEDGER | verified: {} blocks intact",
            service.ledger().len()
        );
    } else {
        warn!("LEDGER | INTEGRITY FAILURE — chain does not verify");
    }
    info!(
        "RUN | {} readings processed, {} alarms raised",
        service.tick_count(),
        contract.alarms_raised()
    );
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Console observer
// ───────────────────────────────────────────────────────────────

/// Logs each processed reading — the stand-in for the dashboard UI.
struct ConsoleObserver;

impl ReadingObserver for ConsoleObserver {
    fn on_reading(&mut self, reading: &SensorReading) {
        let predicted = match reading.metadata.get(PREDICTED_CO_KEY) {
            Some(PayloadValue::Num(ppm)) => format!("{ppm:.2} ppm"),
            _ => "pending".into(),
        };
        info!(
            "EVENT | t={} CO={:.2} ppm predicted={predicted}",
            reading.timestamp, reading.co_ppm
        );
    }
}

// ───────────────────────────────────────────────────────────────
// Sample events
// ───────────────────────────────────────────────────────────────

/// A short built-in scenario for running without a dataset: safe air, a
/// dangerous spike, recovery.
fn sample_events() -> Vec<SensorReading> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let event = |age_secs: u64, co_ppm: f64, sensor_id: &str| {
        let mut metadata = BlockPayload::new();
        metadata.insert("source".into(), PayloadValue::Text("sample".into()));
        metadata.insert("sensor_id".into(), PayloadValue::Text(sensor_id.into()));
        SensorReading {
            timestamp: now.saturating_sub(age_secs),
            co_ppm,
            humidity: 45.0,
            temperature: 21.5,
            flow_rate: 0.8,
            heater_voltage: 5.0,
            sensor_resistances: vec![
                10_400.0, 9_800.0, 11_200.0, 10_050.0, 9_900.0, 10_800.0, 10_300.0, 9_750.0,
                11_050.0, 10_600.0, 9_850.0, 10_150.0, 10_900.0, 10_500.0,
            ],
            metadata,
        }
    };

    vec![
        event(40, 4.5, "ENV02"),
        event(30, 12.0, "ENV02"),
        event(20, 36.2, "GEN01"),
        event(10, 1.5, "ENV02"),
    ]
}
