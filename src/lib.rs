//! CoSentry core library.
//!
//! Ingests periodic multi-sensor carbon-monoxide telemetry, records every
//! reading in a tamper-evident hash-chained ledger, maintains rolling
//! feature windows for a predictive model, and drives a compact 13-byte
//! alert broadcast when the hazard threshold is crossed. Sensors, models,
//! transports, and notification sinks plug in through the port traits in
//! [`app::ports`]; reference adapters live in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod contract;
pub mod error;
pub mod frame;
pub mod ledger;
pub mod reading;
pub mod window;
