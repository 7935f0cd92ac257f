//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the ingestion pipeline for CoSentry: window
//! buffering, predictor invocation, ledger persistence, contract
//! execution, and the alert broadcast decision. All interaction with the
//! outside world happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without sensors, models, or radios.

pub mod ports;
pub mod service;
