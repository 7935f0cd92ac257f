//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a slice of the system
//! against recording mock adapters. Everything runs on the host with no
//! sensors, model runtime, or radio.

mod mock_adapters;
mod pipeline_tests;
mod persistence_tests;
