//! Driven adapters for the [`app::ports`](crate::app::ports) traits.
//!
//! Everything here is replaceable I/O glue: dataset readers, the baseline
//! predictor, the log-backed broadcast transport, and block persistence.
//! The domain core in [`app`](crate::app) depends only on the port traits.

pub mod csv_source;
pub mod log_broadcast;
pub mod predictor;
pub mod replay;
pub mod store;
