//! Unified error types for the CoSentry core.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! ingestion loop's error handling uniform. Nothing here is process-fatal:
//! data-integrity errors are reported to the caller, predictor failures
//! degrade to a pending marker, and contract failures are logged and
//! swallowed by the service.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Wire-frame encode/decode failed.
    Codec(CodecError),
    /// A sensor reading failed a data-integrity check.
    Reading(ReadingError),
    /// Ledger construction or access failed.
    Ledger(LedgerError),
    /// Block persistence failed.
    Store(StoreError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Reading(e) => write!(f, "reading: {e}"),
            Self::Ledger(e) => write!(f, "ledger: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// Errors from the 13-byte alert-frame codec.
///
/// Encoding never fails — out-of-range values are clipped, not rejected.
/// Decoding fails only on short input; trailing bytes are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Frame shorter than the fixed 13-byte layout.
    TruncatedFrame { len: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedFrame { len } => {
                write!(f, "truncated frame: {len} bytes, need 13")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Reading errors
// ---------------------------------------------------------------------------

/// Data-integrity errors on an incoming sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingError {
    /// Feature vector length differs from the expected 18.
    /// Upstream data fault — the reading is dropped, the pipeline continues.
    FeatureLength { got: usize },
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeatureLength { got } => {
                write!(f, "expected 18 features, got {got}")
            }
        }
    }
}

impl std::error::Error for ReadingError {}

impl From<ReadingError> for Error {
    fn from(e: ReadingError) -> Self {
        Self::Reading(e)
    }
}

// ---------------------------------------------------------------------------
// Ledger errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The chain has no blocks. Unreachable after construction — the genesis
    /// block exists for the ledger's whole lifetime.
    EmptyChain,
    /// A persisted chain failed digest or linkage verification at `index`.
    InvalidChain { index: u64 },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChain => write!(f, "empty chain"),
            Self::InvalidChain { index } => {
                write!(f, "invalid chain at block {index}")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<LedgerError> for Error {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from the block persistence adapter.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying file I/O failed.
    Io(std::io::Error),
    /// A persisted record could not be parsed (1-based line number).
    Corrupt { line: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Corrupt { line } => write!(f, "corrupt record at line {line}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
