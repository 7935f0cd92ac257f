//! Alert-frame codec.
//!
//! Wire format (13 bytes, all multi-byte fields big-endian):
//!
//! ```text
//! ┌────────────┬─────────────┬───────────┬──────┬──────┬───────┐
//! │ device_id  │ timestamp   │ co_level  │ hum  │ temp │ alert │
//! │ u32        │ u32 (secs)  │ u16 ×100  │ u8   │ i8   │ u8    │
//! └────────────┴─────────────┴───────────┴──────┴──────┴───────┘
//! ```
//!
//! Built for constrained-bandwidth broadcast: encoding clips out-of-range
//! values instead of rejecting them (source telemetry is not adversarial),
//! and decoding tolerates trailing bytes so future revisions can extend
//! the frame without breaking old receivers.

use crate::alert::ALERT_THRESHOLD_PPM;
use crate::error::CodecError;
use crate::reading::SensorReading;

/// Fixed frame length. Byte order and field widths are part of the
/// external contract — receivers parse this layout bit-exactly.
pub const FRAME_LEN: usize = 13;

/// Decoded view of one broadcast alert frame.
///
/// Fields are stored un-rescaled; use [`AlertFrame::co_ppm`] to recover
/// the concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertFrame {
    pub device_id: u32,
    /// Unix seconds, truncated to 32 bits.
    pub timestamp: u32,
    /// CO concentration × 100 (truncated, saturating at u16::MAX).
    pub co_level: u16,
    /// Relative humidity %, truncated.
    pub humidity: u8,
    /// Temperature °C, rounded.
    pub temperature: i8,
    /// 1 if the reading was at or above the alert threshold.
    pub alert_flag: u8,
}

impl AlertFrame {
    /// Build a frame from a reading. Never fails: every field clips to its
    /// wire range.
    pub fn from_reading(reading: &SensorReading, device_id: u32) -> Self {
        Self {
            device_id,
            timestamp: reading.timestamp as u32,
            // `as` on floats saturates, and truncates toward zero — exactly
            // the floor-then-clip rule of the wire contract.
            co_level: (reading.co_ppm * 100.0) as u16,
            humidity: reading.humidity as u8,
            temperature: reading.temperature.round() as i8,
            alert_flag: u8::from(reading.co_ppm >= ALERT_THRESHOLD_PPM),
        }
    }

    /// Serialize into the fixed 13-byte layout.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut buf = [0u8; FRAME_LEN];
        buf[0..4].copy_from_slice(&self.device_id.to_be_bytes());
        buf[4..8].copy_from_slice(&self.timestamp.to_be_bytes());
        buf[8..10].copy_from_slice(&self.co_level.to_be_bytes());
        buf[10] = self.humidity;
        // Signed byte stored as its unsigned bit pattern.
        buf[11] = self.temperature as u8;
        buf[12] = self.alert_flag;
        buf
    }

    /// Parse a frame from raw bytes.
    ///
    /// Fails only when fewer than [`FRAME_LEN`] bytes are present; no
    /// semantic validation is performed and trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < FRAME_LEN {
            return Err(CodecError::TruncatedFrame { len: data.len() });
        }
        Ok(Self {
            device_id: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
            timestamp: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            co_level: u16::from_be_bytes([data[8], data[9]]),
            humidity: data[10],
            temperature: data[11] as i8,
            alert_flag: data[12],
        })
    }

    /// Recover the CO concentration in ppm (lossy: two decimal places).
    pub fn co_ppm(&self) -> f64 {
        f64::from(self.co_level) / 100.0
    }
}
