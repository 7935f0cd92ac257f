//! Block digest codec.
//!
//! Deterministic canonicalization + SHA-256 of a block's fields, rendered
//! as lowercase hex. The canonical form is an explicit byte layout:
//!
//! ```text
//! <index> '|' <timestamp> '|' <payload> '|' <previous_hash> '|' <nonce>
//! ```
//!
//! where `<payload>` is a sequence of `key=value;` records in sorted key
//! order. Text values are written escaped-and-quoted, series as
//! `[a,b,...]`. Key order is fixed by the `BTreeMap` payload type, so the
//! same logical payload always digests identically — mapping iteration
//! order can never leak into the hash.

use core::fmt::Write;

use sha2::{Digest, Sha256};

use super::{BlockPayload, PayloadValue};

/// Compute the digest over a block's five identity fields.
///
/// Pure and deterministic; always succeeds for well-formed inputs.
pub fn block_digest(
    index: u64,
    timestamp: u64,
    payload: &BlockPayload,
    previous_hash: &str,
    nonce: u64,
) -> String {
    let mut material = String::with_capacity(96);
    let _ = write!(material, "{index}|{timestamp}|");
    write_canonical_payload(&mut material, payload);
    let _ = write!(material, "|{previous_hash}|{nonce}");

    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    hex::encode(hasher.finalize())
}

fn write_canonical_payload(out: &mut String, payload: &BlockPayload) {
    // BTreeMap iterates in sorted key order.
    for (key, value) in payload {
        out.push_str(key);
        out.push('=');
        write_canonical_value(out, value);
        out.push(';');
    }
}

fn write_canonical_value(out: &mut String, value: &PayloadValue) {
    match value {
        PayloadValue::Num(n) => {
            let _ = write!(out, "{n}");
        }
        // Escaped + quoted, so text containing '=' or ';' cannot collide
        // with the record framing.
        PayloadValue::Text(s) => {
            let _ = write!(out, "{s:?}");
        }
        PayloadValue::Series(xs) => {
            out.push('[');
            for (i, x) in xs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{x}");
            }
            out.push(']');
        }
    }
}
