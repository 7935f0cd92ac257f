//! Tamper-evident append-only ledger.
//!
//! A single-writer chain of hash-linked [`Block`]s. Every block's `hash`
//! is computed exactly once, at construction, over its other five fields;
//! `previous_hash` of block *i* equals `hash` of block *i − 1*. Any
//! later mutation of a stored field is caught by [`Ledger::validate`].
//!
//! This is **not** a consensus system: one local writer, no peers, no
//! signing, no fork choice. The chain grows without bound in memory —
//! a known scalability tradeoff of the design, not a defect.

pub mod digest;

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// `previous_hash` sentinel carried by the genesis block.
const GENESIS_PREVIOUS_HASH: &str = "0";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A tagged payload value: number, text, or a series of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Num(f64),
    Text(String),
    Series(Vec<f64>),
}

/// Block payload mapping. `BTreeMap` fixes key order, which the digest
/// canonicalization depends on.
pub type BlockPayload = BTreeMap<String, PayloadValue>;

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One immutable, hash-linked ledger record.
///
/// Fields are private: the payload is captured (cloned) at creation and
/// the hash is never recomputed in place, so the digest invariant cannot
/// be broken through this type's API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    /// Unix seconds at construction.
    timestamp: u64,
    payload: BlockPayload,
    previous_hash: String,
    nonce: u64,
    hash: String,
}

impl Block {
    fn new(
        index: u64,
        timestamp: u64,
        payload: BlockPayload,
        previous_hash: String,
        nonce: u64,
    ) -> Self {
        let hash = digest::block_digest(index, timestamp, &payload, &previous_hash, nonce);
        Self {
            index,
            timestamp,
            payload,
            previous_hash,
            nonce,
            hash,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &BlockPayload {
        &self.payload
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Recompute the digest from the stored fields and compare with the
    /// stored hash. The tamper-detection primitive for a single block.
    pub fn is_intact(&self) -> bool {
        digest::block_digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_hash,
            self.nonce,
        ) == self.hash
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Append-only chain of blocks, created with exactly one genesis block.
///
/// Owned exclusively by the writer that created it; callers exposing reads
/// from other threads must snapshot or lock externally — `append` is not
/// linearizable with concurrent unprotected reads.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
}

impl Ledger {
    /// Create a ledger containing one genesis block (index 0,
    /// `previous_hash` "0", empty payload, nonce 0).
    pub fn new() -> Self {
        let genesis = Block::new(
            0,
            unix_now_secs(),
            BlockPayload::new(),
            GENESIS_PREVIOUS_HASH.into(),
            0,
        );
        Self {
            chain: vec![genesis],
        }
    }

    /// Reconstruct a ledger from previously persisted blocks.
    ///
    /// The input is untrusted: every block's digest (genesis included) and
    /// every link is verified before the chain is accepted.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, LedgerError> {
        if blocks.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        if !blocks[0].is_intact() {
            return Err(LedgerError::InvalidChain { index: 0 });
        }
        for i in 1..blocks.len() {
            if !blocks[i].is_intact() || blocks[i].previous_hash != blocks[i - 1].hash {
                return Err(LedgerError::InvalidChain {
                    index: blocks[i].index,
                });
            }
        }
        Ok(Self { chain: blocks })
    }

    /// The tail block.
    ///
    /// `EmptyChain` is typed but unreachable in practice — construction
    /// always seeds the genesis block and nothing removes blocks.
    pub fn latest(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Append a new block carrying `payload`, linked to the current tail.
    ///
    /// Index and `previous_hash` derive from the tail; the timestamp is
    /// the current unix time; nonce is 0 (no proof-of-work here).
    pub fn append(&mut self, payload: BlockPayload) -> Result<&Block, LedgerError> {
        let (index, previous_hash) = {
            let tail = self.latest()?;
            (tail.index + 1, tail.hash.clone())
        };
        let block = Block::new(index, unix_now_secs(), payload, previous_hash, 0);
        self.chain.push(block);
        self.latest()
    }

    /// Verify the whole chain: every block's stored hash must match a fresh
    /// digest of its stored fields, and every `previous_hash` must match
    /// its predecessor. O(n) single pass, no mutation, `false` on the
    /// first violation.
    pub fn validate(&self) -> bool {
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let previous = &self.chain[i - 1];
            if !current.is_intact() {
                return false;
            }
            if current.previous_hash != previous.hash {
                return false;
            }
        }
        true
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The full chain, oldest first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
