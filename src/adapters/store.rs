//! Append-only block persistence.
//!
//! One JSON record per line, appended as blocks are created. On startup
//! the full file is read back and handed to
//! [`Ledger::from_blocks`](crate::ledger::Ledger::from_blocks), which
//! re-verifies every digest and link — the store is just bytes at rest,
//! the ledger is the authority on integrity.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::ledger::Block;

pub struct JsonlBlockStore {
    path: PathBuf,
}

impl JsonlBlockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a store file already exists (resume vs fresh start).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append one block to the store.
    pub fn save_block(&mut self, block: &Block) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let record = serde_json::to_string(block).map_err(std::io::Error::other)?;
        writeln!(file, "{record}")?;
        Ok(())
    }

    /// Read every persisted block, oldest first.
    ///
    /// Parse failures are typed with their 1-based line number; integrity
    /// of the *chain* is not checked here — that is `from_blocks`' job.
    pub fn load_blocks(&self) -> Result<Vec<Block>, StoreError> {
        let file = File::open(&self.path)?;
        let mut blocks = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let block: Block =
                serde_json::from_str(&line).map_err(|_| StoreError::Corrupt { line: i + 1 })?;
            blocks.push(block);
        }
        Ok(blocks)
    }
}
