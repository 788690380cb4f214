//! Dispatch audit trail.
//!
//! Test-only, not production logging: a chronological record of what crossed
//! the boundary, so tests can assert on exactly which slot saw which
//! argument words. Records serialize to JSON for snapshotting.

use abi_types::Word;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// One dispatched call as the host saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Registry name of the slot (or multiplexer operation).
    pub slot: String,
    /// Argument words in positional order, exactly as delivered.
    pub args: Vec<Word>,
    /// Raw word the host handed back.
    pub result: Word,
}

/// Chronological log of dispatched calls.
#[derive(Debug, Default)]
pub struct DispatchAuditLog {
    records: Mutex<Vec<DispatchRecord>>,
}

impl DispatchAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, slot: impl Into<String>, args: &[Word], result: Word) {
        self.records.lock().unwrap().push(DispatchRecord {
            slot: slot.into(),
            args: args.to_vec(),
            result,
        });
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<DispatchRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records for one slot name.
    pub fn records_for(&self, slot: &str) -> Vec<DispatchRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.slot == slot)
            .cloned()
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records())
    }
}
