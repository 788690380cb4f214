//! # ABI Table
//!
//! The host-provided array of call targets, and the one-shot process capture
//! that makes it reachable from hosted code.
//!
//! ## Philosophy
//!
//! The table replaces the classic `long`-array-of-cast-function-pointers with
//! targets whose arity lives in the type ([`SlotTarget`]). A table can only
//! be produced by a [`TableBuilder`], which checks every binding against the
//! slot registry, so once a table exists the property "every slot is either
//! the sentinel or a target of the registered arity" already holds.
//!
//! The table is immutable for the lifetime of a process: [`capture`] publishes
//! it exactly once, before any other thread exists, and every later reader
//! sees it through [`current`]. There is no mutable global to race on.

pub mod context;
pub mod target;

pub use context::{capture, current, AbiContext};
pub use target::SlotTarget;

use abi_types::{SlotIndex, TableBuildError};
use slot_registry::SlotRegistry;
use std::sync::Arc;

/// The immutable slot table of one process.
///
/// Created by the host before hosted code runs; handed off at entry; only
/// read afterwards. Slot 0 and every unbound or out-of-range index yield the
/// sentinel, never a dangling target.
#[derive(Debug)]
pub struct AbiTable {
    registry: Arc<SlotRegistry>,
    entries: Vec<SlotTarget>,
}

impl AbiTable {
    pub fn builder(registry: Arc<SlotRegistry>) -> TableBuilder {
        let span = registry.index_span();
        TableBuilder {
            registry,
            entries: vec![SlotTarget::Unimplemented; span],
        }
    }

    /// Returns the target bound at `index`, or the sentinel.
    pub fn slot(&self, index: SlotIndex) -> &SlotTarget {
        self.entries
            .get(index.as_usize())
            .unwrap_or(&SlotTarget::Unimplemented)
    }

    /// The registry this table was validated against.
    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn registry_arc(&self) -> Arc<SlotRegistry> {
        Arc::clone(&self.registry)
    }

    /// Number of table entries, bound or sentinel.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Host-side builder validating bindings against the registry.
pub struct TableBuilder {
    registry: Arc<SlotRegistry>,
    entries: Vec<SlotTarget>,
}

impl TableBuilder {
    /// Binds a target to a registered slot.
    ///
    /// Rejects index 0, unregistered indices, explicit sentinel bindings,
    /// and any target whose arity differs from the registered signature.
    pub fn bind(mut self, index: SlotIndex, target: SlotTarget) -> Result<Self, TableBuildError> {
        if index.is_reserved() {
            return Err(TableBuildError::Registry(
                abi_types::RegistryError::ReservedIndex,
            ));
        }
        let signature = self.registry.describe(index)?.clone();
        let bound = match target.arity() {
            Some(arity) => arity,
            None => return Err(TableBuildError::SentinelBinding { index }),
        };
        if bound != signature.arity() {
            return Err(TableBuildError::SignatureMismatch {
                index,
                bound,
                signature,
            });
        }
        self.entries[index.as_usize()] = target;
        Ok(self)
    }

    /// Seals the table. Unbound registered slots stay sentinels.
    pub fn build(self) -> AbiTable {
        AbiTable {
            registry: self.registry,
            entries: self.entries,
        }
    }
}
