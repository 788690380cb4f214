//! # Slot Registry
//!
//! Single source of truth for the capability ↔ index ↔ signature mapping of
//! one ABI version.
//!
//! ## Philosophy
//!
//! The registry exists to make two historical defects unrepresentable:
//! - **Signature drift**: the same index meaning different things in
//!   different header revisions. A [`SlotRegistry`] is built once, rejects
//!   duplicate indices at construction, and [`diff`](diff::diff) flags any
//!   cross-version index reuse as a compatibility break.
//! - **Guessable indices**: lookups fail fast with a typed error instead of
//!   falling back to a plausible number.
//!
//! Hosts publish one registry per version; [`v1()`] is the canonical current
//! numbering.

pub mod diff;
pub mod manifest;
mod v1;

pub use diff::{diff, Change, CompatibilityReport};
pub use manifest::RegistryManifest;
pub use v1::{slots, v1, V1_VERSION};

use abi_types::{AbiVersion, RegistryError, Signature, SlotIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One registered capability: symbolic name, stable index, expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// Dotted capability name, e.g. `"mutex.lock"`.
    pub name: String,
    pub index: SlotIndex,
    pub signature: Signature,
}

/// The authoritative slot table of one ABI version.
///
/// Immutable once built; evolution happens by building the next version and
/// diffing it against this one.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    version: AbiVersion,
    requires_scheduler_init: bool,
    by_index: BTreeMap<u16, SlotDescriptor>,
    by_name: HashMap<String, SlotIndex>,
}

impl SlotRegistry {
    pub fn builder(version: AbiVersion) -> RegistryBuilder {
        RegistryBuilder {
            version,
            requires_scheduler_init: false,
            by_index: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn version(&self) -> AbiVersion {
        self.version
    }

    /// Whether bootstrap must invoke the scheduler-init slot before the
    /// program entry point under this version.
    pub fn requires_scheduler_init(&self) -> bool {
        self.requires_scheduler_init
    }

    /// Resolves a capability name to its index. Fails fast on absent names
    /// rather than guessing.
    pub fn resolve(&self, name: &str) -> Result<SlotIndex, RegistryError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownName {
                name: name.to_string(),
                version: self.version,
            })
    }

    /// Returns the registered signature of an index.
    pub fn describe(&self, index: SlotIndex) -> Result<&Signature, RegistryError> {
        self.descriptor(index).map(|d| &d.signature)
    }

    pub fn descriptor(&self, index: SlotIndex) -> Result<&SlotDescriptor, RegistryError> {
        self.by_index
            .get(&index.0)
            .ok_or(RegistryError::UnknownIndex {
                index,
                version: self.version,
            })
    }

    /// Descriptors in ascending index order.
    pub fn descriptors(&self) -> impl Iterator<Item = &SlotDescriptor> {
        self.by_index.values()
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// One past the highest registered index; the size a full table needs.
    pub fn index_span(&self) -> usize {
        self.by_index
            .keys()
            .next_back()
            .map(|&i| i as usize + 1)
            .unwrap_or(0)
    }
}

/// Builder enforcing the in-version invariants at construction time.
pub struct RegistryBuilder {
    version: AbiVersion,
    requires_scheduler_init: bool,
    by_index: BTreeMap<u16, SlotDescriptor>,
    by_name: HashMap<String, SlotIndex>,
}

impl RegistryBuilder {
    pub fn requires_scheduler_init(mut self, required: bool) -> Self {
        self.requires_scheduler_init = required;
        self
    }

    /// Registers one slot. Rejects index 0, duplicate indices, and duplicate
    /// names; there is no way to end up with two signatures on one index.
    pub fn slot(
        mut self,
        name: &str,
        index: SlotIndex,
        signature: Signature,
    ) -> Result<Self, RegistryError> {
        if index.is_reserved() {
            return Err(RegistryError::ReservedIndex);
        }
        if let Some(existing) = self.by_index.get(&index.0) {
            return Err(RegistryError::DuplicateIndex {
                index,
                first: existing.name.clone(),
                second: name.to_string(),
            });
        }
        if let Some(&existing) = self.by_name.get(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
                first: existing,
                second: index,
            });
        }
        self.by_name.insert(name.to_string(), index);
        self.by_index.insert(
            index.0,
            SlotDescriptor {
                name: name.to_string(),
                index,
                signature,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> SlotRegistry {
        SlotRegistry {
            version: self.version,
            requires_scheduler_init: self.requires_scheduler_init,
            by_index: self.by_index,
            by_name: self.by_name,
        }
    }
}
