//! Cross-version registry comparison.
//!
//! Evolution policy: within one major version the numbering only grows.
//! Renumbering a capability or changing the signature of a retained index is
//! legal only across a major-version boundary, and this module is what makes
//! such drift visible instead of silent.

use crate::SlotRegistry;
use abi_types::{Signature, SlotIndex};
use serde::{Deserialize, Serialize};

/// One observed difference between two registry versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// A new capability appeared at a previously unused index.
    Added { name: String, index: SlotIndex },
    /// A capability disappeared.
    Removed { name: String, index: SlotIndex },
    /// A capability kept its name but moved to a different index.
    Renumbered {
        name: String,
        old_index: SlotIndex,
        new_index: SlotIndex,
    },
    /// A retained index changed its expected signature. This is the one
    /// forbidden in-place evolution; it always requires a new major version.
    SignatureDrift {
        index: SlotIndex,
        old_name: String,
        new_name: String,
        old: Signature,
        new: Signature,
    },
    /// A retained index kept its signature but now names a different
    /// capability. Already-compiled callers would reach the wrong host
    /// operation without any shape check firing, so this is as breaking as
    /// signature drift.
    Repurposed {
        index: SlotIndex,
        old_name: String,
        new_name: String,
    },
}

/// Classified differences between an old and a new registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub changes: Vec<Change>,
}

impl CompatibilityReport {
    /// True when the new version only adds capabilities.
    pub fn is_additive_only(&self) -> bool {
        self.changes
            .iter()
            .all(|c| matches!(c, Change::Added { .. }))
    }

    /// True when publishing the new registry under the old major version
    /// would break already-compiled hosted code.
    pub fn requires_new_major(&self) -> bool {
        self.changes.iter().any(|c| {
            matches!(
                c,
                Change::Removed { .. }
                    | Change::Renumbered { .. }
                    | Change::SignatureDrift { .. }
                    | Change::Repurposed { .. }
            )
        })
    }

    pub fn drifted_indices(&self) -> Vec<SlotIndex> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                Change::SignatureDrift { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }
}

/// Compares two registries and classifies every difference.
pub fn diff(old: &SlotRegistry, new: &SlotRegistry) -> CompatibilityReport {
    let mut changes = Vec::new();

    for old_desc in old.descriptors() {
        match new.descriptor(old_desc.index) {
            Ok(new_desc) => {
                if new_desc.signature != old_desc.signature {
                    changes.push(Change::SignatureDrift {
                        index: old_desc.index,
                        old_name: old_desc.name.clone(),
                        new_name: new_desc.name.clone(),
                        old: old_desc.signature.clone(),
                        new: new_desc.signature.clone(),
                    });
                } else if new_desc.name != old_desc.name {
                    changes.push(Change::Repurposed {
                        index: old_desc.index,
                        old_name: old_desc.name.clone(),
                        new_name: new_desc.name.clone(),
                    });
                }
            }
            Err(_) => match new.resolve(&old_desc.name) {
                Ok(new_index) => changes.push(Change::Renumbered {
                    name: old_desc.name.clone(),
                    old_index: old_desc.index,
                    new_index,
                }),
                Err(_) => changes.push(Change::Removed {
                    name: old_desc.name.clone(),
                    index: old_desc.index,
                }),
            },
        }
    }

    for new_desc in new.descriptors() {
        let retained_index = old.descriptor(new_desc.index).is_ok();
        let renumbered = old.resolve(&new_desc.name).is_ok();
        if !retained_index && !renumbered {
            changes.push(Change::Added {
                name: new_desc.name.clone(),
                index: new_desc.index,
            });
        }
    }

    CompatibilityReport { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_types::{AbiVersion, ReturnClass};

    fn registry(major: u32, slots: &[(&str, u16, usize)]) -> SlotRegistry {
        let mut builder = SlotRegistry::builder(AbiVersion::new(major, 0));
        for &(name, index, arity) in slots {
            builder = builder
                .slot(name, SlotIndex::new(index), Signature::words(arity, ReturnClass::Word))
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn pure_addition_is_additive_only() {
        let old = registry(1, &[("proc.terminate", 2, 1)]);
        let new = registry(1, &[("proc.terminate", 2, 1), ("io.putchar", 10, 1)]);

        let report = diff(&old, &new);
        assert!(report.is_additive_only());
        assert!(!report.requires_new_major());
        assert_eq!(report.changes.len(), 1);
    }

    #[test]
    fn signature_drift_on_retained_index_requires_new_major() {
        // The historical defect: one revision declares an index with one
        // shape, the next revision reuses the same index with another.
        let old = registry(1, &[("fs.rename", 36, 2)]);
        let new = registry(1, &[("fs.rename", 36, 3)]);

        let report = diff(&old, &new);
        assert!(report.requires_new_major());
        assert_eq!(report.drifted_indices(), vec![SlotIndex::new(36)]);
    }

    #[test]
    fn index_reuse_by_another_capability_is_drift() {
        let old = registry(1, &[("fs.rename", 36, 2)]);
        let new = registry(2, &[("fs.unlink", 36, 1)]);

        let report = diff(&old, &new);
        assert!(report.requires_new_major());
        assert!(matches!(
            &report.changes[..],
            [Change::SignatureDrift { old_name, new_name, .. }]
                if old_name == "fs.rename" && new_name == "fs.unlink"
        ));
    }

    #[test]
    fn index_reuse_with_identical_signature_is_still_breaking() {
        // Same shape, different meaning: the arity check would never fire,
        // so the report has to carry this on its own.
        let old = registry(1, &[("fs.rename", 36, 2)]);
        let new = registry(2, &[("fs.link", 36, 2)]);

        let report = diff(&old, &new);
        assert!(!report.is_additive_only());
        assert!(report.requires_new_major());
        assert!(matches!(
            &report.changes[..],
            [Change::Repurposed { old_name, new_name, .. }]
                if old_name == "fs.rename" && new_name == "fs.link"
        ));
    }

    #[test]
    fn moved_capability_is_renumbered_not_removed() {
        let old = registry(1, &[("fs.rename", 36, 2)]);
        let new = registry(2, &[("fs.rename", 44, 2)]);

        let report = diff(&old, &new);
        assert!(report.requires_new_major());
        assert!(matches!(
            &report.changes[..],
            [Change::Renumbered { old_index, new_index, .. }]
                if *old_index == SlotIndex::new(36) && *new_index == SlotIndex::new(44)
        ));
    }

    #[test]
    fn removed_capability_is_reported() {
        let old = registry(1, &[("fs.rename", 36, 2), ("io.putchar", 10, 1)]);
        let new = registry(2, &[("io.putchar", 10, 1)]);

        let report = diff(&old, &new);
        assert!(report.requires_new_major());
        assert!(report
            .changes
            .iter()
            .any(|c| matches!(c, Change::Removed { name, .. } if name == "fs.rename")));
    }
}
