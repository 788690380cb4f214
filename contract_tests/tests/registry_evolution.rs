//! Versioning Policy Contract Tests
//!
//! Within a major version the numbering only grows; renumbering or signature
//! drift on a retained index demands a new major version, and the diff
//! report is what enforces that at release time.

use abi_types::{AbiVersion, ReturnClass, Signature, SlotIndex};
use slot_registry::{diff, slots, v1, Change, SlotRegistry, V1_VERSION};

#[test]
fn v1_against_itself_reports_nothing() {
    let report = diff::diff(&v1(), &v1());
    assert!(report.changes.is_empty());
    assert!(report.is_additive_only());
    assert!(!report.requires_new_major());
}

#[test]
fn additive_minor_revision_keeps_the_major() {
    let old = v1();

    // A hypothetical v1.1 that adds one capability in the fs family gap.
    let manifest = slot_registry::manifest::RegistryManifest::from_registry(&old);
    let mut next = SlotRegistry::builder(AbiVersion::new(1, 1));
    for descriptor in manifest.slots {
        next = next
            .slot(&descriptor.name, descriptor.index, descriptor.signature)
            .unwrap();
    }
    let next = next
        .slot(
            "fs.unlink",
            SlotIndex::new(37),
            Signature::words(1, ReturnClass::Word),
        )
        .unwrap()
        .build();

    let report = diff::diff(&old, &next);
    assert!(report.is_additive_only());
    assert!(!report.requires_new_major());
    assert!(next.version().is_compatible_with(&V1_VERSION));
}

#[test]
fn reusing_a_retained_index_for_a_new_shape_demands_a_new_major() {
    let old = v1();

    // A draft that reuses the rename index for a three-word capability.
    let manifest = slot_registry::manifest::RegistryManifest::from_registry(&old);
    let mut draft = SlotRegistry::builder(AbiVersion::new(1, 2));
    for descriptor in manifest.slots {
        if descriptor.index == slots::FS_RENAME {
            draft = draft
                .slot(
                    "fs.renameat",
                    descriptor.index,
                    Signature::words(3, ReturnClass::Word),
                )
                .unwrap();
        } else {
            draft = draft
                .slot(&descriptor.name, descriptor.index, descriptor.signature)
                .unwrap();
        }
    }
    let draft = draft.build();

    let report = diff::diff(&old, &draft);
    assert!(report.requires_new_major());
    assert_eq!(report.drifted_indices(), vec![slots::FS_RENAME]);
    assert!(report.changes.iter().any(|c| matches!(
        c,
        Change::SignatureDrift { old_name, new_name, .. }
            if old_name == "fs.rename" && new_name == "fs.renameat"
    )));
}

#[test]
fn major_bump_is_incompatible_by_construction() {
    let v2 = AbiVersion::new(2, 0);
    assert!(!v2.is_compatible_with(&V1_VERSION));
    assert!(V1_VERSION.is_older_than(&v2));
}

#[test]
fn published_manifest_round_trips_through_json() {
    let registry = v1();
    let json = slot_registry::manifest::to_json(&registry).unwrap();
    let rebuilt = slot_registry::manifest::from_json(&json).unwrap();

    assert_eq!(rebuilt.version(), V1_VERSION);
    assert_eq!(rebuilt.resolve("mutex.lock").unwrap(), slots::MUTEX_LOCK);
    assert!(diff::diff(&registry, &rebuilt).changes.is_empty());
}
