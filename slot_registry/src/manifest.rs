//! JSON manifests: the publishable form of a registry.
//!
//! A host ships one manifest per ABI version so hosted toolchains can verify
//! the numbering they compiled against. Import re-runs the builder, so a
//! hand-edited manifest with duplicate indices is rejected the same way a
//! coding error would be.

use crate::{SlotDescriptor, SlotRegistry};
use abi_types::{AbiVersion, RegistryError};
use serde::{Deserialize, Serialize};

/// Serialized registry contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryManifest {
    pub version: AbiVersion,
    pub requires_scheduler_init: bool,
    pub slots: Vec<SlotDescriptor>,
}

impl RegistryManifest {
    pub fn from_registry(registry: &SlotRegistry) -> Self {
        Self {
            version: registry.version(),
            requires_scheduler_init: registry.requires_scheduler_init(),
            slots: registry.descriptors().cloned().collect(),
        }
    }

    /// Rebuilds a validated registry from manifest contents.
    pub fn into_registry(self) -> Result<SlotRegistry, RegistryError> {
        let mut builder = SlotRegistry::builder(self.version)
            .requires_scheduler_init(self.requires_scheduler_init);
        for descriptor in self.slots {
            builder = builder.slot(&descriptor.name, descriptor.index, descriptor.signature)?;
        }
        Ok(builder.build())
    }
}

/// Serializes a registry to its manifest JSON.
pub fn to_json(registry: &SlotRegistry) -> Result<String, RegistryError> {
    serde_json::to_string_pretty(&RegistryManifest::from_registry(registry))
        .map_err(|err| RegistryError::Manifest(err.to_string()))
}

/// Parses and validates a manifest JSON into a registry.
pub fn from_json(json: &str) -> Result<SlotRegistry, RegistryError> {
    let manifest: RegistryManifest =
        serde_json::from_str(json).map_err(|err| RegistryError::Manifest(err.to_string()))?;
    manifest.into_registry()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v1;

    #[test]
    fn manifest_round_trips_the_v1_registry() {
        let registry = v1();
        let json = to_json(&registry).unwrap();
        let rebuilt = from_json(&json).unwrap();

        assert_eq!(rebuilt.version(), registry.version());
        assert_eq!(rebuilt.len(), registry.len());
        assert!(rebuilt.requires_scheduler_init());
        for descriptor in registry.descriptors() {
            assert_eq!(rebuilt.descriptor(descriptor.index).unwrap(), descriptor);
        }
    }

    #[test]
    fn corrupt_manifest_is_rejected_not_guessed() {
        assert!(matches!(
            from_json("{\"version\":"),
            Err(RegistryError::Manifest(_))
        ));
    }

    #[test]
    fn manifest_with_duplicate_index_fails_validation() {
        let registry = v1();
        let mut manifest = RegistryManifest::from_registry(&registry);
        let mut dup = manifest.slots[0].clone();
        dup.name = "rogue.copy".to_string();
        manifest.slots.push(dup);

        assert!(matches!(
            manifest.into_registry(),
            Err(RegistryError::DuplicateIndex { .. })
        ));
    }
}
