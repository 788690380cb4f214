//! ABI version tags.
//!
//! One authoritative slot numbering exists per version. Within a major
//! version, evolution is additive-only: new indices may appear, but a
//! retained index keeps its signature forever. Renumbering or signature
//! changes demand a new major version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag of one ABI table numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbiVersion {
    /// Major version (slot renumbering or signature changes)
    pub major: u32,
    /// Minor version (additive slot introductions only)
    pub minor: u32,
}

impl AbiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Checks whether hosted code compiled against `other` may run against a
    /// host publishing `self`.
    ///
    /// Compatibility rules:
    /// - Same major version = compatible (minor additions never move slots)
    /// - Different major version = incompatible
    pub fn is_compatible_with(&self, other: &AbiVersion) -> bool {
        self.major == other.major
    }

    pub fn is_older_than(&self, other: &AbiVersion) -> bool {
        self.major < other.major || (self.major == other.major && self.minor < other.minor)
    }
}

impl fmt::Display for AbiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "abi-v{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_major_is_compatible() {
        let v1_0 = AbiVersion::new(1, 0);
        let v1_3 = AbiVersion::new(1, 3);
        let v2_0 = AbiVersion::new(2, 0);
        assert!(v1_0.is_compatible_with(&v1_3));
        assert!(!v1_3.is_compatible_with(&v2_0));
        assert!(v1_0.is_older_than(&v1_3));
        assert!(v1_3.is_older_than(&v2_0));
    }
}
