//! # ABI Types
//!
//! This crate defines the fundamental types shared by every HostBridge crate.
//!
//! ## Philosophy
//!
//! The ABI boundary is a flat array of word-sized call targets. Everything
//! that crosses it is a machine word, and everything that *describes* it is
//! strongly typed:
//! - **Slots, not addresses**: callers name a [`SlotIndex`], never a pointer.
//! - **Signatures are data**: a [`Signature`] records argument widths and the
//!   return class, so mismatched calls are rejected instead of misinterpreted.
//! - **Failures are typed**: every way a dispatch can go wrong has its own
//!   error variant; silently invoking a misread pointer is not representable.
//!
//! ## Key Types
//!
//! - [`Word`]: the machine-word currency of the ABI boundary
//! - [`SlotIndex`]: a numbered entry in the ABI table
//! - [`Signature`]: arity, argument widths, and return class of a slot
//! - [`AbiVersion`]: version tag governing slot-numbering evolution
//! - [`Errno`]: host failure discriminator carried through packed returns

pub mod errno;
pub mod error;
pub mod signature;
pub mod version;

pub use errno::{decode_packed, Errno};
pub use error::{
    AbiError, BootstrapError, CaptureError, RegistryError, SyncError, TableBuildError,
};
pub use signature::{ParamWidth, ReturnClass, Signature};
pub use version::AbiVersion;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The machine word exchanged across the ABI boundary.
///
/// Every slot argument and every slot return value is one of these. Wider
/// values (64-bit floats, pointers, lengths) are carried bit-for-bit.
pub type Word = usize;

/// Index of one slot in the ABI table.
///
/// Index 0 is reserved in every ABI version and always denotes
/// "unimplemented"; a host may never bind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotIndex(pub u16);

impl SlotIndex {
    /// The reserved sentinel index.
    pub const RESERVED: SlotIndex = SlotIndex(0);

    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// True for the reserved "unimplemented" index.
    pub const fn is_reserved(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

impl From<u16> for SlotIndex {
    fn from(index: u16) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_index_is_zero() {
        assert!(SlotIndex::RESERVED.is_reserved());
        assert!(!SlotIndex::new(2).is_reserved());
        assert_eq!(SlotIndex::new(63).as_usize(), 63);
    }

    #[test]
    fn slot_index_serializes_as_plain_number() {
        let json = serde_json::to_string(&SlotIndex::new(40)).unwrap();
        assert_eq!(json, "40");
    }
}
