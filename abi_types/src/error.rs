//! Error taxonomy for the dispatch core.
//!
//! Every failure mode of the boundary has its own typed variant. The one
//! outcome that must be structurally impossible is silent corruption:
//! invoking a slot with the wrong arity, an uncaptured table, or an
//! unimplemented target always surfaces as one of these values.

use crate::{AbiVersion, Errno, Signature, SlotIndex};
use thiserror::Error;

/// Failures surfaced by the call-adapter layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// The index is not part of the captured table's ABI version.
    #[error("{index} is not registered in {version}")]
    UnknownSlot { index: SlotIndex, version: AbiVersion },

    /// The slot resolves to the reserved sentinel; the host does not
    /// implement this capability.
    #[error("{index} is not implemented by this host")]
    Unimplemented { index: SlotIndex },

    /// The call frame does not match the registered signature. The call was
    /// never made.
    #[error("{index} expects {expected} argument words, {given} were supplied")]
    ArityMismatch {
        index: SlotIndex,
        expected: usize,
        given: usize,
    },

    /// The forwarded call itself failed per the host convention. Propagated
    /// verbatim; the adapter never masks or retries these (except `EINTR` on
    /// blocking calls).
    #[error("host reported failure: {0}")]
    Host(#[from] Errno),

    /// A slot declared `-> !` returned to the caller anyway.
    #[error("diverging slot {index} returned to its caller")]
    DivergingSlotReturned { index: SlotIndex },
}

/// Failures of the single-capture table publish.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// A table operation ran before bootstrap captured the base. This is a
    /// programming error in process wiring, and it is fatal.
    #[error("ABI table has not been captured for this process")]
    TableNotCaptured,

    /// `capture` was called a second time. The first table stands; the new
    /// one is rejected rather than silently replacing it.
    #[error("ABI table was already captured for this process")]
    AlreadyCaptured,
}

/// Failures while building or consulting a slot registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no slot named {name:?} in {version}")]
    UnknownName { name: String, version: AbiVersion },

    #[error("{index} is not registered in {version}")]
    UnknownIndex { index: SlotIndex, version: AbiVersion },

    /// Two descriptors claimed the same index within one version. In-version
    /// signature drift is the one forbidden evolution, so this is rejected at
    /// construction, not discovered at call time.
    #[error("{index} registered twice (as {first:?} and {second:?})")]
    DuplicateIndex {
        index: SlotIndex,
        first: String,
        second: String,
    },

    #[error("slot name {name:?} registered twice (at {first} and {second})")]
    DuplicateName {
        name: String,
        first: SlotIndex,
        second: SlotIndex,
    },

    /// Index 0 is the unimplemented sentinel and cannot carry a capability.
    #[error("index 0 is reserved for the unimplemented sentinel")]
    ReservedIndex,

    #[error("manifest rejected: {0}")]
    Manifest(String),
}

/// Failures while binding host targets into a table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableBuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The bound target's arity does not match the registered signature.
    #[error("target for {index} has arity {bound}, registry declares {signature}")]
    SignatureMismatch {
        index: SlotIndex,
        bound: usize,
        signature: Signature,
    },

    /// Binding the sentinel value explicitly is meaningless; leave the slot
    /// unbound instead.
    #[error("cannot bind the unimplemented sentinel to {index}")]
    SentinelBinding { index: SlotIndex },
}

/// Failures of the bootstrap trampoline, each aborting the corresponding
/// step before any undefined indirect call can happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// The hand-off register carried a null table base; there is no plausible
    /// table to capture.
    #[error("process hand-off carried a null ABI table base")]
    NullTableBase,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The ABI version requires cooperative scheduling but the
    /// scheduler-init slot could not be invoked.
    #[error("scheduler initialization failed: {0}")]
    SchedulerInit(AbiError),

    /// The terminate slot returned. The trampoline aborts the process after
    /// reporting this; nothing may execute past terminate.
    #[error("terminate slot returned control to the trampoline")]
    TerminateReturned,
}

/// Failures of the hosted synchronization primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The mutex is not in a lockable state (never initialized, or already
    /// destroyed). Reported, never undefined behavior.
    #[error("mutex handle is not initialized or was destroyed")]
    InvalidMutex,

    /// Destroy was attempted while the mutex is still held.
    #[error("mutex is busy")]
    Busy,

    #[error(transparent)]
    Dispatch(#[from] AbiError),
}

impl From<Errno> for SyncError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::EINVAL => SyncError::InvalidMutex,
            Errno::EBUSY => SyncError::Busy,
            other => SyncError::Dispatch(AbiError::Host(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_error_maps_lifecycle_errnos() {
        assert_eq!(SyncError::from(Errno::EINVAL), SyncError::InvalidMutex);
        assert_eq!(SyncError::from(Errno::EBUSY), SyncError::Busy);
        assert_eq!(
            SyncError::from(Errno::ENOSYS),
            SyncError::Dispatch(AbiError::Host(Errno::ENOSYS))
        );
    }

    #[test]
    fn host_errors_expose_their_errno_as_source() {
        use std::error::Error;

        let err: AbiError = Errno::EBADF.into();
        let source = err.source().expect("Host carries its errno as source");
        assert_eq!(source.to_string(), "EBADF");
    }

    #[test]
    fn errors_render_with_slot_context() {
        let err = AbiError::ArityMismatch {
            index: SlotIndex::new(63),
            expected: 4,
            given: 2,
        };
        assert_eq!(
            err.to_string(),
            "slot#63 expects 4 argument words, 2 were supplied"
        );
    }
}
