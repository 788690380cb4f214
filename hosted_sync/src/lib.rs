//! # Hosted Sync
//!
//! Synchronization primitives whose blocking happens on the host side of the
//! ABI table: an opaque-handle mutex over the dedicated mutex slots, and a
//! futex-style compare-and-block over the generic multiplexer.
//!
//! ## Philosophy
//!
//! The hosted side never spins and never owns a wait queue. A mutex is four
//! slot calls around a host-owned handle; a futex wait is "block me unless
//! this word already changed", decided atomically by the host. Lifecycle
//! misuse (locking a destroyed mutex, destroying a held one) is reported as a
//! typed [`SyncError`], never undefined behavior.

pub mod futex;

use abi_types::{AbiError, Errno, SyncError, Word};
use call_adapter::Dispatcher;
use slot_registry::slots;

fn map_sync(err: AbiError) -> SyncError {
    match err {
        AbiError::Host(errno) => SyncError::from(errno),
        other => SyncError::Dispatch(other),
    }
}

/// Retries a blocking sync call while the host reports `EINTR`.
fn retry_intr(mut call: impl FnMut() -> Result<Word, AbiError>) -> Result<Word, SyncError> {
    loop {
        match call() {
            Err(AbiError::Host(Errno::EINTR)) => continue,
            other => return other.map_err(map_sync),
        }
    }
}

/// A mutex whose state lives entirely on the host, named by an opaque
/// word-sized handle.
///
/// The handle means nothing to the hosted side; every operation is a slot
/// call. Dropping a `HostedMutex` without [`destroy`](Self::destroy) leaks
/// the host-side object, matching the explicit-lifecycle contract.
#[derive(Debug, Clone)]
pub struct HostedMutex {
    handle: Word,
    dispatcher: Dispatcher,
}

impl HostedMutex {
    /// Asks the host to create a mutex, returning its handle wrapper.
    pub fn init(dispatcher: &Dispatcher) -> Result<Self, SyncError> {
        let handle = dispatcher
            .invoke_decoded(slots::MUTEX_INIT, &[])
            .map_err(map_sync)?;
        Ok(Self {
            handle,
            dispatcher: dispatcher.clone(),
        })
    }

    /// The host-assigned handle.
    pub fn handle(&self) -> Word {
        self.handle
    }

    /// Blocks on the host until this mutex is held by the calling thread.
    pub fn lock(&self) -> Result<(), SyncError> {
        retry_intr(|| self.dispatcher.invoke_decoded(slots::MUTEX_LOCK, &[self.handle]))?;
        Ok(())
    }

    /// Releases the mutex.
    pub fn unlock(&self) -> Result<(), SyncError> {
        self.dispatcher
            .invoke_decoded(slots::MUTEX_UNLOCK, &[self.handle])
            .map_err(map_sync)?;
        Ok(())
    }

    /// Destroys the host-side mutex. Consumes the wrapper so the dead handle
    /// cannot be reused from this side; a still-held mutex is refused with
    /// [`SyncError::Busy`] and the wrapper is lost with it.
    pub fn destroy(self) -> Result<(), SyncError> {
        self.dispatcher
            .invoke_decoded(slots::MUTEX_DESTROY, &[self.handle])
            .map_err(map_sync)?;
        Ok(())
    }
}
