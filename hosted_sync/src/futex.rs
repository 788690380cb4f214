//! Futex-style compare-and-block over the generic multiplexer.
//!
//! The wakeup-safety contract lives on the host: the comparison of `*addr`
//! against `expected` and the decision to block are one atomic step there, so
//! a waker that stores and wakes between our load and our wait call cannot
//! strand the waiter.

use crate::map_sync;
use abi_types::{AbiError, Errno, SyncError, Word};
use call_adapter::{nr, Dispatcher};
use std::sync::atomic::AtomicU32;

pub use call_adapter::nr::{FUTEX_WAIT, FUTEX_WAKE};

/// Blocks until `addr` is woken, unless `*addr != expected` at the moment the
/// host examines it.
///
/// Returning `Ok` means "recheck your predicate": either a wakeup arrived or
/// the word had already changed (`EAGAIN` from the host, folded into success
/// here). Interrupted waits are retried; the host re-examines the word on
/// every retry, so a wakeup that raced the interrupt is not lost.
pub fn wait(dispatcher: &Dispatcher, addr: &AtomicU32, expected: u32) -> Result<(), SyncError> {
    loop {
        let result = dispatcher.call3(
            nr::FUTEX,
            addr.as_ptr() as Word,
            FUTEX_WAIT,
            expected as Word,
        );
        match result {
            Ok(_) => return Ok(()),
            Err(AbiError::Host(Errno::EAGAIN)) => return Ok(()),
            Err(AbiError::Host(Errno::EINTR)) => continue,
            Err(other) => return Err(map_sync(other)),
        }
    }
}

/// Wakes up to `count` waiters blocked on `addr`, returning how many were
/// actually woken.
pub fn wake(dispatcher: &Dispatcher, addr: &AtomicU32, count: usize) -> Result<usize, SyncError> {
    dispatcher
        .call3(nr::FUTEX, addr.as_ptr() as Word, FUTEX_WAKE, count as Word)
        .map_err(map_sync)
}

/// Wakes one waiter.
pub fn wake_one(dispatcher: &Dispatcher, addr: &AtomicU32) -> Result<usize, SyncError> {
    wake(dispatcher, addr, 1)
}

/// Wakes every waiter.
pub fn wake_all(dispatcher: &Dispatcher, addr: &AtomicU32) -> Result<usize, SyncError> {
    wake(dispatcher, addr, usize::MAX)
}
