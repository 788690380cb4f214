//! Thread lifecycle adapters.
//!
//! Threads are created, run, and preempted entirely by the host; the hosted
//! side only holds word-sized thread ids. The entry function crosses the
//! boundary as a plain code address the host calls back into.

use crate::{retry_intr, Dispatcher};
use abi_types::{AbiError, Word};
use slot_registry::slots;
use std::convert::Infallible;

/// Entry point the host runs on the new thread. Must use the C calling
/// convention: the host only knows a code address, not a Rust ABI.
pub type ThreadEntry = extern "C" fn(Word) -> Word;

impl Dispatcher {
    /// Asks the host to create a thread running `entry(arg)`. Returns the
    /// host-assigned thread id.
    pub fn thread_create(&self, entry: ThreadEntry, arg: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::THREAD_CREATE, &[entry as Word, arg])
    }

    /// Blocks until the thread exits, returning its result word.
    pub fn thread_join(&self, tid: Word) -> Result<Word, AbiError> {
        retry_intr(|| self.invoke_decoded(slots::THREAD_JOIN, &[tid]))
    }

    /// Ends the calling thread. Does not return; a host that hands control
    /// back has violated the slot contract.
    pub fn thread_exit(&self, result: Word) -> Result<Infallible, AbiError> {
        match self.invoke(slots::THREAD_EXIT, &[result]) {
            Ok(_) => Err(AbiError::DivergingSlotReturned {
                index: slots::THREAD_EXIT,
            }),
            Err(err) => Err(err),
        }
    }

    /// The host-assigned id of the calling thread.
    pub fn thread_self(&self) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::THREAD_SELF, &[])
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use abi_table::SlotTarget;
    use abi_types::{Errno, Word};
    use slot_registry::slots;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn join_retries_through_interrupts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let dispatcher = dispatcher_with(
            slots::THREAD_JOIN,
            SlotTarget::fn1(move |tid| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Errno::EINTR.to_packed()
                } else {
                    tid * 10
                }
            }),
        );

        assert_eq!(dispatcher.thread_join(4), Ok(40 as Word));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
