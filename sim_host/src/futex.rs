//! Futex wait queues with the compare-and-block guarantee.
//!
//! The invariant that makes futexes usable: the load of the watched word and
//! the decision to sleep happen under the same queue lock that a waker must
//! take to publish tokens. A waker that stores a new value and then wakes can
//! never slip between our comparison and our sleep.

use abi_types::{Errno, Word};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};

#[derive(Default)]
struct QueueState {
    waiters: usize,
    tokens: usize,
}

#[derive(Default)]
struct WaitQueue {
    state: Mutex<QueueState>,
    condvar: Condvar,
}

/// All wait queues of the simulated host, keyed by watched address.
#[derive(Default)]
pub struct FutexSpace {
    queues: Mutex<HashMap<Word, Arc<WaitQueue>>>,
}

impl FutexSpace {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, addr: Word) -> Arc<WaitQueue> {
        Arc::clone(
            self.queues
                .lock()
                .unwrap()
                .entry(addr)
                .or_insert_with(|| Arc::new(WaitQueue::default())),
        )
    }

    /// Blocks until woken, unless the word at `addr` no longer holds
    /// `expected`. Returns 0 on wakeup, packed `EAGAIN` on a changed word.
    ///
    /// `addr` must point at a live `AtomicU32` in the calling process; the
    /// simulated host shares an address space with its hosted side, so the
    /// raw word from the multiplexer frame is directly dereferenceable.
    pub fn wait(&self, addr: Word, expected: u32) -> Word {
        let queue = self.queue(addr);
        let result = {
            let mut state = queue.state.lock().unwrap();

            // Compare under the queue lock. wake() takes the same lock, so a
            // store-then-wake either happens before this load (we see the new
            // value and bail) or after we are counted as a waiter.
            let current = unsafe { (*(addr as *const AtomicU32)).load(Ordering::SeqCst) };
            if current != expected {
                Errno::EAGAIN.to_packed()
            } else {
                state.waiters += 1;
                while state.tokens == 0 {
                    state = queue.condvar.wait(state).unwrap();
                }
                state.tokens -= 1;
                state.waiters -= 1;
                0
            }
        };
        drop(queue);
        self.prune(addr);
        result
    }

    /// Wakes up to `count` waiters on `addr`, returning how many tokens were
    /// granted. An address nobody waits on grants nothing and allocates
    /// nothing.
    pub fn wake(&self, addr: Word, count: usize) -> Word {
        let mut queues = self.queues.lock().unwrap();
        let Some(queue) = queues.get(&addr) else {
            return 0;
        };
        let mut state = queue.state.lock().unwrap();
        let granted = count.min(state.waiters.saturating_sub(state.tokens));
        state.tokens += granted;
        if granted > 0 {
            queue.condvar.notify_all();
        }
        let idle = state.waiters == 0 && state.tokens == 0;
        drop(state);
        // An in-flight waiter between queue() and its state lock still holds
        // an Arc clone, which keeps the entry alive here.
        if idle && Arc::strong_count(queue) == 1 {
            queues.remove(&addr);
        }
        granted
    }

    /// Live wait-queue count. Idle queues are dropped as waiters and wakers
    /// finish, so a quiescent space reports zero.
    pub fn queue_count(&self) -> usize {
        self.queues.lock().unwrap().len()
    }

    fn prune(&self, addr: Word) {
        let mut queues = self.queues.lock().unwrap();
        if let Some(queue) = queues.get(&addr) {
            if Arc::strong_count(queue) == 1 {
                let state = queue.state.lock().unwrap();
                let idle = state.waiters == 0 && state.tokens == 0;
                drop(state);
                if idle {
                    queues.remove(&addr);
                }
            }
        }
    }
}
