//! Simulated thread lifecycle over real std threads.
//!
//! The hosted side hands over a C-ABI entry address and receives a word-sized
//! thread id; join blocks on the real `JoinHandle`. The main thread is id 0;
//! spawned ids start at 1.

use abi_types::{Errno, Word};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

thread_local! {
    static CURRENT_TID: Cell<Word> = const { Cell::new(0) };
}

type Entry = extern "C" fn(Word) -> Word;

/// Spawned-thread table.
#[derive(Default)]
pub struct ThreadTable {
    handles: Mutex<HashMap<Word, JoinHandle<Word>>>,
    next_tid: Mutex<Word>,
}

impl ThreadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a thread running `entry(arg)` and returns its id.
    ///
    /// `entry` must be the address of an `extern "C" fn(Word) -> Word`; the
    /// dispatch table is the only producer of these words, and the typed
    /// adapter on the hosted side only emits real function addresses.
    pub fn create(self: &Arc<Self>, entry: Word, arg: Word) -> Word {
        if entry == 0 {
            return Errno::EINVAL.to_packed();
        }
        let entry: Entry = unsafe { std::mem::transmute(entry) };

        let tid = {
            let mut next = self.next_tid.lock().unwrap();
            *next += 1;
            *next
        };
        let handle = std::thread::spawn(move || {
            CURRENT_TID.with(|current| current.set(tid));
            entry(arg)
        });
        self.handles.lock().unwrap().insert(tid, handle);
        tid
    }

    /// Blocks until the thread exits and returns its result word. Unknown
    /// ids (including double joins) are `EINVAL`.
    pub fn join(&self, tid: Word) -> Word {
        let handle = self.handles.lock().unwrap().remove(&tid);
        match handle {
            Some(handle) => handle.join().unwrap_or_else(|_| Errno::EINVAL.to_packed()),
            None => Errno::EINVAL.to_packed(),
        }
    }

    /// Id of the calling thread.
    pub fn current(&self) -> Word {
        CURRENT_TID.with(|current| current.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_types::decode_packed;

    extern "C" fn double_it(arg: Word) -> Word {
        arg * 2
    }

    #[test]
    fn spawn_join_returns_the_entry_result() {
        let table = Arc::new(ThreadTable::new());
        let tid = table.create(double_it as Word, 21);
        assert_eq!(table.join(tid), 42);
        // A second join finds nothing.
        assert_eq!(decode_packed(table.join(tid)), Err(Errno::EINVAL));
    }

    #[test]
    fn null_entry_is_rejected_before_spawning() {
        let table = Arc::new(ThreadTable::new());
        assert_eq!(decode_packed(table.create(0, 1)), Err(Errno::EINVAL));
    }
}
