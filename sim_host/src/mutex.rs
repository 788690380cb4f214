//! Host-side mutex objects behind opaque word handles.
//!
//! Lifecycle misuse maps to errnos, never to undefined behavior: operating on
//! an unknown or destroyed handle is `EINVAL`, destroying a held mutex is
//! `EBUSY`.

use abi_types::{Errno, Word};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

#[derive(Default)]
struct SimMutex {
    locked: Mutex<bool>,
    condvar: Condvar,
}

/// Handle table for simulated mutexes.
#[derive(Default)]
pub struct MutexTable {
    mutexes: Mutex<HashMap<Word, Arc<SimMutex>>>,
    next_handle: Mutex<Word>,
}

impl MutexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mutex and returns its fresh handle. Handles start at 1;
    /// zero is never a valid handle.
    pub fn init(&self) -> Word {
        let mut next = self.next_handle.lock().unwrap();
        *next += 1;
        self.mutexes
            .lock()
            .unwrap()
            .insert(*next, Arc::new(SimMutex::default()));
        *next
    }

    fn get(&self, handle: Word) -> Option<Arc<SimMutex>> {
        self.mutexes.lock().unwrap().get(&handle).map(Arc::clone)
    }

    /// Blocks the calling thread until the mutex is acquired.
    pub fn lock(&self, handle: Word) -> Word {
        let Some(mutex) = self.get(handle) else {
            return Errno::EINVAL.to_packed();
        };
        let mut locked = mutex.locked.lock().unwrap();
        while *locked {
            locked = mutex.condvar.wait(locked).unwrap();
        }
        *locked = true;
        0
    }

    pub fn unlock(&self, handle: Word) -> Word {
        let Some(mutex) = self.get(handle) else {
            return Errno::EINVAL.to_packed();
        };
        let mut locked = mutex.locked.lock().unwrap();
        *locked = false;
        mutex.condvar.notify_one();
        0
    }

    /// Removes the mutex. A held mutex is refused so no blocked locker can
    /// be stranded on a vanished handle.
    pub fn destroy(&self, handle: Word) -> Word {
        let mut mutexes = self.mutexes.lock().unwrap();
        let Some(mutex) = mutexes.get(&handle) else {
            return Errno::EINVAL.to_packed();
        };
        if *mutex.locked.lock().unwrap() {
            return Errno::EBUSY.to_packed();
        }
        mutexes.remove(&handle);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_types::decode_packed;

    #[test]
    fn destroyed_handle_becomes_invalid() {
        let table = MutexTable::new();
        let handle = table.init();
        assert_eq!(table.destroy(handle), 0);
        assert_eq!(decode_packed(table.lock(handle)), Err(Errno::EINVAL));
    }

    #[test]
    fn held_mutex_refuses_destroy() {
        let table = MutexTable::new();
        let handle = table.init();
        assert_eq!(table.lock(handle), 0);
        assert_eq!(decode_packed(table.destroy(handle)), Err(Errno::EBUSY));
        assert_eq!(table.unlock(handle), 0);
        assert_eq!(table.destroy(handle), 0);
    }
}
