//! Host-owned allocation arena.
//!
//! Returned addresses are real: they point into boxed buffers kept alive in
//! the arena, so hosted code can store through them. An address stays valid
//! until it is handed back to `free`.

use abi_types::Word;
use std::collections::HashMap;
use std::sync::Mutex;

/// Allocation arena keyed by the address handed out.
#[derive(Default)]
pub struct Arena {
    allocations: Mutex<HashMap<Word, Box<[u8]>>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `size` zero-initialized bytes. Zero-size requests and
    /// exhaustion report address 0.
    pub fn alloc(&self, size: Word) -> Word {
        if size == 0 {
            return 0;
        }
        let block = vec![0u8; size].into_boxed_slice();
        let addr = block.as_ptr() as Word;
        self.allocations.lock().unwrap().insert(addr, block);
        addr
    }

    pub fn alloc_zeroed(&self, count: Word, size: Word) -> Word {
        match count.checked_mul(size) {
            Some(total) => self.alloc(total),
            None => 0,
        }
    }

    /// Grows or shrinks an allocation, copying the overlapping prefix.
    /// A zero size frees the allocation and reports address 0; an unknown
    /// address reports 0 without allocating.
    pub fn realloc(&self, addr: Word, size: Word) -> Word {
        if addr == 0 {
            return self.alloc(size);
        }
        let mut allocations = self.allocations.lock().unwrap();
        let Some(old) = allocations.remove(&addr) else {
            return 0;
        };
        if size == 0 {
            return 0;
        }
        let mut block = vec![0u8; size].into_boxed_slice();
        let n = old.len().min(size);
        block[..n].copy_from_slice(&old[..n]);
        let new_addr = block.as_ptr() as Word;
        allocations.insert(new_addr, block);
        new_addr
    }

    /// Returns an allocation. Freeing address 0 or an unknown address is
    /// ignored, matching the forgiving free contract.
    pub fn free(&self, addr: Word) {
        self.allocations.lock().unwrap().remove(&addr);
    }

    pub fn live_allocations(&self) -> usize {
        self.allocations.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_dereferenceable_until_freed() {
        let arena = Arena::new();
        let addr = arena.alloc(8);
        assert_ne!(addr, 0);
        unsafe {
            *(addr as *mut u8) = 0xAB;
            assert_eq!(*(addr as *const u8), 0xAB);
        }
        arena.free(addr);
        assert_eq!(arena.live_allocations(), 0);
    }

    #[test]
    fn realloc_preserves_the_prefix() {
        let arena = Arena::new();
        let addr = arena.alloc(4);
        unsafe {
            std::slice::from_raw_parts_mut(addr as *mut u8, 4).copy_from_slice(b"abcd");
        }
        let bigger = arena.realloc(addr, 8);
        assert_ne!(bigger, 0);
        let prefix = unsafe { std::slice::from_raw_parts(bigger as *const u8, 4) };
        assert_eq!(prefix, b"abcd");
    }

    #[test]
    fn overflowing_zeroed_request_is_exhaustion() {
        let arena = Arena::new();
        assert_eq!(arena.alloc_zeroed(Word::MAX, 2), 0);
    }
}
