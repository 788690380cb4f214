//! Memory allocation adapters.
//!
//! The hosted runtime owns no allocator; every allocation is a slot call and
//! the returned address belongs to the host until `free` hands it back.

use crate::Dispatcher;
use abi_types::{AbiError, Errno, Word};
use slot_registry::slots;

impl Dispatcher {
    /// Allocates `size` bytes on the host. A zero return from the host means
    /// exhaustion and is reported as `ENOMEM`.
    pub fn mem_alloc(&self, size: Word) -> Result<Word, AbiError> {
        match self.invoke(slots::MEM_ALLOC, &[size])? {
            0 => Err(AbiError::Host(Errno::ENOMEM)),
            addr => Ok(addr),
        }
    }

    /// Allocates `count * size` zeroed bytes.
    pub fn mem_alloc_zeroed(&self, count: Word, size: Word) -> Result<Word, AbiError> {
        match self.invoke(slots::MEM_ALLOC_ZEROED, &[count, size])? {
            0 => Err(AbiError::Host(Errno::ENOMEM)),
            addr => Ok(addr),
        }
    }

    /// Resizes a host allocation, returning the (possibly moved) address.
    ///
    /// A zero `size` is the free idiom, not a resize: the allocation is
    /// returned to the host and address 0 comes back as success. Only a
    /// nonzero-size request that yields address 0 is exhaustion.
    pub fn mem_realloc(&self, addr: Word, size: Word) -> Result<Word, AbiError> {
        if size == 0 {
            self.mem_free(addr)?;
            return Ok(0);
        }
        match self.invoke(slots::MEM_REALLOC, &[addr, size])? {
            0 => Err(AbiError::Host(Errno::ENOMEM)),
            new_addr => Ok(new_addr),
        }
    }

    /// Returns an allocation to the host.
    pub fn mem_free(&self, addr: Word) -> Result<(), AbiError> {
        self.invoke(slots::MEM_FREE, &[addr])?;
        Ok(())
    }
}
