//! Bit-manipulation runtime adapters.
//!
//! Count-leading-zeros and byte-swap helpers for hosted targets whose
//! toolchain lowers these to library calls instead of single instructions.

use crate::Dispatcher;
use abi_types::{AbiError, Word};
use slot_registry::slots;

impl Dispatcher {
    pub fn clz32(&self, value: u32) -> Result<u32, AbiError> {
        let n = self.invoke(slots::BITS_CLZ32, &[value as Word])?;
        Ok(n as u32)
    }

    pub fn clz64(&self, value: u64) -> Result<u32, AbiError> {
        let n = self.invoke(slots::BITS_CLZ64, &[value as Word])?;
        Ok(n as u32)
    }

    pub fn bswap32(&self, value: u32) -> Result<u32, AbiError> {
        let swapped = self.invoke(slots::BITS_BSWAP32, &[value as Word])?;
        Ok(swapped as u32)
    }

    pub fn bswap64(&self, value: u64) -> Result<u64, AbiError> {
        let swapped = self.invoke(slots::BITS_BSWAP64, &[value as Word])?;
        Ok(swapped as u64)
    }
}
