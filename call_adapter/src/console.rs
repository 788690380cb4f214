//! Character and formatted console I/O adapters.
//!
//! Formatting happens on the hosted side (`core::fmt` is pure computation);
//! only the finished bytes cross the boundary. This replaces the varargs
//! `vfprintf` forwarding of the C original, which could not be expressed
//! type-safely.

use crate::{retry_intr, Dispatcher};
use abi_types::{AbiError, Word};
use slot_registry::slots;
use std::fmt;

/// Return value of the getchar slot meaning end of input. Bytes occupy
/// 0..=255 and failures use the packed-errno window, so end-of-input needs
/// its own out-of-band value.
pub const GETCHAR_EOF: Word = 0x100;

impl Dispatcher {
    /// Emits one byte on the host console.
    pub fn putchar(&self, byte: u8) -> Result<(), AbiError> {
        self.invoke(slots::PUTCHAR, &[byte as Word])?;
        Ok(())
    }

    /// Reads one byte from the host console; `None` on end of input.
    pub fn getchar(&self) -> Result<Option<u8>, AbiError> {
        let raw = retry_intr(|| self.invoke_decoded(slots::GETCHAR, &[]))?;
        if raw >= GETCHAR_EOF {
            Ok(None)
        } else {
            Ok(Some(raw as u8))
        }
    }

    /// Writes raw bytes to the host console, returning the count accepted.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<usize, AbiError> {
        let written = retry_intr(|| {
            self.invoke_decoded(
                slots::WRITE_STDOUT,
                &[bytes.as_ptr() as Word, bytes.len() as Word],
            )
        })?;
        Ok(written)
    }

    /// Prints a hosted-formatted string through the formatted-output slot.
    pub fn print_str(&self, text: &str) -> Result<usize, AbiError> {
        let written = retry_intr(|| {
            self.invoke_decoded(
                slots::FORMAT_PRINT,
                &[text.as_ptr() as Word, text.len() as Word],
            )
        })?;
        Ok(written)
    }

    /// Formats on the hosted side and forwards the finished bytes.
    pub fn print_fmt(&self, args: fmt::Arguments<'_>) -> Result<usize, AbiError> {
        self.print_str(&args.to_string())
    }
}
