//! Syscall numbers routed through the generic multiplexer.
//!
//! These are the RISC-V 64 Linux numbers the hosted C library used for the
//! calls that never earned a dedicated slot.

use abi_types::Word;

pub const CLOSE: Word = 57;
pub const LSEEK: Word = 62;
pub const READ: Word = 63;
pub const WRITE: Word = 64;
pub const FUTEX: Word = 98;

/// Futex operation selectors, passed as the second multiplexer argument.
pub const FUTEX_WAIT: Word = 0;
pub const FUTEX_WAKE: Word = 1;
