//! Register-level hand-off for riscv64 targets.
//!
//! The loader transfers control with the table base in `a7` and the argument
//! payload pointer in `a0`. Reading them is only meaningful as the very first
//! thing the entry function does, before anything can clobber the registers.

use crate::RawHandoff;
use abi_table::AbiTable;
use abi_types::Word;
use std::arch::asm;

/// Reads the hand-off registers.
///
/// # Safety
///
/// Must be the first executed statement of the process entry function; any
/// earlier code may overwrite `a7` or `a0`.
pub unsafe fn handoff_from_registers() -> RawHandoff {
    let table_base: Word;
    let arg_payload: Word;
    asm!(
        "mv {table}, a7",
        "mv {payload}, a0",
        table = out(reg) table_base,
        payload = out(reg) arg_payload,
        options(nomem, nostack),
    );
    RawHandoff::new(
        table_base as *const AbiTable,
        arg_payload as *const Word,
    )
}
