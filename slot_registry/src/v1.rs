//! The canonical v1 slot numbering.
//!
//! The index space is partitioned by capability family; gaps are reserved
//! for additive growth within the family. Index 0 is never a capability.

use crate::{RegistryBuilder, SlotRegistry};
use abi_types::{AbiVersion, RegistryError, ReturnClass, Signature, SlotIndex};

/// Version tag of this numbering.
pub const V1_VERSION: AbiVersion = AbiVersion::new(1, 0);

/// Slot indices of the v1 numbering, grouped by family.
pub mod slots {
    use abi_types::SlotIndex;

    // 0..9: process control
    pub const UNIMPLEMENTED: SlotIndex = SlotIndex::new(0);
    pub const SCHED_INIT: SlotIndex = SlotIndex::new(1);
    pub const TERMINATE: SlotIndex = SlotIndex::new(2);

    // 10..19: character and formatted I/O, clock
    pub const PUTCHAR: SlotIndex = SlotIndex::new(10);
    pub const CLOCK_MONOTONIC: SlotIndex = SlotIndex::new(11);
    pub const FORMAT_PRINT: SlotIndex = SlotIndex::new(12);
    pub const WRITE_STDOUT: SlotIndex = SlotIndex::new(15);
    pub const GETCHAR: SlotIndex = SlotIndex::new(16);

    // 20..29: thread and mutex lifecycle
    pub const THREAD_CREATE: SlotIndex = SlotIndex::new(20);
    pub const THREAD_JOIN: SlotIndex = SlotIndex::new(21);
    pub const THREAD_EXIT: SlotIndex = SlotIndex::new(22);
    pub const THREAD_SELF: SlotIndex = SlotIndex::new(23);
    pub const MUTEX_INIT: SlotIndex = SlotIndex::new(24);
    pub const MUTEX_LOCK: SlotIndex = SlotIndex::new(25);
    pub const MUTEX_UNLOCK: SlotIndex = SlotIndex::new(26);
    pub const MUTEX_DESTROY: SlotIndex = SlotIndex::new(27);

    // 30..39: file operations (byte I/O on open descriptors goes through the
    // generic multiplexer instead)
    pub const FS_OPEN: SlotIndex = SlotIndex::new(30);
    pub const FS_LSEEK: SlotIndex = SlotIndex::new(31);
    pub const FS_STAT: SlotIndex = SlotIndex::new(32);
    pub const FS_FSTAT: SlotIndex = SlotIndex::new(33);
    pub const FS_GETCWD: SlotIndex = SlotIndex::new(35);
    pub const FS_RENAME: SlotIndex = SlotIndex::new(36);

    // 40..49: memory allocation
    pub const MEM_ALLOC: SlotIndex = SlotIndex::new(40);
    pub const MEM_ALLOC_ZEROED: SlotIndex = SlotIndex::new(41);
    pub const MEM_REALLOC: SlotIndex = SlotIndex::new(42);
    pub const MEM_FREE: SlotIndex = SlotIndex::new(43);

    // 50..59: sleep and time
    pub const TIME_SLEEP: SlotIndex = SlotIndex::new(50);

    // 60..69: generic syscall multiplexer, arity 0 through 6
    pub const SYSCALL0: SlotIndex = SlotIndex::new(60);
    pub const SYSCALL1: SlotIndex = SlotIndex::new(61);
    pub const SYSCALL2: SlotIndex = SlotIndex::new(62);
    pub const SYSCALL3: SlotIndex = SlotIndex::new(63);
    pub const SYSCALL4: SlotIndex = SlotIndex::new(64);
    pub const SYSCALL5: SlotIndex = SlotIndex::new(65);
    pub const SYSCALL6: SlotIndex = SlotIndex::new(66);

    // 70..89: floating-point runtime arithmetic and comparisons (operands
    // are f64 bit patterns in single words)
    pub const FRT_ADD_F64: SlotIndex = SlotIndex::new(70);
    pub const FRT_SUB_F64: SlotIndex = SlotIndex::new(71);
    pub const FRT_MUL_F64: SlotIndex = SlotIndex::new(72);
    pub const FRT_DIV_F64: SlotIndex = SlotIndex::new(73);
    pub const FRT_LT_F64: SlotIndex = SlotIndex::new(74);
    pub const FRT_LE_F64: SlotIndex = SlotIndex::new(75);
    pub const FRT_EQ_F64: SlotIndex = SlotIndex::new(76);

    // 90..99: bit-manipulation runtime helpers
    pub const BITS_CLZ32: SlotIndex = SlotIndex::new(90);
    pub const BITS_CLZ64: SlotIndex = SlotIndex::new(91);
    pub const BITS_BSWAP32: SlotIndex = SlotIndex::new(92);
    pub const BITS_BSWAP64: SlotIndex = SlotIndex::new(93);
}

fn build_v1() -> Result<RegistryBuilder, RegistryError> {
    use slots::*;
    use ReturnClass::{Never, Void, Word};

    SlotRegistry::builder(V1_VERSION)
        .requires_scheduler_init(true)
        .slot("sched.init", SCHED_INIT, Signature::words(0, Void))?
        .slot("proc.terminate", TERMINATE, Signature::words(1, Never))?
        .slot("io.putchar", PUTCHAR, Signature::words(1, Void))?
        .slot("time.clock_monotonic", CLOCK_MONOTONIC, Signature::words(1, Void))?
        .slot("io.format.print", FORMAT_PRINT, Signature::words(2, Word))?
        .slot("io.write", WRITE_STDOUT, Signature::words(2, Word))?
        .slot("io.getchar", GETCHAR, Signature::words(0, Word))?
        .slot("thread.create", THREAD_CREATE, Signature::words(2, Word))?
        .slot("thread.join", THREAD_JOIN, Signature::words(1, Word))?
        .slot("thread.exit", THREAD_EXIT, Signature::words(1, Never))?
        .slot("thread.self", THREAD_SELF, Signature::words(0, Word))?
        .slot("mutex.init", MUTEX_INIT, Signature::words(0, Word))?
        .slot("mutex.lock", MUTEX_LOCK, Signature::words(1, Word))?
        .slot("mutex.unlock", MUTEX_UNLOCK, Signature::words(1, Word))?
        .slot("mutex.destroy", MUTEX_DESTROY, Signature::words(1, Word))?
        .slot("fs.open", FS_OPEN, Signature::words(3, Word))?
        .slot("fs.lseek", FS_LSEEK, Signature::words(3, Word))?
        .slot("fs.stat", FS_STAT, Signature::words(2, Word))?
        .slot("fs.fstat", FS_FSTAT, Signature::words(2, Word))?
        .slot("fs.getcwd", FS_GETCWD, Signature::words(2, Word))?
        .slot("fs.rename", FS_RENAME, Signature::words(2, Word))?
        .slot("mem.alloc", MEM_ALLOC, Signature::words(1, Word))?
        .slot("mem.alloc_zeroed", MEM_ALLOC_ZEROED, Signature::words(2, Word))?
        .slot("mem.realloc", MEM_REALLOC, Signature::words(2, Word))?
        .slot("mem.free", MEM_FREE, Signature::words(1, Void))?
        .slot("time.sleep", TIME_SLEEP, Signature::words(1, Word))?
        .slot("sys.call0", SYSCALL0, Signature::words(1, Word))?
        .slot("sys.call1", SYSCALL1, Signature::words(2, Word))?
        .slot("sys.call2", SYSCALL2, Signature::words(3, Word))?
        .slot("sys.call3", SYSCALL3, Signature::words(4, Word))?
        .slot("sys.call4", SYSCALL4, Signature::words(5, Word))?
        .slot("sys.call5", SYSCALL5, Signature::words(6, Word))?
        .slot("sys.call6", SYSCALL6, Signature::words(7, Word))?
        .slot("floatrt.add.f64", FRT_ADD_F64, Signature::words(2, Word))?
        .slot("floatrt.sub.f64", FRT_SUB_F64, Signature::words(2, Word))?
        .slot("floatrt.mul.f64", FRT_MUL_F64, Signature::words(2, Word))?
        .slot("floatrt.div.f64", FRT_DIV_F64, Signature::words(2, Word))?
        .slot("floatrt.lt.f64", FRT_LT_F64, Signature::words(2, Word))?
        .slot("floatrt.le.f64", FRT_LE_F64, Signature::words(2, Word))?
        .slot("floatrt.eq.f64", FRT_EQ_F64, Signature::words(2, Word))?
        .slot("bits.clz32", BITS_CLZ32, Signature::words(1, Word))?
        .slot("bits.clz64", BITS_CLZ64, Signature::words(1, Word))?
        .slot("bits.bswap32", BITS_BSWAP32, Signature::words(1, Word))?
        .slot("bits.bswap64", BITS_BSWAP64, Signature::words(1, Word))
}

/// Builds the canonical v1 registry.
pub fn v1() -> SlotRegistry {
    match build_v1() {
        Ok(builder) => builder.build(),
        // The v1 table is statically well-formed; a failure here is a defect
        // in this module, caught by the tests below.
        Err(err) => unreachable!("v1 registry construction failed: {err}"),
    }
}
