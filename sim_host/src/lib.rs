//! # Simulated Host
//!
//! A full in-process implementation of the host side of the v1 ABI table.
//!
//! ## Purpose
//!
//! The simulated host allows testing the dispatch boundary without a loader
//! or a kernel:
//! - Runs under `cargo test`
//! - Real concurrency where the contract is about concurrency (mutexes,
//!   futexes, threads run on std primitives)
//! - Inspectable (console output, file contents, audit trail, exit status
//!   are all accessible)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! This is not a mock that returns canned values. Every bound slot carries
//! the real contract: terminate genuinely never returns (the calling thread
//! parks forever), futex wait genuinely compares under the queue lock, and
//! the allocator hands out addresses the hosted side can store through.

pub mod audit;
pub mod console;
pub mod files;
pub mod futex;
pub mod memory;
pub mod mutex;
pub mod threads;

use abi_table::{AbiTable, SlotTarget, TableBuilder};
use abi_types::{Errno, SlotIndex, Word};
use audit::DispatchAuditLog;
use call_adapter::{nr, StatBuf, TimeSpec};
use console::Console;
use files::FileStore;
use futex::FutexSpace;
use memory::Arena;
use mutex::MutexTable;
use slot_registry::{slots, v1, SlotRegistry};
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use threads::ThreadTable;

#[derive(Default)]
struct ExitCell {
    status: Mutex<Option<i32>>,
    exited: Condvar,
}

/// The simulated host. All state is directly accessible for tests.
pub struct SimulatedHost {
    registry: Arc<SlotRegistry>,
    pub console: Console,
    pub files: FileStore,
    pub arena: Arena,
    pub mutexes: MutexTable,
    pub futexes: FutexSpace,
    pub threads: Arc<ThreadTable>,
    pub audit: DispatchAuditLog,
    started: Instant,
    scheduler_initialized: AtomicBool,
    terminate_calls: AtomicUsize,
    exit: ExitCell,
}

impl SimulatedHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::new(v1()),
            console: Console::new(),
            files: FileStore::new(),
            arena: Arena::new(),
            mutexes: MutexTable::new(),
            futexes: FutexSpace::new(),
            threads: Arc::new(ThreadTable::new()),
            audit: DispatchAuditLog::new(),
            started: Instant::now(),
            scheduler_initialized: AtomicBool::new(false),
            terminate_calls: AtomicUsize::new(0),
            exit: ExitCell::default(),
        })
    }

    pub fn registry(&self) -> &Arc<SlotRegistry> {
        &self.registry
    }

    pub fn scheduler_initialized(&self) -> bool {
        self.scheduler_initialized.load(Ordering::SeqCst)
    }

    /// How many times the terminate slot was entered. The contract allows
    /// exactly one entry per process.
    pub fn terminate_calls(&self) -> usize {
        self.terminate_calls.load(Ordering::SeqCst)
    }

    pub fn exit_status(&self) -> Option<i32> {
        *self.exit.status.lock().unwrap()
    }

    /// Blocks until the terminate slot records an exit status, or the
    /// timeout passes.
    pub fn wait_exit(&self, timeout: Duration) -> Option<i32> {
        let deadline = Instant::now() + timeout;
        let mut status = self.exit.status.lock().unwrap();
        while status.is_none() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return None;
            }
            let (next, result) = self.exit.exited.wait_timeout(status, left).unwrap();
            status = next;
            if result.timed_out() && status.is_none() {
                return None;
            }
        }
        *status
    }

    /// Builds a table with every v1 slot bound.
    pub fn build_table(self: &Arc<Self>) -> AbiTable {
        self.build(None)
    }

    /// Builds a table binding only the listed slots, leaving the rest as the
    /// unimplemented sentinel. For testing partial hosts.
    pub fn build_table_selective(self: &Arc<Self>, only: &[SlotIndex]) -> AbiTable {
        self.build(Some(only))
    }

    fn build(self: &Arc<Self>, only: Option<&[SlotIndex]>) -> AbiTable {
        let mut builder = AbiTable::builder(Arc::clone(&self.registry));
        for (index, target) in self.bindings() {
            if let Some(only) = only {
                if !only.contains(&index) {
                    continue;
                }
            }
            builder = match builder.bind(index, target) {
                Ok(builder) => builder,
                // The binding list mirrors the v1 registry; a mismatch is a
                // defect in this module.
                Err(err) => unreachable!("v1 host binding failed: {err}"),
            };
        }
        builder.build()
    }

    fn mux(self: &Arc<Self>, name: &'static str, frame: &[Word]) -> Word {
        let result = match (frame[0], &frame[1..]) {
            (nr::CLOSE, &[fd]) => self.files.close(fd),
            (nr::READ, &[fd, ptr, len]) => {
                let buf = unsafe { std::slice::from_raw_parts_mut(ptr as *mut u8, len) };
                self.files.read(fd, buf)
            }
            (nr::WRITE, &[fd, ptr, len]) => {
                let buf = unsafe { std::slice::from_raw_parts(ptr as *const u8, len) };
                if fd == 1 || fd == 2 {
                    self.console.write(buf)
                } else {
                    self.files.write(fd, buf)
                }
            }
            (nr::LSEEK, &[fd, offset, whence]) => self.files.lseek(fd, offset, whence),
            (nr::FUTEX, &[addr, nr::FUTEX_WAIT, expected]) => {
                self.futexes.wait(addr, expected as u32)
            }
            (nr::FUTEX, &[addr, nr::FUTEX_WAKE, count]) => self.futexes.wake(addr, count),
            _ => Errno::ENOSYS.to_packed(),
        };
        self.audit.record(name, frame, result);
        result
    }

    fn bindings(self: &Arc<Self>) -> Vec<(SlotIndex, SlotTarget)> {
        let mut pairs: Vec<(SlotIndex, SlotTarget)> = Vec::new();

        let h = Arc::clone(self);
        pairs.push((
            slots::SCHED_INIT,
            SlotTarget::fn0(move || {
                h.scheduler_initialized.store(true, Ordering::SeqCst);
                0
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::TERMINATE,
            SlotTarget::fn1(move |code| {
                h.terminate_calls.fetch_add(1, Ordering::SeqCst);
                let mut status = h.exit.status.lock().unwrap();
                if status.is_none() {
                    *status = Some(code as i32);
                }
                h.exit.exited.notify_all();
                drop(status);
                // Terminate never returns: the calling thread stays parked.
                loop {
                    std::thread::park();
                }
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::PUTCHAR,
            SlotTarget::fn1(move |byte| {
                h.console.put(byte as u8);
                0
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::CLOCK_MONOTONIC,
            SlotTarget::fn1(move |ptr| {
                let elapsed = h.started.elapsed();
                let ts = unsafe { &mut *(ptr as *mut TimeSpec) };
                ts.sec = elapsed.as_secs() as Word;
                ts.nsec = elapsed.subsec_nanos() as Word;
                0
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FORMAT_PRINT,
            SlotTarget::fn2(move |ptr, len| {
                let bytes = unsafe { std::slice::from_raw_parts(ptr as *const u8, len) };
                h.console.write(bytes)
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::WRITE_STDOUT,
            SlotTarget::fn2(move |ptr, len| {
                let bytes = unsafe { std::slice::from_raw_parts(ptr as *const u8, len) };
                h.console.write(bytes)
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((slots::GETCHAR, SlotTarget::fn0(move || h.console.get())));

        let h = Arc::clone(self);
        pairs.push((
            slots::THREAD_CREATE,
            SlotTarget::fn2(move |entry, arg| h.threads.create(entry, arg)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::THREAD_JOIN,
            SlotTarget::fn1(move |tid| h.threads.join(tid)),
        ));

        pairs.push((
            slots::THREAD_EXIT,
            SlotTarget::fn1(move |_result| loop {
                std::thread::park();
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((slots::THREAD_SELF, SlotTarget::fn0(move || h.threads.current())));

        let h = Arc::clone(self);
        pairs.push((slots::MUTEX_INIT, SlotTarget::fn0(move || h.mutexes.init())));

        let h = Arc::clone(self);
        pairs.push((
            slots::MUTEX_LOCK,
            SlotTarget::fn1(move |handle| h.mutexes.lock(handle)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::MUTEX_UNLOCK,
            SlotTarget::fn1(move |handle| h.mutexes.unlock(handle)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::MUTEX_DESTROY,
            SlotTarget::fn1(move |handle| h.mutexes.destroy(handle)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_OPEN,
            SlotTarget::fn3(move |path, flags, _mode| {
                let name = unsafe { CStr::from_ptr(path as *const std::os::raw::c_char) };
                match name.to_str() {
                    Ok(name) => h.files.open(name, flags),
                    Err(_) => Errno::EINVAL.to_packed(),
                }
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_LSEEK,
            SlotTarget::fn3(move |fd, offset, whence| h.files.lseek(fd, offset, whence)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_STAT,
            SlotTarget::fn2(move |path, buf| {
                let name = unsafe { CStr::from_ptr(path as *const std::os::raw::c_char) };
                let Ok(name) = name.to_str() else {
                    return Errno::EINVAL.to_packed();
                };
                match h.files.size_of_path(name) {
                    Some(size) => {
                        unsafe { (*(buf as *mut StatBuf)).size = size };
                        0
                    }
                    None => Errno::ENOENT.to_packed(),
                }
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_FSTAT,
            SlotTarget::fn2(move |fd, buf| match h.files.size_of_fd(fd) {
                Some(size) => {
                    unsafe { (*(buf as *mut StatBuf)).size = size };
                    0
                }
                None => Errno::EBADF.to_packed(),
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_GETCWD,
            SlotTarget::fn2(move |ptr, len| {
                let buf = unsafe { std::slice::from_raw_parts_mut(ptr as *mut u8, len) };
                h.files.getcwd(buf)
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::FS_RENAME,
            SlotTarget::fn2(move |old, new| {
                let old = unsafe { CStr::from_ptr(old as *const std::os::raw::c_char) };
                let new = unsafe { CStr::from_ptr(new as *const std::os::raw::c_char) };
                match (old.to_str(), new.to_str()) {
                    (Ok(old), Ok(new)) => h.files.rename(old, new),
                    _ => Errno::EINVAL.to_packed(),
                }
            }),
        ));

        let h = Arc::clone(self);
        pairs.push((slots::MEM_ALLOC, SlotTarget::fn1(move |size| h.arena.alloc(size))));

        let h = Arc::clone(self);
        pairs.push((
            slots::MEM_ALLOC_ZEROED,
            SlotTarget::fn2(move |count, size| h.arena.alloc_zeroed(count, size)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::MEM_REALLOC,
            SlotTarget::fn2(move |addr, size| h.arena.realloc(addr, size)),
        ));

        let h = Arc::clone(self);
        pairs.push((
            slots::MEM_FREE,
            SlotTarget::fn1(move |addr| {
                h.arena.free(addr);
                0
            }),
        ));

        // Simulated time: sleeps complete immediately with no remainder.
        pairs.push((slots::TIME_SLEEP, SlotTarget::fn1(move |_seconds| 0)));

        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL0,
            SlotTarget::fn1(move |n| h.mux("sys.call0", &[n])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL1,
            SlotTarget::fn2(move |n, a| h.mux("sys.call1", &[n, a])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL2,
            SlotTarget::fn3(move |n, a, b| h.mux("sys.call2", &[n, a, b])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL3,
            SlotTarget::fn4(move |n, a, b, c| h.mux("sys.call3", &[n, a, b, c])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL4,
            SlotTarget::fn5(move |n, a, b, c, d| h.mux("sys.call4", &[n, a, b, c, d])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL5,
            SlotTarget::fn6(move |n, a, b, c, d, e| h.mux("sys.call5", &[n, a, b, c, d, e])),
        ));
        let h = Arc::clone(self);
        pairs.push((
            slots::SYSCALL6,
            SlotTarget::fn7(move |n, a, b, c, d, e, f| h.mux("sys.call6", &[n, a, b, c, d, e, f])),
        ));

        fn float_bin(op: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> SlotTarget {
            SlotTarget::fn2(move |a, b| {
                op(f64::from_bits(a as u64), f64::from_bits(b as u64)).to_bits() as Word
            })
        }
        fn float_rel(op: impl Fn(f64, f64) -> bool + Send + Sync + 'static) -> SlotTarget {
            SlotTarget::fn2(move |a, b| {
                op(f64::from_bits(a as u64), f64::from_bits(b as u64)) as Word
            })
        }

        pairs.push((slots::FRT_ADD_F64, float_bin(|a, b| a + b)));
        pairs.push((slots::FRT_SUB_F64, float_bin(|a, b| a - b)));
        pairs.push((slots::FRT_MUL_F64, float_bin(|a, b| a * b)));
        pairs.push((slots::FRT_DIV_F64, float_bin(|a, b| a / b)));
        pairs.push((slots::FRT_LT_F64, float_rel(|a, b| a < b)));
        pairs.push((slots::FRT_LE_F64, float_rel(|a, b| a <= b)));
        pairs.push((slots::FRT_EQ_F64, float_rel(|a, b| a == b)));

        pairs.push((
            slots::BITS_CLZ32,
            SlotTarget::fn1(|v| (v as u32).leading_zeros() as Word),
        ));
        pairs.push((
            slots::BITS_CLZ64,
            SlotTarget::fn1(|v| (v as u64).leading_zeros() as Word),
        ));
        pairs.push((
            slots::BITS_BSWAP32,
            SlotTarget::fn1(|v| (v as u32).swap_bytes() as Word),
        ));
        pairs.push((
            slots::BITS_BSWAP64,
            SlotTarget::fn1(|v| (v as u64).swap_bytes() as Word),
        ));

        pairs
    }
}
