//! # Runtime Bootstrap
//!
//! The trampoline between "the loader transferred control" and "the program
//! entry point runs with a working dispatcher."
//!
//! ## Philosophy
//!
//! Everything between hand-off and `main` happens exactly once and in a fixed
//! order: validate the table base, capture it for the process, initialize the
//! host scheduler if this ABI version demands it, unpack the argument
//! payload, run the entry point, terminate. Each step has a typed failure
//! ([`BootstrapError`]) and no step runs before its predecessor succeeded, so
//! no slot call can ever happen through an unvalidated table.
//!
//! Nothing may execute past terminate: [`enter`] aborts the process if
//! control ever comes back.

#[cfg(target_arch = "riscv64")]
pub mod arch;

use abi_table::{AbiContext, AbiTable};
use abi_types::{BootstrapError, Word};
use call_adapter::Dispatcher;
use std::convert::Infallible;
use std::ffi::CStr;
use std::sync::Arc;

/// The raw process hand-off: the loader-published table base and the packed
/// argument payload, exactly as they arrive in registers.
#[derive(Debug, Clone, Copy)]
pub struct RawHandoff {
    /// Published table base. Produced host-side by [`RawHandoff::publish`];
    /// null means the loader never published a table.
    pub table_base: *const AbiTable,
    /// Argument payload: `payload[0]` is argc, followed by argc pointers to
    /// NUL-terminated argument strings. Null means no arguments.
    pub arg_payload: *const Word,
}

// The pointers are a one-shot transfer of ownership from the loader thread;
// the receiving thread is chosen by whoever runs the trampoline.
unsafe impl Send for RawHandoff {}

impl RawHandoff {
    pub fn new(table_base: *const AbiTable, arg_payload: *const Word) -> Self {
        Self {
            table_base,
            arg_payload,
        }
    }

    /// Host-side constructor: leaks one strong reference into the hand-off
    /// register. [`try_enter`] reclaims it.
    pub fn publish(table: Arc<AbiTable>, arg_payload: *const Word) -> Self {
        Self::new(Arc::into_raw(table), arg_payload)
    }
}

/// Decodes the argc/argv payload into owned strings.
///
/// # Safety
///
/// `payload`, if non-null, must point at a word array of the published shape
/// with pointers to NUL-terminated strings that outlive this call.
unsafe fn unpack_args(payload: *const Word) -> Vec<String> {
    if payload.is_null() {
        return Vec::new();
    }
    let argc = *payload;
    let mut args = Vec::with_capacity(argc);
    for i in 0..argc {
        let ptr = *payload.add(1 + i) as *const std::os::raw::c_char;
        if ptr.is_null() {
            break;
        }
        args.push(CStr::from_ptr(ptr).to_string_lossy().into_owned());
    }
    args
}

/// Runs the bootstrap sequence around `main`.
///
/// On success this never returns: the terminate slot ends the process. Every
/// way control can come back is an error, including a host whose terminate
/// slot hands control back.
///
/// # Safety
///
/// `handoff` must carry a table base from [`RawHandoff::publish`] (or null)
/// and a payload satisfying the [`unpack_args`] contract. The table base is
/// consumed; the hand-off must not be entered twice.
pub unsafe fn try_enter(
    handoff: RawHandoff,
    main: impl FnOnce(&Dispatcher, Vec<String>) -> i32,
) -> Result<Infallible, BootstrapError> {
    if handoff.table_base.is_null() {
        return Err(BootstrapError::NullTableBase);
    }
    let table = Arc::from_raw(handoff.table_base);

    abi_table::capture(AbiContext::new(table))?;
    let dispatcher = Dispatcher::from_captured()?;

    if dispatcher.registry().requires_scheduler_init() {
        dispatcher
            .sched_init()
            .map_err(BootstrapError::SchedulerInit)?;
    }

    let args = unpack_args(handoff.arg_payload);
    let code = main(&dispatcher, args);

    // Control is not supposed to come back from this point on.
    let _ = dispatcher.terminate(code);
    Err(BootstrapError::TerminateReturned)
}

/// The aborting wrapper around [`try_enter`]: any path that hands control
/// back kills the process rather than letting code run past terminate.
///
/// # Safety
///
/// Same contract as [`try_enter`].
pub unsafe fn enter(handoff: RawHandoff, main: impl FnOnce(&Dispatcher, Vec<String>) -> i32) -> ! {
    match try_enter(handoff, main) {
        Ok(never) => match never {},
        Err(err) => {
            eprintln!("bootstrap: {err}");
            std::process::abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn null_table_base_is_rejected_before_any_capture() {
        let handoff = RawHandoff::new(ptr::null(), ptr::null());
        let err = unsafe { try_enter(handoff, |_, _| 0) }.unwrap_err();
        assert_eq!(err, BootstrapError::NullTableBase);
    }

    #[test]
    fn payload_decodes_argc_then_argv() {
        let prog = CString::new("demo").unwrap();
        let flag = CString::new("--fast").unwrap();
        let payload: [Word; 3] = [2, prog.as_ptr() as Word, flag.as_ptr() as Word];

        let args = unsafe { unpack_args(payload.as_ptr()) };
        assert_eq!(args, vec!["demo".to_string(), "--fast".to_string()]);
    }

    #[test]
    fn null_payload_means_no_arguments() {
        assert!(unsafe { unpack_args(ptr::null()) }.is_empty());
    }
}
