//! Bootstrap Contract Test
//!
//! The full trampoline sequence against the simulated host: capture the
//! published table, initialize the scheduler, deliver decoded arguments to
//! the entry point, and enter terminate exactly once without control ever
//! coming back. One scenario per binary: the trampoline captures the
//! process-wide table.

use abi_types::Word;
use runtime_bootstrap::RawHandoff;
use sim_host::SimulatedHost;
use slot_registry::slots;
use std::ffi::CString;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn trampoline_runs_main_once_and_never_returns() {
    let host = SimulatedHost::new();
    let table = Arc::new(host.build_table_selective(&[
        slots::SCHED_INIT,
        slots::TERMINATE,
        slots::PUTCHAR,
    ]));

    // Argument payload: argc, then pointers to NUL-terminated strings. The
    // strings must stay alive while the trampoline unpacks them; the parked
    // terminate thread keeps the whole hand-off frame pinned anyway.
    let argv0 = CString::new("demo").unwrap();
    let argv1 = CString::new("--level=3").unwrap();
    let payload: Vec<Word> = vec![2, argv0.as_ptr() as Word, argv1.as_ptr() as Word];

    let handoff = RawHandoff::publish(Arc::clone(&table), payload.as_ptr());
    let (args_tx, args_rx) = mpsc::channel();

    // The entering thread parks forever inside the terminate slot, so it is
    // never joined.
    thread::spawn(move || {
        // Keep the payload storage alive for the parked thread's lifetime.
        let _pinned = (argv0, argv1, payload);
        unsafe {
            runtime_bootstrap::enter(handoff, move |dispatcher, args| {
                args_tx.send(args).unwrap();
                dispatcher.putchar(b'!').unwrap();
                42
            })
        }
    });

    assert_eq!(host.wait_exit(Duration::from_secs(5)), Some(42));
    assert_eq!(host.terminate_calls(), 1);
    assert!(host.scheduler_initialized());
    assert_eq!(host.console.output(), b"!");
    assert_eq!(
        args_rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        vec!["demo".to_string(), "--level=3".to_string()]
    );

    // Nothing executed past terminate: the status never changes.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(host.exit_status(), Some(42));
    assert_eq!(host.terminate_calls(), 1);
}
