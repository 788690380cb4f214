//! Arity Contract Tests
//!
//! A slot can only be reached with a call frame matching its registered
//! signature: wrong-arity bindings die at build time, wrong-arity frames die
//! before the host is entered.

use abi_table::{AbiTable, SlotTarget};
use abi_types::{AbiError, TableBuildError, Word};
use contract_tests::sim_dispatcher;
use slot_registry::{slots, v1};
use std::sync::Arc;

#[test]
fn binding_the_wrong_arity_fails_at_build_time() {
    let registry = Arc::new(v1());
    // mutex.lock takes one word; offer a two-word target.
    let result = AbiTable::builder(registry).bind(slots::MUTEX_LOCK, SlotTarget::fn2(|_, _| 0));
    assert!(matches!(
        result,
        Err(TableBuildError::SignatureMismatch {
            index,
            bound: 2,
            ..
        }) if index == slots::MUTEX_LOCK
    ));
}

#[test]
fn wrong_frame_shape_never_reaches_the_host() {
    let (host, dispatcher) = sim_dispatcher();

    let err = dispatcher
        .invoke(slots::MUTEX_LOCK, &[1, 2])
        .unwrap_err();
    assert_eq!(
        err,
        AbiError::ArityMismatch {
            index: slots::MUTEX_LOCK,
            expected: 1,
            given: 2
        }
    );
    // The host saw nothing: no mutex exists, so a real lock on handle 1
    // still reports an invalid handle.
    assert_ne!(host.mutexes.lock(1), 0);
}

#[test]
fn every_v1_slot_accepts_its_registered_arity() {
    let (_host, dispatcher) = sim_dispatcher();
    let registry = dispatcher.registry();

    // Probe a spread of families with correctly shaped frames; none may be
    // rejected for arity.
    for (index, args) in [
        (slots::PUTCHAR, vec![b'x' as Word]),
        (slots::MUTEX_INIT, vec![]),
        (slots::BITS_CLZ32, vec![8]),
        (slots::SYSCALL0, vec![0]),
    ] {
        assert_eq!(registry.describe(index).unwrap().arity(), args.len());
        let result = dispatcher.invoke(index, &args);
        assert!(
            !matches!(result, Err(AbiError::ArityMismatch { .. })),
            "{index} rejected its registered arity"
        );
    }
}
