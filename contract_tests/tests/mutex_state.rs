//! Mutex Lifecycle Contract Tests
//!
//! Lifecycle misuse of a hosted mutex is always a reported error, never
//! undefined behavior: dead handles are invalid, held mutexes refuse
//! destruction.

use abi_types::SyncError;
use contract_tests::sim_dispatcher;
use hosted_sync::HostedMutex;

#[test]
fn full_lifecycle_succeeds() {
    let (_host, dispatcher) = sim_dispatcher();
    let mutex = HostedMutex::init(&dispatcher).unwrap();
    mutex.lock().unwrap();
    mutex.unlock().unwrap();
    mutex.destroy().unwrap();
}

#[test]
fn operations_on_a_destroyed_mutex_report_invalid() {
    let (_host, dispatcher) = sim_dispatcher();
    let mutex = HostedMutex::init(&dispatcher).unwrap();
    let stale = mutex.clone();
    mutex.destroy().unwrap();

    assert_eq!(stale.lock(), Err(SyncError::InvalidMutex));
    assert_eq!(stale.unlock(), Err(SyncError::InvalidMutex));
    assert_eq!(stale.destroy(), Err(SyncError::InvalidMutex));
}

#[test]
fn destroying_a_held_mutex_reports_busy() {
    let (_host, dispatcher) = sim_dispatcher();
    let mutex = HostedMutex::init(&dispatcher).unwrap();
    mutex.lock().unwrap();
    assert_eq!(mutex.clone().destroy(), Err(SyncError::Busy));

    // After release the destroy goes through.
    mutex.unlock().unwrap();
    mutex.destroy().unwrap();
}

#[test]
fn handles_never_alias_across_inits() {
    let (_host, dispatcher) = sim_dispatcher();
    let first = HostedMutex::init(&dispatcher).unwrap();
    let second = HostedMutex::init(&dispatcher).unwrap();
    assert_ne!(first.handle(), second.handle());

    // Destroying one leaves the other fully usable.
    first.destroy().unwrap();
    second.lock().unwrap();
    second.unlock().unwrap();
    second.destroy().unwrap();
}
