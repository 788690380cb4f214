//! Mutual Exclusion Contract Test
//!
//! The hosted mutex really excludes: two threads each performing three
//! read-modify-write increments on an unprotected counter, serialized only
//! by the hosted mutex, always land on exactly six.

use contract_tests::sim_dispatcher;
use hosted_sync::HostedMutex;
use std::cell::UnsafeCell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A counter with no interior synchronization of its own; the hosted mutex
/// is the only thing keeping the increments exclusive.
struct RacyCounter(UnsafeCell<usize>);

unsafe impl Sync for RacyCounter {}

#[test]
fn two_threads_three_increments_each_total_six() {
    let (_host, dispatcher) = sim_dispatcher();
    let mutex = Arc::new(HostedMutex::init(&dispatcher).unwrap());
    let counter = Arc::new(RacyCounter(UnsafeCell::new(0)));

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let mutex = Arc::clone(&mutex);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..3 {
                    mutex.lock().unwrap();
                    // Deliberately widen the read-modify-write window so an
                    // exclusion failure actually loses updates.
                    let read = unsafe { *counter.0.get() };
                    thread::sleep(Duration::from_millis(2));
                    unsafe { *counter.0.get() = read + 1 };
                    mutex.unlock().unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    mutex.lock().unwrap();
    let total = unsafe { *counter.0.get() };
    mutex.unlock().unwrap();
    assert_eq!(total, 6);
}
