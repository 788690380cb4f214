//! # Dispatch Contract Tests
//!
//! "Golden" tests for the hosted/host boundary, to ensure the dispatch
//! contract does not drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the boundary contract is written as code
//! - **Testability first**: contract tests fail when behavior changes
//! - **Real concurrency**: properties about blocking and wakeups run on
//!   real threads against the simulated host
//!
//! ## Structure
//!
//! Each integration test file covers one contract area. The files that
//! exercise the process-wide single-capture cell are deliberately kept to
//! one scenario each, since capture happens at most once per test binary.

use abi_table::AbiContext;
use call_adapter::Dispatcher;
use sim_host::SimulatedHost;
use std::sync::Arc;

/// Spins up a simulated host with every v1 slot bound and a dispatcher over
/// an explicitly injected (not process-captured) context.
pub fn sim_dispatcher() -> (Arc<SimulatedHost>, Dispatcher) {
    let host = SimulatedHost::new();
    let table = Arc::new(host.build_table());
    (host, Dispatcher::new(AbiContext::new(table)))
}
