//! Unimplemented-Slot Contract Tests
//!
//! A host that leaves a capability unbound produces the typed
//! `Unimplemented` failure when that slot is invoked; slot 0 is the
//! sentinel in every version; indices outside the version are
//! `UnknownSlot`.

use abi_table::AbiContext;
use abi_types::{AbiError, SlotIndex};
use call_adapter::Dispatcher;
use sim_host::SimulatedHost;
use slot_registry::{slots, v1, V1_VERSION};
use std::sync::Arc;

fn partial_dispatcher() -> Dispatcher {
    let host = SimulatedHost::new();
    let table = host.build_table_selective(&[slots::PUTCHAR]);
    Dispatcher::new(AbiContext::new(Arc::new(table)))
}

#[test]
fn unbound_capability_is_unimplemented() {
    let dispatcher = partial_dispatcher();
    assert_eq!(
        dispatcher.mem_alloc(64),
        Err(AbiError::Unimplemented {
            index: slots::MEM_ALLOC
        })
    );
    // The bound slot still works.
    dispatcher.putchar(b'.').unwrap();
}

#[test]
fn slot_zero_is_always_the_sentinel() {
    let dispatcher = partial_dispatcher();
    assert_eq!(
        dispatcher.invoke(SlotIndex::new(0), &[]),
        Err(AbiError::Unimplemented {
            index: SlotIndex::new(0)
        })
    );
}

#[test]
fn out_of_version_index_is_unknown_not_unimplemented() {
    let dispatcher = partial_dispatcher();
    assert_eq!(
        dispatcher.invoke(SlotIndex::new(999), &[]),
        Err(AbiError::UnknownSlot {
            index: SlotIndex::new(999),
            version: V1_VERSION
        })
    );
    // Gap inside the numbering (34 sits between fstat and getcwd).
    assert!(v1().describe(SlotIndex::new(34)).is_err());
    assert_eq!(
        dispatcher.invoke(SlotIndex::new(34), &[]),
        Err(AbiError::UnknownSlot {
            index: SlotIndex::new(34),
            version: V1_VERSION
        })
    );
}
