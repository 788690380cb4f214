//! Clock and sleep adapters.

use crate::Dispatcher;
use abi_types::{AbiError, Word};
use slot_registry::slots;

/// Wall-format timestamp filled in by the host clock slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSpec {
    pub sec: Word,
    pub nsec: Word,
}

impl Dispatcher {
    /// Reads the host monotonic clock.
    pub fn clock_monotonic(&self) -> Result<TimeSpec, AbiError> {
        let mut ts = TimeSpec::default();
        // The host writes through the pointer for the duration of the call;
        // `ts` outlives it on this stack frame.
        self.invoke(
            slots::CLOCK_MONOTONIC,
            &[&mut ts as *mut TimeSpec as Word],
        )?;
        Ok(ts)
    }

    /// Sleeps on the host scheduler. Returns the unslept remainder, which is
    /// nonzero only when the host interrupted the sleep; the remainder is the
    /// caller's signal, so no transparent retry happens here.
    pub fn sleep(&self, seconds: u32) -> Result<u32, AbiError> {
        let remaining = self.invoke_decoded(slots::TIME_SLEEP, &[seconds as Word])?;
        Ok(remaining as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use abi_table::SlotTarget;
    use abi_types::{ReturnClass, Signature};
    use slot_registry::SlotRegistry;
    use std::sync::Arc;

    #[test]
    fn clock_fills_the_callers_timespec() {
        let registry = Arc::new(
            SlotRegistry::builder(MOCK_VERSION)
                .slot(
                    "time.clock_monotonic",
                    slots::CLOCK_MONOTONIC,
                    Signature::words(1, ReturnClass::Void),
                )
                .unwrap()
                .build(),
        );
        let table = abi_table::AbiTable::builder(registry)
            .bind(
                slots::CLOCK_MONOTONIC,
                SlotTarget::fn1(|ptr| {
                    let ts = unsafe { &mut *(ptr as *mut TimeSpec) };
                    ts.sec = 12;
                    ts.nsec = 500;
                    0
                }),
            )
            .unwrap()
            .build();

        let ts = dispatcher(table).clock_monotonic().unwrap();
        assert_eq!(ts, TimeSpec { sec: 12, nsec: 500 });
    }
}
