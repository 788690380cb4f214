//! Process-control adapters: scheduler init and terminate.

use crate::Dispatcher;
use abi_types::{AbiError, Word};
use slot_registry::slots;
use std::convert::Infallible;

impl Dispatcher {
    /// Asks the host to bring up its cooperative scheduler. Bootstrap calls
    /// this before the program entry point when the ABI version requires it.
    pub fn sched_init(&self) -> Result<(), AbiError> {
        self.invoke(slots::SCHED_INIT, &[])?;
        Ok(())
    }

    /// Ends the process. This is the defined end of the hosted side's
    /// lifetime: the call must not return, and the trampoline aborts if it
    /// ever does.
    pub fn terminate(&self, exit_code: i32) -> Result<Infallible, AbiError> {
        match self.invoke(slots::TERMINATE, &[exit_code as Word]) {
            Ok(_) => Err(AbiError::DivergingSlotReturned {
                index: slots::TERMINATE,
            }),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use abi_table::SlotTarget;
    use abi_types::AbiError;
    use slot_registry::slots;

    #[test]
    fn terminate_returning_is_an_error_not_a_success() {
        // A simulated host whose terminate hands control back: the adapter
        // must refuse to present that as success.
        let dispatcher = dispatcher_with(slots::TERMINATE, SlotTarget::fn1(|_| 0));
        let err = dispatcher.terminate(0).unwrap_err();
        assert_eq!(
            err,
            AbiError::DivergingSlotReturned { index: slots::TERMINATE }
        );
    }

    #[test]
    fn terminate_on_sentinel_is_unimplemented() {
        let dispatcher = dispatcher(builder().build());
        assert_eq!(
            dispatcher.terminate(1).unwrap_err(),
            AbiError::Unimplemented { index: slots::TERMINATE }
        );
    }
}
