//! # Call Adapter
//!
//! The dispatcher: every forwarded library routine becomes "fetch the slot
//! for this capability, check the call frame against its registered
//! signature, invoke, hand the result back unchanged."
//!
//! ## Philosophy
//!
//! One checked entry point ([`Dispatcher::invoke`]) replaces the per-call-site
//! pointer casts of the C original. The named adapters in the submodules are
//! thin, signature-exact wrappers over it; the generic multiplexer
//! ([`Dispatcher::call0`] .. [`Dispatcher::call6`]) forwards up to six
//! positional words untouched for anything without a dedicated slot.
//!
//! The adapter layer never masks a host failure. It translates the packed
//! negative-errno convention into an explicit `Result`, retries `EINTR` on
//! blocking calls, and surfaces everything else verbatim.
//!
//! Every adapter call is a potential blocking point: the host side of a slot
//! may park the calling thread indefinitely.

pub mod bits;
pub mod console;
pub mod floatrt;
pub mod fs;
pub mod mem;
pub mod nr;
pub mod process;
pub mod thread;
pub mod time;

pub use fs::StatBuf;
pub use thread::ThreadEntry;
pub use time::TimeSpec;

use abi_table::{AbiContext, SlotTarget};
use abi_types::{decode_packed, AbiError, CaptureError, Errno, RegistryError, SlotIndex, Word};
use slot_registry::{slots, SlotRegistry};

/// Typed gateway to the captured ABI table.
///
/// Cheap to clone (shares the table); safe to use from any thread once
/// bootstrap has completed.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ctx: AbiContext,
}

impl Dispatcher {
    /// Wraps an explicitly injected context.
    pub fn new(ctx: AbiContext) -> Self {
        Self { ctx }
    }

    /// Uses the process-wide captured context.
    pub fn from_captured() -> Result<Self, CaptureError> {
        Ok(Self::new(abi_table::current()?.clone()))
    }

    pub fn context(&self) -> &AbiContext {
        &self.ctx
    }

    pub fn registry(&self) -> &SlotRegistry {
        self.ctx.table().registry()
    }

    /// Invokes one slot with a checked call frame.
    ///
    /// The frame must match the registered signature word-for-word. The
    /// sentinel surfaces as [`AbiError::Unimplemented`]; a frame of the wrong
    /// shape surfaces as [`AbiError::ArityMismatch`] without the call being
    /// made; a slot registered `-> !` that returns anyway surfaces as
    /// [`AbiError::DivergingSlotReturned`]. Misinterpreting a target is not
    /// a reachable outcome.
    pub fn invoke(&self, index: SlotIndex, args: &[Word]) -> Result<Word, AbiError> {
        if index.is_reserved() {
            // Index 0 denotes "unimplemented" in every version.
            return Err(AbiError::Unimplemented { index });
        }
        let signature = match self.registry().describe(index) {
            Ok(signature) => signature,
            Err(RegistryError::UnknownIndex { index, version }) => {
                return Err(AbiError::UnknownSlot { index, version })
            }
            Err(_) => {
                return Err(AbiError::UnknownSlot {
                    index,
                    version: self.registry().version(),
                })
            }
        };
        if signature.arity() != args.len() {
            return Err(AbiError::ArityMismatch {
                index,
                expected: signature.arity(),
                given: args.len(),
            });
        }
        let diverges = signature.diverges();

        let result = match (self.ctx.table().slot(index), args) {
            (SlotTarget::Unimplemented, _) => return Err(AbiError::Unimplemented { index }),
            (SlotTarget::Fn0(f), []) => f(),
            (SlotTarget::Fn1(f), &[a]) => f(a),
            (SlotTarget::Fn2(f), &[a, b]) => f(a, b),
            (SlotTarget::Fn3(f), &[a, b, c]) => f(a, b, c),
            (SlotTarget::Fn4(f), &[a, b, c, d]) => f(a, b, c, d),
            (SlotTarget::Fn5(f), &[a, b, c, d, e]) => f(a, b, c, d, e),
            (SlotTarget::Fn6(f), &[a, b, c, d, e, g]) => f(a, b, c, d, e, g),
            (SlotTarget::Fn7(f), &[a, b, c, d, e, g, h]) => f(a, b, c, d, e, g, h),
            // The builder guarantees bound arity == registered arity, so this
            // arm is only reachable with a table built outside the builder.
            (target, _) => {
                return Err(AbiError::ArityMismatch {
                    index,
                    expected: target.arity().unwrap_or(0),
                    given: args.len(),
                })
            }
        };

        if diverges {
            return Err(AbiError::DivergingSlotReturned { index });
        }
        Ok(result)
    }

    /// Invokes a slot and decodes the packed negative-errno return.
    pub fn invoke_decoded(&self, index: SlotIndex, args: &[Word]) -> Result<Word, AbiError> {
        decode_packed(self.invoke(index, args)?).map_err(AbiError::Host)
    }

    // Generic syscall-style multiplexer, arity 0 through 6. Each argument is
    // forwarded positionally and untouched; the packed return is decoded.

    pub fn call0(&self, n: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL0, &[n])
    }

    pub fn call1(&self, n: Word, a: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL1, &[n, a])
    }

    pub fn call2(&self, n: Word, a: Word, b: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL2, &[n, a, b])
    }

    pub fn call3(&self, n: Word, a: Word, b: Word, c: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL3, &[n, a, b, c])
    }

    pub fn call4(&self, n: Word, a: Word, b: Word, c: Word, d: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL4, &[n, a, b, c, d])
    }

    pub fn call5(
        &self,
        n: Word,
        a: Word,
        b: Word,
        c: Word,
        d: Word,
        e: Word,
    ) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL5, &[n, a, b, c, d, e])
    }

    pub fn call6(
        &self,
        n: Word,
        a: Word,
        b: Word,
        c: Word,
        d: Word,
        e: Word,
        f: Word,
    ) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::SYSCALL6, &[n, a, b, c, d, e, f])
    }
}

/// Retries a blocking call while the host reports `EINTR`. This is the one
/// transparent recovery the adapter layer performs; every other failure is
/// surfaced verbatim.
pub(crate) fn retry_intr(
    mut call: impl FnMut() -> Result<Word, AbiError>,
) -> Result<Word, AbiError> {
    loop {
        match call() {
            Err(AbiError::Host(Errno::EINTR)) => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Miniature in-test hosts, in the spirit of mocking the kernel API.

    use super::*;
    use abi_table::{AbiContext, AbiTable, SlotTarget, TableBuilder};
    use abi_types::{AbiVersion, ReturnClass, Signature};
    use std::sync::Arc;

    pub const MOCK_VERSION: AbiVersion = AbiVersion::new(42, 0);

    /// Builds a registry covering the slots the adapter tests exercise.
    pub fn mock_registry() -> Arc<SlotRegistry> {
        let builder = SlotRegistry::builder(MOCK_VERSION)
            .slot("proc.terminate", slots::TERMINATE, Signature::words(1, ReturnClass::Never))
            .unwrap()
            .slot("io.putchar", slots::PUTCHAR, Signature::words(1, ReturnClass::Void))
            .unwrap()
            .slot("io.write", slots::WRITE_STDOUT, Signature::words(2, ReturnClass::Word))
            .unwrap()
            .slot("mem.alloc", slots::MEM_ALLOC, Signature::words(1, ReturnClass::Word))
            .unwrap()
            .slot("mem.realloc", slots::MEM_REALLOC, Signature::words(2, ReturnClass::Word))
            .unwrap()
            .slot("mem.free", slots::MEM_FREE, Signature::words(1, ReturnClass::Void))
            .unwrap()
            .slot("thread.join", slots::THREAD_JOIN, Signature::words(1, ReturnClass::Word))
            .unwrap()
            .slot("sys.call3", slots::SYSCALL3, Signature::words(4, ReturnClass::Word))
            .unwrap()
            .slot(
                "floatrt.add.f64",
                slots::FRT_ADD_F64,
                Signature::words(2, ReturnClass::Word),
            )
            .unwrap()
            .slot("bits.clz64", slots::BITS_CLZ64, Signature::words(1, ReturnClass::Word))
            .unwrap();
        Arc::new(builder.build())
    }

    pub fn builder() -> TableBuilder {
        AbiTable::builder(mock_registry())
    }

    pub fn dispatcher(table: AbiTable) -> Dispatcher {
        Dispatcher::new(AbiContext::new(Arc::new(table)))
    }

    pub fn dispatcher_with(
        index: abi_types::SlotIndex,
        target: SlotTarget,
    ) -> Dispatcher {
        dispatcher(builder().bind(index, target).unwrap().build())
    }
}
