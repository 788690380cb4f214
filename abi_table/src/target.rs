//! Typed call targets.
//!
//! One variant per arity, 0 through 7 positional words (six multiplexer
//! arguments plus the syscall number is the widest slot in any published
//! version). The sentinel is a first-class variant, so "not implemented" is
//! a value, never a null pointer.

use abi_types::Word;
use std::fmt;
use std::sync::Arc;

pub type HostFn0 = Arc<dyn Fn() -> Word + Send + Sync>;
pub type HostFn1 = Arc<dyn Fn(Word) -> Word + Send + Sync>;
pub type HostFn2 = Arc<dyn Fn(Word, Word) -> Word + Send + Sync>;
pub type HostFn3 = Arc<dyn Fn(Word, Word, Word) -> Word + Send + Sync>;
pub type HostFn4 = Arc<dyn Fn(Word, Word, Word, Word) -> Word + Send + Sync>;
pub type HostFn5 = Arc<dyn Fn(Word, Word, Word, Word, Word) -> Word + Send + Sync>;
pub type HostFn6 = Arc<dyn Fn(Word, Word, Word, Word, Word, Word) -> Word + Send + Sync>;
pub type HostFn7 = Arc<dyn Fn(Word, Word, Word, Word, Word, Word, Word) -> Word + Send + Sync>;

/// One entry of the ABI table.
///
/// Slots whose registered return class is `Void` or `Never` still use a
/// word-returning target; the dispatcher ignores or rejects the word as the
/// signature dictates.
#[derive(Clone)]
pub enum SlotTarget {
    /// The reserved sentinel: no host implementation bound.
    Unimplemented,
    Fn0(HostFn0),
    Fn1(HostFn1),
    Fn2(HostFn2),
    Fn3(HostFn3),
    Fn4(HostFn4),
    Fn5(HostFn5),
    Fn6(HostFn6),
    Fn7(HostFn7),
}

impl SlotTarget {
    pub fn fn0(f: impl Fn() -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn0(Arc::new(f))
    }

    pub fn fn1(f: impl Fn(Word) -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn1(Arc::new(f))
    }

    pub fn fn2(f: impl Fn(Word, Word) -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn2(Arc::new(f))
    }

    pub fn fn3(f: impl Fn(Word, Word, Word) -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn3(Arc::new(f))
    }

    pub fn fn4(f: impl Fn(Word, Word, Word, Word) -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn4(Arc::new(f))
    }

    pub fn fn5(f: impl Fn(Word, Word, Word, Word, Word) -> Word + Send + Sync + 'static) -> Self {
        SlotTarget::Fn5(Arc::new(f))
    }

    pub fn fn6(
        f: impl Fn(Word, Word, Word, Word, Word, Word) -> Word + Send + Sync + 'static,
    ) -> Self {
        SlotTarget::Fn6(Arc::new(f))
    }

    pub fn fn7(
        f: impl Fn(Word, Word, Word, Word, Word, Word, Word) -> Word + Send + Sync + 'static,
    ) -> Self {
        SlotTarget::Fn7(Arc::new(f))
    }

    /// Positional word count of the target; `None` for the sentinel.
    pub fn arity(&self) -> Option<usize> {
        match self {
            SlotTarget::Unimplemented => None,
            SlotTarget::Fn0(_) => Some(0),
            SlotTarget::Fn1(_) => Some(1),
            SlotTarget::Fn2(_) => Some(2),
            SlotTarget::Fn3(_) => Some(3),
            SlotTarget::Fn4(_) => Some(4),
            SlotTarget::Fn5(_) => Some(5),
            SlotTarget::Fn6(_) => Some(6),
            SlotTarget::Fn7(_) => Some(7),
        }
    }

    pub fn is_unimplemented(&self) -> bool {
        matches!(self, SlotTarget::Unimplemented)
    }
}

impl fmt::Debug for SlotTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity() {
            None => f.write_str("SlotTarget::Unimplemented"),
            Some(n) => write!(f, "SlotTarget::Fn{n}"),
        }
    }
}
