//! Slot signatures: argument widths and return class.
//!
//! A signature is the contract half of a slot descriptor. The table builder
//! checks bound targets against it and the dispatcher checks call frames
//! against it, so a slot can never be invoked with the wrong shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one declared parameter.
///
/// The boundary only ever carries machine words; a `DoubleWord` parameter is
/// passed as two consecutive positional words (the quad-precision
/// float-runtime convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamWidth {
    /// One machine word (integers, pointers, `f64` bit patterns).
    Word,
    /// Two machine words, passed low word first.
    DoubleWord,
}

impl ParamWidth {
    /// Number of positional words this parameter occupies.
    pub const fn words(self) -> usize {
        match self {
            ParamWidth::Word => 1,
            ParamWidth::DoubleWord => 2,
        }
    }
}

/// Return class of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnClass {
    /// The slot never returns (terminate, thread exit). A host target that
    /// returns anyway has broken the contract.
    Never,
    /// The slot returns, but its result word is meaningless.
    Void,
    /// One meaningful result word.
    Word,
    /// Two result words, low word first.
    DoubleWord,
}

/// Expected shape of one slot: parameter widths plus return class.
///
/// A given index must have exactly one signature for the lifetime of an ABI
/// version; changing the signature of an index without changing the index is
/// the one forbidden evolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<ParamWidth>,
    ret: ReturnClass,
}

impl Signature {
    pub fn new(params: Vec<ParamWidth>, ret: ReturnClass) -> Self {
        Self { params, ret }
    }

    /// Convenience constructor for the common all-word-parameters case.
    pub fn words(count: usize, ret: ReturnClass) -> Self {
        Self {
            params: vec![ParamWidth::Word; count],
            ret,
        }
    }

    /// Total positional words the slot expects.
    pub fn arity(&self) -> usize {
        self.params.iter().map(|p| p.words()).sum()
    }

    pub fn params(&self) -> &[ParamWidth] {
        &self.params
    }

    pub fn ret(&self) -> ReturnClass {
        self.ret
    }

    /// True for slots that must not return to the caller.
    pub fn diverges(&self) -> bool {
        self.ret == ReturnClass::Never
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match p {
                ParamWidth::Word => write!(f, "w")?,
                ParamWidth::DoubleWord => write!(f, "dw")?,
            }
        }
        match self.ret {
            ReturnClass::Never => write!(f, ") -> !"),
            ReturnClass::Void => write!(f, ")"),
            ReturnClass::Word => write!(f, ") -> w"),
            ReturnClass::DoubleWord => write!(f, ") -> dw"),
        }
    }
}
