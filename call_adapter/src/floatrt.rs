//! Floating-point runtime adapters.
//!
//! For hosted targets without hardware floats, `f64` arithmetic is a host
//! capability like any other. Operands and results cross the boundary as IEEE
//! bit patterns in single words; comparisons come back as 0 or 1.

use crate::Dispatcher;
use abi_types::{AbiError, SlotIndex, Word};
use slot_registry::slots;

impl Dispatcher {
    fn float_op(&self, index: SlotIndex, a: f64, b: f64) -> Result<f64, AbiError> {
        let bits = self.invoke(index, &[a.to_bits() as Word, b.to_bits() as Word])?;
        Ok(f64::from_bits(bits as u64))
    }

    fn float_cmp(&self, index: SlotIndex, a: f64, b: f64) -> Result<bool, AbiError> {
        let raw = self.invoke(index, &[a.to_bits() as Word, b.to_bits() as Word])?;
        Ok(raw != 0)
    }

    pub fn add_f64(&self, a: f64, b: f64) -> Result<f64, AbiError> {
        self.float_op(slots::FRT_ADD_F64, a, b)
    }

    pub fn sub_f64(&self, a: f64, b: f64) -> Result<f64, AbiError> {
        self.float_op(slots::FRT_SUB_F64, a, b)
    }

    pub fn mul_f64(&self, a: f64, b: f64) -> Result<f64, AbiError> {
        self.float_op(slots::FRT_MUL_F64, a, b)
    }

    pub fn div_f64(&self, a: f64, b: f64) -> Result<f64, AbiError> {
        self.float_op(slots::FRT_DIV_F64, a, b)
    }

    pub fn lt_f64(&self, a: f64, b: f64) -> Result<bool, AbiError> {
        self.float_cmp(slots::FRT_LT_F64, a, b)
    }

    pub fn le_f64(&self, a: f64, b: f64) -> Result<bool, AbiError> {
        self.float_cmp(slots::FRT_LE_F64, a, b)
    }

    pub fn eq_f64(&self, a: f64, b: f64) -> Result<bool, AbiError> {
        self.float_cmp(slots::FRT_EQ_F64, a, b)
    }
}
