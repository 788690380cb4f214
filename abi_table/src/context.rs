//! Process-wide table capture.
//!
//! Bootstrap publishes the context exactly once, before the program entry
//! point runs and therefore before any second thread can exist. Publication
//! goes through a once cell, which gives the single-writer-before-fan-out
//! visibility guarantee; afterwards the context is plain read-only state.
//!
//! Components take an [`AbiContext`] by injection wherever possible; the
//! process-wide [`current`] accessor exists for the library-call surface
//! that has no caller-supplied context to thread through.

use crate::AbiTable;
use abi_types::CaptureError;
use std::sync::{Arc, OnceLock};

/// Shared handle to the captured table.
#[derive(Debug, Clone)]
pub struct AbiContext {
    table: Arc<AbiTable>,
}

impl AbiContext {
    pub fn new(table: Arc<AbiTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AbiTable {
        &self.table
    }
}

static CONTEXT: OnceLock<AbiContext> = OnceLock::new();

/// Publishes the process context. Callable at most once; a second call is
/// rejected and the original table stands.
pub fn capture(context: AbiContext) -> Result<(), CaptureError> {
    CONTEXT
        .set(context)
        .map_err(|_| CaptureError::AlreadyCaptured)
}

/// Returns the captured context, or fails if bootstrap has not run. Using
/// the table before capture is a wiring error, never undefined behavior.
pub fn current() -> Result<&'static AbiContext, CaptureError> {
    CONTEXT.get().ok_or(CaptureError::TableNotCaptured)
}
