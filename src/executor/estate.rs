//! Per-query execution state shared by every node of one plan tree.

use std::cell::Cell;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ExecError, ExecResult};
use crate::tuple::{TupleDesc, TupleTableSlot};

/// Flags handed to node initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EFlags(u32);

impl EFlags {
    pub const NONE: EFlags = EFlags(0);
    // Build the tree but never run it.
    pub const EXPLAIN_ONLY: EFlags = EFlags(0x0001);
    // The parent may call rescan.
    pub const REWIND: EFlags = EFlags(0x0002);
    pub const BACKWARD: EFlags = EFlags(0x0004);
    pub const MARK: EFlags = EFlags(0x0008);

    pub const fn contains(self, other: EFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for EFlags {
    type Output = EFlags;

    fn bitor(self, rhs: EFlags) -> EFlags {
        EFlags(self.0 | rhs.0)
    }
}

/// Cross-thread handle used by the host to request cancellation.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Execution state of one query.
///
/// Everything in here is touched from a single thread; only the interrupt
/// flag may be set from elsewhere.
pub struct EState {
    interrupts: InterruptHandle,
    // result slots handed out and not yet released
    live_slots: Cell<usize>,
    // tuples delivered to the destination
    processed: Cell<u64>,
}

impl EState {
    pub fn new() -> EState {
        EState::with_interrupts(InterruptHandle::default())
    }

    pub fn with_interrupts(interrupts: InterruptHandle) -> EState {
        EState {
            interrupts,
            live_slots: Cell::new(0),
            processed: Cell::new(0),
        }
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    /// Fails with [`ExecError::Cancelled`] while a cancel request is pending.
    pub fn check_for_interrupts(&self) -> ExecResult<()> {
        if self.interrupts.is_pending() {
            return Err(ExecError::Cancelled);
        }

        Ok(())
    }

    pub fn init_result_slot(&self, desc: Rc<TupleDesc>) -> TupleTableSlot {
        self.live_slots.set(self.live_slots.get() + 1);
        TupleTableSlot::new(desc)
    }

    pub(crate) fn release_slot(&self, slot: &mut TupleTableSlot) {
        slot.clear();
        self.live_slots.set(self.live_slots.get().saturating_sub(1));
    }

    pub fn live_slots(&self) -> usize {
        self.live_slots.get()
    }

    pub fn processed(&self) -> u64 {
        self.processed.get()
    }

    pub(crate) fn count_processed(&self) {
        self.processed.set(self.processed.get() + 1);
    }
}

impl Default for EState {
    fn default() -> EState {
        EState::new()
    }
}

impl fmt::Debug for EState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EState")
            .field("interrupt_pending", &self.interrupts.is_pending())
            .field("live_slots", &self.live_slots.get())
            .field("processed", &self.processed.get())
            .finish()
    }
}
