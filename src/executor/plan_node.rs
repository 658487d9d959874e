use std::rc::Rc;

use crate::error::ExecResult;
use crate::executor::estate::{EFlags, EState};
use crate::tuple::{TupleDesc, TupleTableSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    // initialized, may produce tuples
    Ready,
    // `next` returned end-of-stream
    Exhausted,
    Closed,
}

// State every node carries: its result slot and its lifecycle status.
#[derive(Debug)]
pub struct PlanState<'a> {
    pub estate: &'a EState,
    pub eflags: EFlags,
    result_slot: TupleTableSlot,
    status: NodeStatus,
    tuples_emitted: u64,
}

impl<'a> PlanState<'a> {
    pub fn new(estate: &'a EState, desc: Rc<TupleDesc>, eflags: EFlags) -> PlanState<'a> {
        PlanState {
            estate,
            eflags,
            result_slot: estate.init_result_slot(desc),
            status: NodeStatus::Ready,
            tuples_emitted: 0,
        }
    }

    pub fn result_slot(&self) -> &TupleTableSlot {
        &self.result_slot
    }

    pub fn result_slot_mut(&mut self) -> &mut TupleTableSlot {
        &mut self.result_slot
    }

    pub fn result_desc(&self) -> &Rc<TupleDesc> {
        self.result_slot.tuple_desc()
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }

    pub fn tuples_emitted(&self) -> u64 {
        self.tuples_emitted
    }

    // Hands out the result slot as this call's output.
    pub fn emit(&mut self) -> Option<&TupleTableSlot> {
        self.tuples_emitted += 1;
        Some(&self.result_slot)
    }

    // Marks end-of-stream; the result slot is left empty.
    pub fn finish(&mut self) -> Option<&TupleTableSlot> {
        self.result_slot.clear();
        self.status = NodeStatus::Exhausted;
        None
    }

    pub fn reset(&mut self) {
        self.result_slot.clear();
        self.status = NodeStatus::Ready;
    }

    // Gives the result slot back to the executor. Only the first call has
    // an effect.
    pub fn release(&mut self) {
        if self.status != NodeStatus::Closed {
            self.estate.release_slot(&mut self.result_slot);
            self.status = NodeStatus::Closed;
        }
    }
}

/// Contract every executor node implements.
///
/// `exec` produces the next tuple in the node's result slot (or `None` at
/// end-of-stream), `end` releases the node's own resources and then closes
/// its children, `rescan` restarts the node from its first tuple. Errors of
/// children are returned untouched.
pub trait PlanNode<'a> {
    fn exec(&mut self) -> ExecResult<Option<&TupleTableSlot>>;

    fn end(&mut self) -> ExecResult<()>;

    fn rescan(&mut self) -> ExecResult<()>;

    fn plan_state(&self) -> &PlanState<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::attribute::Attribute;
    use crate::ty::{Datum, TypeLabel};

    #[test]
    fn test_plan_state_transitions() {
        let estate = EState::new();
        let desc = Rc::new(TupleDesc::new(vec![Attribute::new("a", TypeLabel::Integer)]));
        let mut ps = PlanState::new(&estate, desc, EFlags::NONE);

        assert_eq!(ps.status(), NodeStatus::Ready);
        assert_eq!(estate.live_slots(), 1);

        ps.result_slot_mut().store_values(&[Datum::Integer(1)]).unwrap();
        assert!(ps.emit().is_some());
        assert_eq!(ps.tuples_emitted(), 1);

        assert!(ps.finish().is_none());
        assert_eq!(ps.status(), NodeStatus::Exhausted);
        assert!(ps.result_slot().is_empty());

        ps.release();
        ps.release();
        assert!(ps.is_closed());
        assert_eq!(estate.live_slots(), 0);
    }
}
