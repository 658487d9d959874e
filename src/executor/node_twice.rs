//! Node that returns every tuple of its outer plan twice.
//!
//! The node copies each outer tuple into its own result slot, returns it,
//! and on the following call returns the same slot again without pulling
//! from the outer plan. Output is `a, a, b, b, ...` with the outer plan's
//! tuple descriptor; no projection is done.

use crate::error::ExecResult;
use crate::executor::estate::{EFlags, EState};
use crate::executor::exec_procnode::ExecNode;
use crate::executor::plan_node::{PlanNode, PlanState};
use crate::plan::Twice;
use crate::tuple::TupleTableSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwicePhase {
    // The next call pulls a fresh tuple from the outer plan.
    AwaitingFresh,
    // The result slot holds a tuple that has been returned once.
    HasExtra,
}

pub struct TwiceState<'a> {
    ps: PlanState<'a>,
    lefttree: Box<ExecNode<'a>>,
    phase: TwicePhase,
}

impl<'a> TwiceState<'a> {
    pub fn new(node: &'a Twice, estate: &'a EState, eflags: EFlags) -> ExecResult<TwiceState<'a>> {
        // Only one outer plan; it is set up before our own slot so a failure
        // leaves nothing of ours behind.
        let lefttree = ExecNode::init(&node.lefttree, estate, eflags)?;

        // No projection, so the result shape is exactly the outer shape.
        let desc = lefttree.result_desc().clone();

        Ok(TwiceState {
            ps: PlanState::new(estate, desc, eflags),
            lefttree: Box::new(lefttree),
            phase: TwicePhase::AwaitingFresh,
        })
    }

    pub fn phase(&self) -> TwicePhase {
        self.phase
    }

    pub fn outer_plan(&self) -> &ExecNode<'a> {
        &self.lefttree
    }
}

impl<'a> PlanNode<'a> for TwiceState<'a> {
    fn exec(&mut self) -> ExecResult<Option<&TupleTableSlot>> {
        self.ps.estate.check_for_interrupts()?;

        match self.phase {
            TwicePhase::AwaitingFresh => {
                match self.lefttree.next()? {
                    Some(outer_slot) => {
                        // The outer node reuses its slot on its next call, so
                        // keep our own copy.
                        self.ps.result_slot_mut().copy_from(outer_slot)?;
                        self.phase = TwicePhase::HasExtra;
                        Ok(self.ps.emit())
                    }
                    None => Ok(self.ps.finish()),
                }
            }
            TwicePhase::HasExtra => {
                // The slot still holds our own copy; hand it out again.
                self.phase = TwicePhase::AwaitingFresh;
                Ok(self.ps.emit())
            }
        }
    }

    fn end(&mut self) -> ExecResult<()> {
        debug!("twice: emitted {} tuples", self.ps.tuples_emitted());

        // clean up tuple table slot's content
        self.ps.release();

        // recursively clean up nodes in the plan rooted in this node
        self.lefttree.close()
    }

    fn rescan(&mut self) -> ExecResult<()> {
        self.phase = TwicePhase::AwaitingFresh;
        self.ps.reset();
        self.lefttree.rescan()
    }

    fn plan_state(&self) -> &PlanState<'a> {
        &self.ps
    }
}
