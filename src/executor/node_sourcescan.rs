use crate::error::ExecResult;
use crate::executor::estate::{EFlags, EState};
use crate::executor::plan_node::{PlanNode, PlanState};
use crate::plan::{SourceScan, TupleCursor};
use crate::tuple::TupleTableSlot;

// Leaf node reading base tuples from an external source.
pub struct SourceScanState<'a> {
    ps: PlanState<'a>,
    node: &'a SourceScan,
    // `None` once closed, or when a reopen during rescan failed
    cursor: Option<Box<dyn TupleCursor>>,
    // the cursor reported exhaustion and must not be fetched again
    source_done: bool,
}

impl<'a> SourceScanState<'a> {
    pub fn new(node: &'a SourceScan, estate: &'a EState, eflags: EFlags) -> ExecResult<SourceScanState<'a>> {
        let cursor = node.source.open()?;

        Ok(SourceScanState {
            ps: PlanState::new(estate, node.desc.clone(), eflags),
            node,
            cursor: Some(cursor),
            source_done: false,
        })
    }

    pub fn source_name(&self) -> &str {
        self.node.source.name()
    }
}

impl<'a> PlanNode<'a> for SourceScanState<'a> {
    fn exec(&mut self) -> ExecResult<Option<&TupleTableSlot>> {
        self.ps.estate.check_for_interrupts()?;

        let cursor = match self.cursor.as_mut() {
            Some(cursor) if !self.source_done => cursor,
            _ => return Ok(self.ps.finish()),
        };

        match cursor.fetch()? {
            Some(row) => {
                self.ps.result_slot_mut().store_values(&row)?;
                Ok(self.ps.emit())
            }
            None => {
                self.source_done = true;
                Ok(self.ps.finish())
            }
        }
    }

    fn end(&mut self) -> ExecResult<()> {
        debug!(
            "source scan on {}: emitted {} tuples",
            self.node.source.name(),
            self.ps.tuples_emitted()
        );
        self.ps.release();

        match self.cursor.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }

    fn rescan(&mut self) -> ExecResult<()> {
        // The old cursor is gone before the reopen, so a failed reopen
        // leaves nothing for `end` to close twice.
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close()?;
        }

        self.source_done = false;
        self.ps.reset();
        self.cursor = Some(self.node.source.open()?);
        Ok(())
    }

    fn plan_state(&self) -> &PlanState<'a> {
        &self.ps
    }
}
