use crate::error::{ExecError, ExecResult};
use crate::executor::estate::{EFlags, EState};
use crate::executor::exec_procnode::ExecNode;
use crate::executor::plan_node::{PlanNode, PlanState};
use crate::plan::Append;
use crate::tuple::TupleTableSlot;

pub struct AppendState<'a> {
    ps: PlanState<'a>,
    appendplans: Vec<ExecNode<'a>>,
    // index of the child currently being read
    whichplan: usize,
}

impl<'a> AppendState<'a> {
    pub fn new(node: &'a Append, estate: &'a EState, eflags: EFlags) -> ExecResult<AppendState<'a>> {
        if node.appendplans.is_empty() {
            return Err(ExecError::init("Append", "no child plans"));
        }

        let mut appendplans: Vec<ExecNode<'a>> = Vec::with_capacity(node.appendplans.len());

        for subplan in node.appendplans.iter() {
            let child = ExecNode::init(subplan, estate, eflags).and_then(|child| {
                match appendplans.first() {
                    Some(first) if first.result_desc() != child.result_desc() => {
                        let reason = format!(
                            "child shapes differ: {} vs {}",
                            first.result_desc(),
                            child.result_desc()
                        );
                        let mut child = child;
                        close_quietly(&mut child);
                        Err(ExecError::init("Append", reason))
                    }
                    _ => Ok(child),
                }
            });

            match child {
                Ok(child) => appendplans.push(child),
                Err(e) => {
                    // Children built so far are torn down before reporting.
                    for built in appendplans.iter_mut() {
                        close_quietly(built);
                    }
                    return Err(e);
                }
            }
        }

        let desc = appendplans[0].result_desc().clone();

        Ok(AppendState {
            ps: PlanState::new(estate, desc, eflags),
            appendplans,
            whichplan: 0,
        })
    }

    pub fn children(&self) -> &[ExecNode<'a>] {
        &self.appendplans
    }
}

fn close_quietly(node: &mut ExecNode<'_>) {
    if let Err(e) = node.close() {
        warn!("failed to close {} while aborting init: {}", node.name(), e);
    }
}

impl<'a> PlanNode<'a> for AppendState<'a> {
    fn exec(&mut self) -> ExecResult<Option<&TupleTableSlot>> {
        self.ps.estate.check_for_interrupts()?;

        loop {
            let child = match self.appendplans.get_mut(self.whichplan) {
                Some(child) => child,
                None => return Ok(self.ps.finish()),
            };

            let fetched = match child.next()? {
                Some(slot) => {
                    self.ps.result_slot_mut().copy_from(slot)?;
                    true
                }
                None => false,
            };

            if fetched {
                return Ok(self.ps.emit());
            }

            self.whichplan += 1;
        }
    }

    fn end(&mut self) -> ExecResult<()> {
        debug!(
            "append over {} plans: emitted {} tuples",
            self.appendplans.len(),
            self.ps.tuples_emitted()
        );
        self.ps.release();

        // Every child is closed even if an earlier one fails; the first
        // failure is reported.
        let mut first_err = None;

        for child in self.appendplans.iter_mut() {
            if let Err(e) = child.close() {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn rescan(&mut self) -> ExecResult<()> {
        self.whichplan = 0;
        self.ps.reset();

        for child in self.appendplans.iter_mut() {
            child.rescan()?;
        }

        Ok(())
    }

    fn plan_state(&self) -> &PlanState<'a> {
        &self.ps
    }
}
