//! Dispatch of the generic node operations.
//!
//! A plan tree maps one-to-one onto a tree of [`ExecNode`]s. `init` builds
//! the runtime state of a node and, recursively, of its children. `next`
//! pulls one tuple. `close` tears the node down and then its children.

use std::rc::Rc;

use crate::error::{ExecError, ExecResult};
use crate::executor::estate::{EFlags, EState};
use crate::executor::node_append::AppendState;
use crate::executor::node_sourcescan::SourceScanState;
use crate::executor::node_twice::TwiceState;
use crate::executor::node_valuesscan::ValuesScanState;
use crate::executor::plan_node::{NodeStatus, PlanNode, PlanState};
use crate::plan::Plan;
use crate::tuple::{TupleDesc, TupleTableSlot};

pub enum ExecNode<'a> {
    ValuesScan(ValuesScanState<'a>),
    SourceScan(SourceScanState<'a>),
    Twice(TwiceState<'a>),
    Append(AppendState<'a>),
}

macro_rules! dispatch {
    ($node:expr, $state:ident => $body:expr) => {
        match $node {
            ExecNode::ValuesScan($state) => $body,
            ExecNode::SourceScan($state) => $body,
            ExecNode::Twice($state) => $body,
            ExecNode::Append($state) => $body,
        }
    };
}

impl<'a> ExecNode<'a> {
    /// Builds the runtime state for `plan` and all of its children.
    ///
    /// Backward scans and mark/restore are not supported by any node.
    pub fn init(plan: &'a Plan, estate: &'a EState, eflags: EFlags) -> ExecResult<ExecNode<'a>> {
        if eflags.contains(EFlags::BACKWARD) || eflags.contains(EFlags::MARK) {
            return Err(ExecError::init(
                plan.node_name(),
                "backward scan and mark/restore are not supported",
            ));
        }

        let node = match plan {
            Plan::ValuesScan(node) => ExecNode::ValuesScan(ValuesScanState::new(node, estate, eflags)?),
            Plan::SourceScan(node) => ExecNode::SourceScan(SourceScanState::new(node, estate, eflags)?),
            Plan::Twice(node) => ExecNode::Twice(TwiceState::new(node, estate, eflags)?),
            Plan::Append(node) => ExecNode::Append(AppendState::new(node, estate, eflags)?),
        };

        debug!("initialized {} node", node.name());
        Ok(node)
    }

    /// Returns the next tuple, or `None` at end-of-stream.
    ///
    /// The returned slot belongs to this node and is only valid until the
    /// next call; callers copy out what they need.
    pub fn next(&mut self) -> ExecResult<Option<&TupleTableSlot>> {
        if self.plan_state().is_closed() {
            return Err(ExecError::NodeClosed(self.name()));
        }

        dispatch!(self, state => state.exec())
    }

    /// Releases the node's result slot, then closes its children. Closing
    /// an already closed node does nothing.
    pub fn close(&mut self) -> ExecResult<()> {
        if self.plan_state().is_closed() {
            return Ok(());
        }

        debug!("closing {} node", self.name());
        dispatch!(self, state => state.end())
    }

    /// Restarts the node so the next call returns its first tuple again.
    pub fn rescan(&mut self) -> ExecResult<()> {
        if self.plan_state().is_closed() {
            return Err(ExecError::NodeClosed(self.name()));
        }

        dispatch!(self, state => state.rescan())
    }

    pub fn plan_state(&self) -> &PlanState<'a> {
        dispatch!(self, state => state.plan_state())
    }

    pub fn status(&self) -> NodeStatus {
        self.plan_state().status()
    }

    pub fn result_desc(&self) -> &Rc<TupleDesc> {
        self.plan_state().result_desc()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecNode::ValuesScan(_) => "Values Scan",
            ExecNode::SourceScan(_) => "Source Scan",
            ExecNode::Twice(_) => "Twice",
            ExecNode::Append(_) => "Append",
        }
    }

    pub fn as_twice(&self) -> Option<&TwiceState<'a>> {
        match self {
            ExecNode::Twice(state) => Some(state),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<&ExecNode<'a>> {
        match self {
            ExecNode::ValuesScan(_) | ExecNode::SourceScan(_) => vec![],
            ExecNode::Twice(state) => vec![state.outer_plan()],
            ExecNode::Append(state) => state.children().iter().collect(),
        }
    }

    /// Indented description of the node tree.
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        let indent = if depth == 0 {
            String::new()
        } else {
            format!("{}-> ", "  ".repeat(depth * 2 - 1))
        };

        let detail = match self {
            ExecNode::ValuesScan(state) => format!(" (rows={})", state.row_count()),
            ExecNode::SourceScan(state) => format!(" on {}", state.source_name()),
            _ => String::new(),
        };

        out.push_str(&format!("{}{}{}  {}\n", indent, self.name(), detail, self.result_desc()));

        for child in self.children() {
            child.explain_into(out, depth + 1);
        }
    }
}
