//! Static plan trees.
//!
//! A plan is built once, before execution, and is only ever read
//! afterwards. Each plan node gets exactly one runtime state object when the
//! tree is initialized (see `executor::exec_procnode`).

use std::fmt;
use std::rc::Rc;

use crate::error::ExecResult;
use crate::tuple::TupleDesc;
use crate::ty::Datum;

/// An external producer of base tuples, such as a storage scan.
pub trait TupleSource: fmt::Debug {
    /// Short label used by explain output.
    fn name(&self) -> &str;

    /// Opens a fresh cursor. Called at init and on every rescan.
    fn open(&self) -> ExecResult<Box<dyn TupleCursor>>;
}

pub trait TupleCursor {
    /// Returns the next row, or `None` once the source is exhausted.
    fn fetch(&mut self) -> ExecResult<Option<Vec<Datum>>>;

    fn close(&mut self) -> ExecResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct ValuesScan {
    pub desc: Rc<TupleDesc>,
    pub rows: Vec<Vec<Datum>>,
}

#[derive(Debug)]
pub struct SourceScan {
    pub desc: Rc<TupleDesc>,
    pub source: Rc<dyn TupleSource>,
}

/// Emits every tuple of its child twice in a row.
#[derive(Debug)]
pub struct Twice {
    pub lefttree: Box<Plan>,
}

/// Emits the tuples of all children, one child after another.
#[derive(Debug)]
pub struct Append {
    pub appendplans: Vec<Plan>,
}

#[derive(Debug)]
pub enum Plan {
    ValuesScan(ValuesScan),
    SourceScan(SourceScan),
    Twice(Twice),
    Append(Append),
}

impl Plan {
    pub fn values(desc: TupleDesc, rows: Vec<Vec<Datum>>) -> Plan {
        Plan::ValuesScan(ValuesScan {
            desc: Rc::new(desc),
            rows,
        })
    }

    pub fn source(desc: TupleDesc, source: Rc<dyn TupleSource>) -> Plan {
        Plan::SourceScan(SourceScan {
            desc: Rc::new(desc),
            source,
        })
    }

    pub fn twice(lefttree: Plan) -> Plan {
        Plan::Twice(Twice {
            lefttree: Box::new(lefttree),
        })
    }

    pub fn append(appendplans: Vec<Plan>) -> Plan {
        Plan::Append(Append { appendplans })
    }

    pub fn node_name(&self) -> &'static str {
        match self {
            Plan::ValuesScan(_) => "Values Scan",
            Plan::SourceScan(_) => "Source Scan",
            Plan::Twice(_) => "Twice",
            Plan::Append(_) => "Append",
        }
    }

    /// Child plans, outer first.
    pub fn children(&self) -> Vec<&Plan> {
        match self {
            Plan::ValuesScan(_) | Plan::SourceScan(_) => vec![],
            Plan::Twice(twice) => vec![twice.lefttree.as_ref()],
            Plan::Append(append) => append.appendplans.iter().collect(),
        }
    }
}
