// Receivers of the tuples a query produces.

use std::io::Write;

use crate::error::ExecResult;
use crate::tuple::{TupleDesc, TupleTableSlot};
use crate::ty::Datum;

pub trait DestReceiver {
    fn startup(&mut self, _desc: &TupleDesc) -> ExecResult<()> {
        Ok(())
    }

    // The slot is only borrowed; copy out what must outlive the call.
    fn receive_slot(&mut self, slot: &TupleTableSlot) -> ExecResult<()>;

    fn shutdown(&mut self) -> ExecResult<()> {
        Ok(())
    }
}

/// Keeps every received row in memory.
#[derive(Debug, Default)]
pub struct CollectReceiver {
    pub rows: Vec<Vec<Datum>>,
}

impl CollectReceiver {
    pub fn new() -> CollectReceiver {
        CollectReceiver::default()
    }

    pub fn into_rows(self) -> Vec<Vec<Datum>> {
        self.rows
    }
}

impl DestReceiver for CollectReceiver {
    fn receive_slot(&mut self, slot: &TupleTableSlot) -> ExecResult<()> {
        self.rows.push(slot.values()?);
        Ok(())
    }
}

/// Writes rows as tab separated text, preceded by a header line.
pub struct PrintReceiver<W: Write> {
    out: W,
}

impl<W: Write> PrintReceiver<W> {
    pub fn new(out: W) -> PrintReceiver<W> {
        PrintReceiver { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DestReceiver for PrintReceiver<W> {
    fn startup(&mut self, desc: &TupleDesc) -> ExecResult<()> {
        let names: Vec<&str> = desc.attrs().iter().map(|a| a.name.as_str()).collect();
        writeln!(self.out, "{}", names.join("\t"))?;
        Ok(())
    }

    fn receive_slot(&mut self, slot: &TupleTableSlot) -> ExecResult<()> {
        let values: Vec<String> = slot.values()?.iter().map(|v| v.as_string()).collect();
        writeln!(self.out, "{}", values.join("\t"))?;
        Ok(())
    }

    fn shutdown(&mut self) -> ExecResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
