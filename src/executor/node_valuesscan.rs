use crate::error::{ExecError, ExecResult};
use crate::executor::estate::{EFlags, EState};
use crate::executor::plan_node::{PlanNode, PlanState};
use crate::plan::ValuesScan;
use crate::tuple::TupleTableSlot;
use crate::ty::Datum;

pub struct ValuesScanState<'a> {
    ps: PlanState<'a>,
    rows: &'a [Vec<Datum>],
    // index of the next row to return
    curr_idx: usize,
}

impl<'a> ValuesScanState<'a> {
    pub fn new(node: &'a ValuesScan, estate: &'a EState, eflags: EFlags) -> ExecResult<ValuesScanState<'a>> {
        // Rows are checked once here so `exec` can store them blindly.
        for row in node.rows.iter() {
            node.desc.validate(row).map_err(|e| ExecError::init("Values Scan", e.to_string()))?;
        }

        Ok(ValuesScanState {
            ps: PlanState::new(estate, node.desc.clone(), eflags),
            rows: &node.rows,
            curr_idx: 0,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl<'a> PlanNode<'a> for ValuesScanState<'a> {
    fn exec(&mut self) -> ExecResult<Option<&TupleTableSlot>> {
        self.ps.estate.check_for_interrupts()?;

        match self.rows.get(self.curr_idx) {
            Some(row) => {
                self.curr_idx += 1;
                self.ps.result_slot_mut().store_values(row)?;
                Ok(self.ps.emit())
            }
            None => Ok(self.ps.finish()),
        }
    }

    fn end(&mut self) -> ExecResult<()> {
        debug!("values scan: emitted {} tuples", self.ps.tuples_emitted());
        self.ps.release();
        Ok(())
    }

    fn rescan(&mut self) -> ExecResult<()> {
        self.curr_idx = 0;
        self.ps.reset();
        Ok(())
    }

    fn plan_state(&self) -> &PlanState<'a> {
        &self.ps
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::catalog::attribute::Attribute;
    use crate::tuple::TupleDesc;
    use crate::ty::TypeLabel;

    fn int_values(vals: &[i32]) -> ValuesScan {
        ValuesScan {
            desc: Rc::new(TupleDesc::new(vec![Attribute::new("v", TypeLabel::Integer)])),
            rows: vals.iter().map(|v| vec![Datum::Integer(*v)]).collect(),
        }
    }

    #[test]
    fn test_scan_overwrites_slot() {
        let estate = EState::new();
        let node = int_values(&[1, 2]);
        let mut scan = ValuesScanState::new(&node, &estate, EFlags::NONE).unwrap();

        assert_eq!(scan.exec().unwrap().unwrap().values().unwrap(), vec![Datum::Integer(1)]);
        assert_eq!(scan.exec().unwrap().unwrap().values().unwrap(), vec![Datum::Integer(2)]);
        assert!(scan.exec().unwrap().is_none());
        assert!(scan.exec().unwrap().is_none());
        assert!(scan.plan_state().result_slot().is_empty());
    }

    #[test]
    fn test_bad_row_fails_init() {
        let estate = EState::new();
        let mut node = int_values(&[1]);
        node.rows.push(vec![Datum::Text("x".to_string())]);

        assert!(matches!(
            ValuesScanState::new(&node, &estate, EFlags::NONE),
            Err(ExecError::Init { node: "Values Scan", .. })
        ));
        assert_eq!(estate.live_slots(), 0);
    }

    #[test]
    fn test_rescan() {
        let estate = EState::new();
        let node = int_values(&[4]);
        let mut scan = ValuesScanState::new(&node, &estate, EFlags::REWIND).unwrap();

        assert!(scan.exec().unwrap().is_some());
        assert!(scan.exec().unwrap().is_none());
        scan.rescan().unwrap();
        assert_eq!(scan.exec().unwrap().unwrap().get_column(0).unwrap(), Datum::Integer(4));
    }
}
