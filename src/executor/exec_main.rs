//! Top level executor interface.
//!
//! A [`QueryDesc`] owns the runtime tree of one plan and drives it through
//! start, run and end. It makes sure the tree is initialized once and torn
//! down once, whatever the caller does in between.

use crate::dest::DestReceiver;
use crate::error::{ExecError, ExecResult};
use crate::executor::estate::{EFlags, EState};
use crate::executor::exec_procnode::ExecNode;
use crate::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorPhase {
    Created,
    Started,
    Ended,
}

pub struct QueryDesc<'a> {
    plan: &'a Plan,
    estate: &'a EState,
    eflags: EFlags,
    planstate: Option<ExecNode<'a>>,
    phase: ExecutorPhase,
}

impl<'a> QueryDesc<'a> {
    pub fn new(plan: &'a Plan, estate: &'a EState, eflags: EFlags) -> QueryDesc<'a> {
        QueryDesc {
            plan,
            estate,
            eflags,
            planstate: None,
            phase: ExecutorPhase::Created,
        }
    }

    pub fn phase(&self) -> ExecutorPhase {
        self.phase
    }

    pub fn planstate(&self) -> Option<&ExecNode<'a>> {
        self.planstate.as_ref()
    }

    pub fn executor_start(&mut self) -> ExecResult<()> {
        if self.phase != ExecutorPhase::Created {
            return Err(ExecError::AlreadyStarted);
        }

        let planstate = ExecNode::init(self.plan, self.estate, self.eflags)?;
        info!("started {} plan (eflags={:#x})", planstate.name(), self.eflags.bits());

        self.planstate = Some(planstate);
        self.phase = ExecutorPhase::Started;
        Ok(())
    }

    /// Sends up to `count` tuples (all of them when `count` is 0) to `dest`
    /// and returns how many were sent.
    pub fn executor_run(&mut self, dest: &mut dyn DestReceiver, count: u64) -> ExecResult<u64> {
        if self.eflags.contains(EFlags::EXPLAIN_ONLY) {
            return Err(ExecError::ExplainOnly);
        }

        let planstate = match (self.phase, self.planstate.as_mut()) {
            (ExecutorPhase::Started, Some(planstate)) => planstate,
            _ => return Err(ExecError::NotStarted),
        };

        dest.startup(planstate.result_desc())?;

        let mut current_tuple_count: u64 = 0;

        loop {
            let slot = match planstate.next()? {
                Some(slot) => slot,
                None => break,
            };

            dest.receive_slot(slot)?;
            self.estate.count_processed();
            current_tuple_count += 1;

            if count != 0 && current_tuple_count >= count {
                break;
            }
        }

        dest.shutdown()?;
        info!("{} tuples processed", current_tuple_count);
        Ok(current_tuple_count)
    }

    /// Shuts the tree down. Safe to call more than once.
    pub fn executor_end(&mut self) -> ExecResult<()> {
        if self.phase == ExecutorPhase::Ended {
            return Ok(());
        }

        self.phase = ExecutorPhase::Ended;

        match self.planstate.as_mut() {
            Some(planstate) => planstate.close(),
            None => Ok(()),
        }
    }

    pub fn explain(&self) -> ExecResult<String> {
        match &self.planstate {
            Some(planstate) => Ok(planstate.explain()),
            None => Err(ExecError::NotStarted),
        }
    }
}

impl<'a> Drop for QueryDesc<'a> {
    fn drop(&mut self) {
        if self.phase == ExecutorPhase::Started {
            if let Err(e) = self.executor_end() {
                warn!("failed to shut down executor: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::attribute::Attribute;
    use crate::dest::CollectReceiver;
    use crate::tuple::TupleDesc;
    use crate::ty::{Datum, TypeLabel};

    fn twice_over(vals: &[i32]) -> Plan {
        let desc = TupleDesc::new(vec![Attribute::new("n", TypeLabel::Integer)]);
        Plan::twice(Plan::values(desc, vals.iter().map(|v| vec![Datum::Integer(*v)]).collect()))
    }

    #[test]
    fn test_start_run_end() {
        let estate = EState::new();
        let plan = twice_over(&[1, 2]);
        let mut query = QueryDesc::new(&plan, &estate, EFlags::NONE);
        let mut dest = CollectReceiver::new();

        assert!(query.planstate().is_none());
        query.executor_start().unwrap();
        assert_eq!(query.planstate().map(|node| node.name()), Some("Twice"));
        assert_eq!(query.executor_run(&mut dest, 0).unwrap(), 4);
        query.executor_end().unwrap();
        query.executor_end().unwrap();

        assert_eq!(query.phase(), ExecutorPhase::Ended);
        assert_eq!(estate.processed(), 4);
        assert_eq!(estate.live_slots(), 0);
        assert_eq!(dest.rows.len(), 4);
    }

    #[test]
    fn test_run_with_count() {
        let estate = EState::new();
        let plan = twice_over(&[1, 2]);
        let mut query = QueryDesc::new(&plan, &estate, EFlags::NONE);
        let mut dest = CollectReceiver::new();

        query.executor_start().unwrap();
        assert_eq!(query.executor_run(&mut dest, 3).unwrap(), 3);
        // picks up where the previous run stopped
        assert_eq!(query.executor_run(&mut dest, 0).unwrap(), 1);

        let got: Vec<Datum> = dest.into_rows().into_iter().map(|mut r| r.remove(0)).collect();
        assert_eq!(
            got,
            vec![Datum::Integer(1), Datum::Integer(1), Datum::Integer(2), Datum::Integer(2)]
        );
    }

    #[test]
    fn test_lifecycle_misuse() {
        let estate = EState::new();
        let plan = twice_over(&[1]);
        let mut query = QueryDesc::new(&plan, &estate, EFlags::NONE);
        let mut dest = CollectReceiver::new();

        assert!(matches!(query.executor_run(&mut dest, 0), Err(ExecError::NotStarted)));
        assert!(matches!(query.explain(), Err(ExecError::NotStarted)));

        query.executor_start().unwrap();
        assert!(matches!(query.executor_start(), Err(ExecError::AlreadyStarted)));

        query.executor_end().unwrap();
        assert!(matches!(query.executor_run(&mut dest, 0), Err(ExecError::NotStarted)));
    }

    #[test]
    fn test_explain_only() {
        let estate = EState::new();
        let plan = twice_over(&[1]);
        let mut query = QueryDesc::new(&plan, &estate, EFlags::EXPLAIN_ONLY);
        let mut dest = CollectReceiver::new();

        query.executor_start().unwrap();
        assert!(query.explain().unwrap().starts_with("Twice"));
        assert!(matches!(query.executor_run(&mut dest, 0), Err(ExecError::ExplainOnly)));
    }

    #[test]
    fn test_drop_closes_tree() {
        let estate = EState::new();
        let plan = twice_over(&[1, 2]);

        {
            let mut query = QueryDesc::new(&plan, &estate, EFlags::NONE);
            query.executor_start().unwrap();
            assert_eq!(estate.live_slots(), 2);
        }

        assert_eq!(estate.live_slots(), 0);
    }
}
