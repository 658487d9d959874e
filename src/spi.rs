// Runs plan text end to end: parse, start, run, end.

use crate::config::Config;
use crate::dest::DestReceiver;
use crate::error::ExecResult;
use crate::executor::estate::{EFlags, EState, InterruptHandle};
use crate::executor::exec_main::QueryDesc;
use crate::parser::parse_plan;

pub enum QueryOutcome {
    // number of tuples sent to the destination
    Rows(u64),
    Explain(String),
}

pub struct Executor {
    config: Config,
    interrupts: InterruptHandle,
}

impl Executor {
    pub fn new(config: Config) -> Executor {
        Executor {
            config,
            interrupts: InterruptHandle::default(),
        }
    }

    // Handle that cancels queries run by this executor.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    pub fn execute_query(&self, query: &str, dest: &mut dyn DestReceiver) -> ExecResult<QueryOutcome> {
        let plan = parse_plan(query)?;
        let estate = EState::with_interrupts(self.interrupts.clone());
        let mut query_desc = QueryDesc::new(&plan, &estate, self.config.eflags);

        query_desc.executor_start()?;

        if self.config.eflags.contains(EFlags::EXPLAIN_ONLY) {
            let text = query_desc.explain()?;
            query_desc.executor_end()?;
            return Ok(QueryOutcome::Explain(text));
        }

        let result = query_desc.executor_run(dest, self.config.row_limit);
        // The tree is torn down even when the run failed; the run error wins.
        let ended = query_desc.executor_end();
        let count = result?;
        ended?;

        Ok(QueryOutcome::Rows(count))
    }
}
