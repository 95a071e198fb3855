//! Fail-fast execution of chained steps

use crate::core::error::{AgentError, Result};
use crate::core::types::ActionPlan;

/// Something that can run a single step and report success
pub trait StepRunner {
    fn run_step(&self, step: &ActionPlan, depth: usize) -> bool;
}

/// Runs chain steps strictly in order, stopping at the first failure
pub struct ChainExecutor;

impl ChainExecutor {
    /// Execute `steps` at nesting `depth`; true only if every step succeeded
    pub fn execute_chain<R: StepRunner + ?Sized>(
        runner: &R,
        steps: &[ActionPlan],
        depth: usize,
    ) -> bool {
        match Self::run(runner, steps, depth) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    /// Like `execute_chain`, reporting which step broke the chain
    pub fn run<R: StepRunner + ?Sized>(
        runner: &R,
        steps: &[ActionPlan],
        depth: usize,
    ) -> Result<()> {
        tracing::debug!("Chain of {} steps at depth {}", steps.len(), depth);

        for (index, step) in steps.iter().enumerate() {
            if !runner.run_step(step, depth) {
                let skipped = steps.len() - index - 1;
                if skipped > 0 {
                    tracing::debug!("{} step(s) after '{}' skipped", skipped, step.action);
                }
                return Err(AgentError::ChainAborted {
                    index,
                    action: step.action.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Succeeds unless the action is "fail"; records every call
    struct Scripted {
        calls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl StepRunner for Scripted {
        fn run_step(&self, step: &ActionPlan, _depth: usize) -> bool {
            self.calls.borrow_mut().push(step.action.clone());
            step.action != "fail"
        }
    }

    #[test]
    fn test_all_steps_succeed() {
        let runner = Scripted::new();
        let steps = vec![ActionPlan::new("a"), ActionPlan::new("b")];
        assert!(ChainExecutor::execute_chain(&runner, &steps, 1));
        assert_eq!(*runner.calls.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let runner = Scripted::new();
        let steps = vec![
            ActionPlan::new("s1"),
            ActionPlan::new("fail"),
            ActionPlan::new("s3"),
        ];
        assert!(!ChainExecutor::execute_chain(&runner, &steps, 1));
        assert_eq!(*runner.calls.borrow(), vec!["s1", "fail"]);
    }

    #[test]
    fn test_first_step_failure_runs_nothing_else() {
        let runner = Scripted::new();
        let steps = vec![ActionPlan::new("fail"), ActionPlan::new("s2")];
        assert!(!ChainExecutor::execute_chain(&runner, &steps, 1));
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_run_reports_failing_step() {
        let runner = Scripted::new();
        let steps = vec![ActionPlan::new("s1"), ActionPlan::new("fail")];
        match ChainExecutor::run(&runner, &steps, 1) {
            Err(AgentError::ChainAborted { index, action }) => {
                assert_eq!(index, 1);
                assert_eq!(action, "fail");
            }
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_chain_succeeds() {
        let runner = Scripted::new();
        assert!(ChainExecutor::execute_chain(&runner, &[], 1));
        assert!(runner.calls.borrow().is_empty());
    }
}
