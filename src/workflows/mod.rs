//! Step-based workflow runner with compensation.
//!
//! A [`Workflow`] invokes its steps in order. When a step fails, the failed
//! step and every step before it are compensated in reverse order, so a
//! workflow either completes or leaves no trace behind.

use thiserror::Error;

use crate::services::{ServiceError, ServiceResult};

pub mod update_price_lists;

pub use update_price_lists::{
    LocalWorkflowEngine, PriceListPricesUpdate, UpdatePriceListsInput, WorkflowEngine,
};

/// Result type returned by workflow runs.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A step failed and every completed step was compensated.
    #[error("workflow `{workflow}` failed at step `{step}`: {source}")]
    StepFailed {
        workflow: &'static str,
        step: &'static str,
        #[source]
        source: ServiceError,
    },
    /// A step failed and undoing an earlier step failed as well.
    #[error("workflow `{workflow}` could not compensate step `{step}`: {source}")]
    CompensationFailed {
        workflow: &'static str,
        step: &'static str,
        #[source]
        source: ServiceError,
    },
}

impl From<WorkflowError> for ServiceError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::StepFailed { source, .. } => source,
            err @ WorkflowError::CompensationFailed { .. } => Self::aborted(err.to_string()),
        }
    }
}

/// One unit of work inside a workflow.
pub trait WorkflowStep<C> {
    fn name(&self) -> &'static str;

    fn invoke(&self, ctx: &mut C) -> ServiceResult<()>;

    /// Undo whatever `invoke` committed. Also called for the step that failed.
    fn compensate(&self, _ctx: &mut C) -> ServiceResult<()> {
        Ok(())
    }
}

pub struct Workflow<'a, C> {
    name: &'static str,
    steps: Vec<Box<dyn WorkflowStep<C> + 'a>>,
}

impl<'a, C> Workflow<'a, C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl WorkflowStep<C> + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self, ctx: &mut C) -> WorkflowResult<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            log::debug!("Workflow `{}` invoking step `{}`", self.name, step.name());

            let Err(err) = step.invoke(ctx) else {
                continue;
            };

            log::warn!(
                "Workflow `{}` step `{}` failed, compensating: {err}",
                self.name,
                step.name()
            );

            for done in self.steps.iter().take(idx + 1).rev() {
                if let Err(comp_err) = done.compensate(ctx) {
                    log::error!(
                        "Workflow `{}` failed to compensate step `{}`: {comp_err}",
                        self.name,
                        done.name()
                    );
                    return Err(WorkflowError::CompensationFailed {
                        workflow: self.name,
                        step: done.name(),
                        source: comp_err,
                    });
                }
            }

            return Err(WorkflowError::StepFailed {
                workflow: self.name,
                step: step.name(),
                source: err,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use mockall::mock;

    use super::{UpdatePriceListsInput, WorkflowEngine, WorkflowResult};

    mock! {
        pub WorkflowEngine {}

        impl WorkflowEngine for WorkflowEngine {
            fn run_update_price_lists(&self, input: &UpdatePriceListsInput) -> WorkflowResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Journal {
        events: Vec<String>,
    }

    struct Recording {
        name: &'static str,
        fail: bool,
        fail_compensation: bool,
    }

    impl Recording {
        fn ok(name: &'static str) -> Self {
            Self {
                name,
                fail: false,
                fail_compensation: false,
            }
        }
    }

    impl WorkflowStep<Journal> for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn invoke(&self, ctx: &mut Journal) -> ServiceResult<()> {
            ctx.events.push(format!("invoke:{}", self.name));
            if self.fail {
                return Err(ServiceError::invalid_argument(self.name));
            }
            Ok(())
        }

        fn compensate(&self, ctx: &mut Journal) -> ServiceResult<()> {
            ctx.events.push(format!("compensate:{}", self.name));
            if self.fail_compensation {
                return Err(ServiceError::aborted(self.name));
            }
            Ok(())
        }
    }

    #[test]
    fn run_invokes_steps_in_order() {
        let workflow = Workflow::new("demo")
            .step(Recording::ok("a"))
            .step(Recording::ok("b"));
        let mut journal = Journal::default();

        workflow.run(&mut journal).expect("expected success");

        assert_eq!(journal.events, vec!["invoke:a", "invoke:b"]);
    }

    #[test]
    fn failure_compensates_failed_and_completed_steps_in_reverse() {
        let workflow = Workflow::new("demo")
            .step(Recording::ok("a"))
            .step(Recording {
                fail: true,
                ..Recording::ok("b")
            })
            .step(Recording::ok("c"));
        let mut journal = Journal::default();

        let err = workflow.run(&mut journal).expect_err("expected failure");

        assert_eq!(
            journal.events,
            vec!["invoke:a", "invoke:b", "compensate:b", "compensate:a"]
        );
        assert!(matches!(
            ServiceError::from(err),
            ServiceError::InvalidArgument(message) if message == "b"
        ));
    }

    #[test]
    fn compensation_failure_is_reported_as_aborted() {
        let workflow = Workflow::new("demo")
            .step(Recording {
                fail_compensation: true,
                ..Recording::ok("a")
            })
            .step(Recording {
                fail: true,
                ..Recording::ok("b")
            });
        let mut journal = Journal::default();

        let err = workflow.run(&mut journal).expect_err("expected failure");

        assert!(matches!(
            err,
            WorkflowError::CompensationFailed { step: "a", .. }
        ));
        assert!(matches!(
            ServiceError::from(err),
            ServiceError::ConflictAborted(_)
        ));
    }
}
