// Job Port
// What the scheduler executes once the factory has built and configured it

use crate::domain::{FireTimes, SchedulerKey, TriggerFiredBundle};
use crate::port::message_bus::BusError;
use async_trait::async_trait;
use std::any::Any;
use thiserror::Error;

/// Job execution errors
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Required field not set: {0}")]
    MissingField(&'static str),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Job failed: {0}")]
    Failed(String),
}

/// Per-firing information available to a running job
#[derive(Debug, Clone, PartialEq)]
pub struct JobExecutionContext {
    pub fire_instance_id: String,
    pub job_key: SchedulerKey,
    pub trigger_key: SchedulerKey,
    pub fire_times: FireTimes,
    pub recovering: bool,
}

impl JobExecutionContext {
    /// Context for a bundle; `None` when the bundle has no job detail
    pub fn from_bundle(bundle: &TriggerFiredBundle) -> Option<Self> {
        let detail = bundle.job_detail.as_ref()?;
        Some(Self {
            fire_instance_id: bundle.fire_instance_id.clone(),
            job_key: detail.key.clone(),
            trigger_key: bundle.trigger.key.clone(),
            fire_times: bundle.fire_times,
            recovering: bundle.recovering,
        })
    }
}

/// Upcast helper so hosts can inspect concrete job instances
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Job trait
///
/// Instances are built by a [`crate::port::JobFactory`], executed once by the
/// scheduler and then dropped.
#[async_trait]
pub trait Job: AsAny + Send + Sync + 'static {
    async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobError>;
}

impl dyn Job {
    /// Borrow the concrete job type, if it is `T`
    pub fn downcast_ref<T: Job>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    pub fn is<T: Job>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }
}
