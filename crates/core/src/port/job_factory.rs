// Job Factory Port
// Contract consumed by the scheduler when a trigger fires

use crate::domain::{JobDataMap, TriggerFiredBundle};
use crate::error::Result;
use crate::port::job::Job;

/// Job factory trait
///
/// Implementations:
/// - BusJobFactory: resolves the job type and delegates to its instantiator
/// - TypedInstantiator: builds one concrete job type
pub trait JobFactory: Send + Sync {
    /// Build a fully configured job for a fired trigger
    ///
    /// # Errors
    /// - FactoryError::MissingJobDetail if the bundle carries no job detail
    /// - FactoryError::UnsupportedConstruction if the job type has no usable constructor
    /// - FactoryError::Instantiation if construction or binding failed
    fn new_job(
        &self,
        bundle: &TriggerFiredBundle,
        scheduler_context: &JobDataMap,
    ) -> Result<Box<dyn Job>>;

    /// Hand a job back once the scheduler is done with it
    ///
    /// Nothing is pooled, so the default just drops it.
    fn return_job(&self, job: Box<dyn Job>) {
        drop(job);
    }
}
