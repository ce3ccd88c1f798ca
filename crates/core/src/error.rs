// Central Error Type for job instantiation

use crate::domain::{BindError, JobTypeKey};
use thiserror::Error;

/// Scheduler-facing job factory error
///
/// None of these are transient: they point at a deployment or programming
/// mistake, or at a bad value in a job's configuration. Retry and misfire
/// policy belongs to the scheduler.
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Job detail was missing from the fired trigger")]
    MissingJobDetail,

    #[error("Job type is not registered: {0}")]
    UnregisteredJobType(JobTypeKey),

    #[error("Job type registered more than once: {0}")]
    DuplicateRegistration(JobTypeKey),

    #[error("The job type does not have a supported constructor: {type_name}")]
    UnsupportedConstruction { type_name: String },

    #[error("Problem instantiating job type '{type_name}'")]
    Instantiation {
        type_name: String,
        #[source]
        source: BindError,
    },
}

impl FactoryError {
    /// Whether firing again could succeed without a code or config change
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Name of the job type the error is about, when known
    pub fn type_name(&self) -> Option<&str> {
        match self {
            FactoryError::MissingJobDetail => None,
            FactoryError::UnregisteredJobType(key) | FactoryError::DuplicateRegistration(key) => {
                Some(key.as_str())
            }
            FactoryError::UnsupportedConstruction { type_name }
            | FactoryError::Instantiation { type_name, .. } => Some(type_name),
        }
    }
}

/// Result type alias using FactoryError
pub type Result<T> = std::result::Result<T, FactoryError>;
