// Domain Layer - Job identity, configuration data and firing metadata

pub mod bundle;
pub mod error;
pub mod field;
pub mod fire_times;
pub mod job_data;
pub mod job_type;

// Re-exports
pub use bundle::{JobDetail, TriggerDetail, TriggerFiredBundle};
pub use error::BindError;
pub use field::{FieldKind, FieldType, FieldValue};
pub use fire_times::{headers, FireTimes, FIRE_TIMES_ENTRY};
pub use job_data::JobDataMap;
pub use job_type::{JobTypeKey, SchedulerKey, DEFAULT_GROUP};
