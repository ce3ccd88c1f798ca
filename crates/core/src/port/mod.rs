// Port Layer - Interfaces for external collaborators

pub mod id_provider; // For deterministic testing
pub mod job;
pub mod job_factory;
pub mod message_bus;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use job::{AsAny, Job, JobError, JobExecutionContext};
pub use job_factory::JobFactory;
pub use message_bus::{BusError, MessageBus, MessageEnvelope};
pub use time_provider::TimeProvider;
