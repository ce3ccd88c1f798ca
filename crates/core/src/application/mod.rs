// Application Layer - Job registration, resolution and instantiation

pub mod binding;
pub mod descriptor;
pub mod factory;
pub mod instantiator;
pub mod panic_guard;
pub mod registry;

// Re-exports
pub use binding::JobDataSources;
pub use descriptor::{ConstructionStrategy, FieldDescriptor, JobDescriptor};
pub use factory::BusJobFactory;
pub use instantiator::TypedInstantiator;
pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use registry::{JobRegistration, JobRegistry, JobRegistryBuilder};
