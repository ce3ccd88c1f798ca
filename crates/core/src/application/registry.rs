// Job Registry - the set of job types this process can instantiate

use crate::application::descriptor::JobDescriptor;
use crate::application::instantiator::TypedInstantiator;
use crate::domain::JobTypeKey;
use crate::error::{FactoryError, Result};
use crate::port::{Job, JobFactory, MessageBus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Type-erased job registration
///
/// Implemented by [`JobDescriptor`]; compiling a registration yields the typed
/// instantiator for its job type behind the [`JobFactory`] port.
pub trait JobRegistration: Send + Sync {
    fn job_type(&self) -> &JobTypeKey;

    /// Build the instantiator for this job type
    ///
    /// # Errors
    /// - FactoryError::UnsupportedConstruction if no constructor was registered
    fn compile(&self, bus: Arc<dyn MessageBus>) -> Result<Arc<dyn JobFactory>>;
}

impl<T: Job> JobRegistration for JobDescriptor<T> {
    fn job_type(&self) -> &JobTypeKey {
        JobDescriptor::job_type(self)
    }

    fn compile(&self, bus: Arc<dyn MessageBus>) -> Result<Arc<dyn JobFactory>> {
        let instantiator = TypedInstantiator::compile(self, bus)?;
        Ok(Arc::new(instantiator))
    }
}

/// Immutable job type registry, built once at startup
pub struct JobRegistry {
    registrations: HashMap<JobTypeKey, Arc<dyn JobRegistration>>,
}

impl JobRegistry {
    pub fn builder() -> JobRegistryBuilder {
        JobRegistryBuilder::default()
    }

    pub fn get(&self, job_type: &JobTypeKey) -> Option<&Arc<dyn JobRegistration>> {
        self.registrations.get(job_type)
    }

    pub fn contains(&self, job_type: &JobTypeKey) -> bool {
        self.registrations.contains_key(job_type)
    }

    /// Registered job types, sorted
    pub fn job_types(&self) -> Vec<&JobTypeKey> {
        let mut types: Vec<&JobTypeKey> = self.registrations.keys().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[derive(Default)]
pub struct JobRegistryBuilder {
    registrations: Vec<Arc<dyn JobRegistration>>,
}

impl JobRegistryBuilder {
    pub fn register<T: Job>(mut self, descriptor: JobDescriptor<T>) -> Self {
        self.registrations.push(Arc::new(descriptor));
        self
    }

    /// Register a hand-written registration (e.g. one wrapping a descriptor)
    pub fn register_registration(mut self, registration: Arc<dyn JobRegistration>) -> Self {
        self.registrations.push(registration);
        self
    }

    /// Freeze the registry
    ///
    /// # Errors
    /// - FactoryError::DuplicateRegistration if a job type was registered twice
    pub fn build(self) -> Result<JobRegistry> {
        let mut registrations = HashMap::with_capacity(self.registrations.len());
        for registration in self.registrations {
            let job_type = registration.job_type().clone();
            if registrations.contains_key(&job_type) {
                return Err(FactoryError::DuplicateRegistration(job_type));
            }
            registrations.insert(job_type, registration);
        }

        info!(job_types = registrations.len(), "Job registry built");
        Ok(JobRegistry { registrations })
    }
}
