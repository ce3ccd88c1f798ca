//! Bus Job Factory - resolves job types to cached instantiators
//!
//! **Cache layout**:
//! - `DashMap<JobTypeKey, Arc<OnceCell<..>>>`: the shard lock is held only
//!   while fetching or inserting a key's cell
//! - the instantiator is compiled inside the key's `OnceCell`, so concurrent
//!   first use of one key compiles it once and never blocks other keys
//! - a failed compile leaves the cell empty; the next firing tries again
//! - no eviction: the set of job types is fixed by the registry

use crate::application::registry::JobRegistry;
use crate::domain::{JobDataMap, JobTypeKey, TriggerFiredBundle};
use crate::error::{FactoryError, Result};
use crate::port::{Job, JobFactory, MessageBus};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};

type InstantiatorCell = Arc<OnceCell<Arc<dyn JobFactory>>>;

/// Job factory handed to the scheduler
pub struct BusJobFactory {
    bus: Arc<dyn MessageBus>,
    registry: Arc<JobRegistry>,
    instantiators: DashMap<JobTypeKey, InstantiatorCell>,
}

impl BusJobFactory {
    pub fn new(bus: Arc<dyn MessageBus>, registry: JobRegistry) -> Self {
        Self::with_shared_registry(bus, Arc::new(registry))
    }

    pub fn with_shared_registry(bus: Arc<dyn MessageBus>, registry: Arc<JobRegistry>) -> Self {
        Self {
            bus,
            registry,
            instantiators: DashMap::new(),
        }
    }

    pub fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Get (compiling on first use) the instantiator for a job type
    ///
    /// # Errors
    /// - FactoryError::UnregisteredJobType if the registry has no such type
    /// - FactoryError::UnsupportedConstruction if the type has no usable constructor
    pub fn instantiator(&self, job_type: &JobTypeKey) -> Result<Arc<dyn JobFactory>> {
        // Fast path: already compiled
        let cached = self.instantiators.get(job_type).map(|cell| Arc::clone(cell.value()));
        if let Some(factory) = cached.as_ref().and_then(|cell| cell.get()) {
            return Ok(Arc::clone(factory));
        }

        let registration = self
            .registry
            .get(job_type)
            .ok_or_else(|| FactoryError::UnregisteredJobType(job_type.clone()))?;

        let cell = match cached {
            Some(cell) => cell,
            None => Arc::clone(self.instantiators.entry(job_type.clone()).or_default().value()),
        };

        let factory = cell
            .get_or_try_init(|| {
                debug!(job_type = %job_type, "Instantiator cache miss, compiling");
                registration.compile(Arc::clone(&self.bus))
            })
            .inspect_err(|e| {
                warn!(job_type = %job_type, error = %e, "Job type cannot be instantiated");
            })?;

        Ok(Arc::clone(factory))
    }

    /// Job types with a compiled instantiator, sorted
    pub fn cached_types(&self) -> Vec<JobTypeKey> {
        let mut types: Vec<JobTypeKey> = self
            .instantiators
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| entry.key().clone())
            .collect();
        types.sort();
        types
    }
}

impl JobFactory for BusJobFactory {
    fn new_job(
        &self,
        bundle: &TriggerFiredBundle,
        scheduler_context: &JobDataMap,
    ) -> Result<Box<dyn Job>> {
        let job_type = bundle.job_type().ok_or(FactoryError::MissingJobDetail)?;

        self.instantiator(job_type)?
            .new_job(bundle, scheduler_context)
    }
}
