//! Typed Instantiator - builds and configures one concrete job type
//!
//! Created once per job type from its [`JobDescriptor`]:
//! - the constructor is picked once (bus constructor first, parameterless second)
//!   and kept as a ready-to-call closure
//! - the writable fields are indexed by name once
//!
//! Each firing then only runs the closure, merges job data and binds it.

use crate::application::binding::JobDataSources;
use crate::application::descriptor::{ConstructionStrategy, FieldDescriptor, JobDescriptor};
use crate::application::panic_guard::{execute_guarded, PanicGuardResult};
use crate::domain::{BindError, JobDataMap, JobTypeKey, TriggerFiredBundle};
use crate::error::{FactoryError, Result};
use crate::port::{Job, JobFactory, MessageBus};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type CompiledConstructor<T> = Box<dyn Fn(&Arc<dyn MessageBus>) -> T + Send + Sync>;

pub struct TypedInstantiator<T> {
    job_type: JobTypeKey,
    bus: Arc<dyn MessageBus>,
    strategy: ConstructionStrategy,
    construct: CompiledConstructor<T>,
    fields: HashMap<String, FieldDescriptor<T>>,
}

impl<T: Job> TypedInstantiator<T> {
    /// Select the construction strategy and index the writable fields
    ///
    /// # Errors
    /// - FactoryError::UnsupportedConstruction if the descriptor offers no constructor
    pub fn compile(descriptor: &JobDescriptor<T>, bus: Arc<dyn MessageBus>) -> Result<Self> {
        let job_type = descriptor.job_type().clone();

        let (strategy, construct): (ConstructionStrategy, CompiledConstructor<T>) =
            if let Some(ctor) = descriptor.bus_constructor() {
                let ctor = Arc::clone(ctor);
                (
                    ConstructionStrategy::WithBus,
                    Box::new(move |bus: &Arc<dyn MessageBus>| ctor(Arc::clone(bus))),
                )
            } else if let Some(ctor) = descriptor.default_constructor() {
                let ctor = Arc::clone(ctor);
                (
                    ConstructionStrategy::Parameterless,
                    Box::new(move |_: &Arc<dyn MessageBus>| ctor()),
                )
            } else {
                return Err(FactoryError::UnsupportedConstruction {
                    type_name: job_type.to_string(),
                });
            };

        let mut fields = HashMap::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            if fields
                .insert(field.name().to_string(), field.clone())
                .is_some()
            {
                warn!(
                    job_type = %job_type,
                    field = field.name(),
                    "Field declared more than once, last declaration wins"
                );
            }
        }

        debug!(
            job_type = %job_type,
            rust_type = std::any::type_name::<T>(),
            strategy = %strategy,
            fields = fields.len(),
            "Compiled job instantiator"
        );

        Ok(Self {
            job_type,
            bus,
            strategy,
            construct,
            fields,
        })
    }

    pub fn job_type(&self) -> &JobTypeKey {
        &self.job_type
    }

    pub fn strategy(&self) -> ConstructionStrategy {
        self.strategy
    }

    /// Names of the writable fields, sorted
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build and configure a job for a fired trigger
    ///
    /// Construction, merge and binding run under a panic guard; any failure is
    /// reported as FactoryError::Instantiation and no job is returned.
    pub fn create(&self, bundle: &TriggerFiredBundle, scheduler_context: &JobDataMap) -> Result<T> {
        let detail = bundle
            .job_detail
            .as_ref()
            .ok_or(FactoryError::MissingJobDetail)?;

        let sources = JobDataSources {
            scheduler_context,
            job_detail: &detail.job_data,
            trigger: &bundle.trigger.job_data,
            fire_times: &bundle.fire_times,
        };

        let outcome = execute_guarded(AssertUnwindSafe(|| -> std::result::Result<T, BindError> {
            let mut job = (self.construct)(&self.bus);
            let job_data = sources.merge()?;
            self.bind(&mut job, &job_data)?;
            Ok(job)
        }));

        let cause = match outcome {
            PanicGuardResult::Success(Ok(job)) => {
                trace!(
                    job_type = %self.job_type,
                    fire_instance_id = %bundle.fire_instance_id,
                    "Job instantiated"
                );
                return Ok(job);
            }
            PanicGuardResult::Success(Err(e)) => e,
            PanicGuardResult::Panicked(msg) => BindError::Panicked(msg),
        };

        warn!(
            job_type = %self.job_type,
            fire_instance_id = %bundle.fire_instance_id,
            error = %cause,
            "Problem instantiating job"
        );
        Err(FactoryError::Instantiation {
            type_name: self.job_type.to_string(),
            source: cause,
        })
    }

    /// Assign every entry that names a writable field; returns how many were bound
    ///
    /// Entries without a matching field are skipped, not rejected.
    pub fn bind(&self, job: &mut T, job_data: &JobDataMap) -> std::result::Result<usize, BindError> {
        let mut bound = 0;
        for (name, value) in job_data {
            match self.fields.get(name.as_str()) {
                Some(field) => {
                    field.assign(job, value.clone())?;
                    trace!(job_type = %self.job_type, field = %name, kind = %field.kind(), "Bound field");
                    bound += 1;
                }
                None => {
                    trace!(job_type = %self.job_type, entry = %name, "No writable field, skipped");
                }
            }
        }
        Ok(bound)
    }
}

impl<T: Job> JobFactory for TypedInstantiator<T> {
    fn new_job(
        &self,
        bundle: &TriggerFiredBundle,
        scheduler_context: &JobDataMap,
    ) -> Result<Box<dyn Job>> {
        let job = self.create(bundle, scheduler_context)?;
        Ok(Box::new(job))
    }
}
