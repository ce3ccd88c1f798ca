//! Job descriptors - explicit registration of how to build and configure a job type
//!
//! A descriptor stands in for runtime type inspection: it lists the
//! constructors a job type offers and its writable configuration fields.
//!
//! ```text
//! JobDescriptor::<ScheduledMessageJob>::new("ScheduledMessage")
//!     .with_bus_constructor(ScheduledMessageJob::new)
//!     .field("Destination", |job: &mut ScheduledMessageJob, uri: Url| {
//!         job.destination = Some(uri)
//!     })
//! ```

use crate::domain::{BindError, FieldKind, FieldType, FieldValue, JobTypeKey};
use crate::port::{Job, MessageBus};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub type BusConstructor<T> = Arc<dyn Fn(Arc<dyn MessageBus>) -> T + Send + Sync>;
pub type DefaultConstructor<T> = Arc<dyn Fn() -> T + Send + Sync>;
pub type FieldSetter<T> = Arc<dyn Fn(&mut T, FieldValue) -> Result<(), BindError> + Send + Sync>;

/// Which constructor an instantiator uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionStrategy {
    /// Constructor taking the shared message bus
    WithBus,
    /// Parameterless constructor
    Parameterless,
}

impl fmt::Display for ConstructionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionStrategy::WithBus => write!(f, "WITH_BUS"),
            ConstructionStrategy::Parameterless => write!(f, "PARAMETERLESS"),
        }
    }
}

/// One named, writable configuration field of a job type
pub struct FieldDescriptor<T> {
    name: String,
    kind: FieldKind,
    setter: FieldSetter<T>,
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            setter: Arc::clone(&self.setter),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Coerce `raw` to this field's kind and assign it on `job`
    pub fn assign(&self, job: &mut T, raw: Value) -> Result<(), BindError> {
        let value = self.kind.coerce(&self.name, raw)?;
        (self.setter)(job, value)
    }
}

/// Registration of one job type
pub struct JobDescriptor<T> {
    job_type: JobTypeKey,
    bus_constructor: Option<BusConstructor<T>>,
    default_constructor: Option<DefaultConstructor<T>>,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Job> JobDescriptor<T> {
    pub fn new(job_type: impl Into<JobTypeKey>) -> Self {
        Self {
            job_type: job_type.into(),
            bus_constructor: None,
            default_constructor: None,
            fields: Vec::new(),
        }
    }

    /// Constructor that receives the shared message bus
    pub fn with_bus_constructor<F>(mut self, ctor: F) -> Self
    where
        F: Fn(Arc<dyn MessageBus>) -> T + Send + Sync + 'static,
    {
        self.bus_constructor = Some(Arc::new(ctor));
        self
    }

    /// Parameterless constructor
    pub fn with_default_constructor<F>(mut self, ctor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_constructor = Some(Arc::new(ctor));
        self
    }

    /// Declare a writable field; the setter's value type decides coercion
    pub fn field<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: FieldType,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        let field_name = name.clone();
        let setter: FieldSetter<T> = Arc::new(move |job, value| {
            let actual = value.kind();
            let typed = V::from_field_value(value).ok_or_else(|| BindError::TypeMismatch {
                field: field_name.clone(),
                expected: V::KIND,
                actual: actual.to_string(),
            })?;
            setter(job, typed);
            Ok(())
        });

        self.fields.push(FieldDescriptor {
            name,
            kind: V::KIND,
            setter,
        });
        self
    }

    pub fn job_type(&self) -> &JobTypeKey {
        &self.job_type
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub(crate) fn bus_constructor(&self) -> Option<&BusConstructor<T>> {
        self.bus_constructor.as_ref()
    }

    pub(crate) fn default_constructor(&self) -> Option<&DefaultConstructor<T>> {
        self.default_constructor.as_ref()
    }
}

impl<T> fmt::Debug for JobDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobDescriptor")
            .field("job_type", &self.job_type)
            .field("bus_constructor", &self.bus_constructor.is_some())
            .field("default_constructor", &self.default_constructor.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}
