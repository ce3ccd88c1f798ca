// Job identity: type keys and scheduler keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a job's concrete type (cache key for instantiators)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTypeKey(String);

impl JobTypeKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobTypeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Default group for jobs and triggers registered without one
pub const DEFAULT_GROUP: &str = "DEFAULT";

/// Scheduler key (name + group) for job definitions and triggers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchedulerKey {
    pub name: String,
    pub group: String,
}

impl SchedulerKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Key in the default group
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_GROUP)
    }
}

impl fmt::Display for SchedulerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_key_equality_and_display() {
        let a = JobTypeKey::new("reports.Nightly");
        let b: JobTypeKey = "reports.Nightly".into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "reports.Nightly");
    }

    #[test]
    fn test_scheduler_key_display() {
        assert_eq!(SchedulerKey::named("nightly").to_string(), "DEFAULT.nightly");
        assert_eq!(
            SchedulerKey::new("nightly", "reports").to_string(),
            "reports.nightly"
        );
    }
}
