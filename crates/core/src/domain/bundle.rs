// Trigger firing bundle - what the scheduler hands over when a trigger fires

use super::fire_times::FireTimes;
use super::job_data::JobDataMap;
use super::job_type::{JobTypeKey, SchedulerKey};
use serde::{Deserialize, Serialize};

/// Static description of a scheduled job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub key: SchedulerKey,
    pub job_type: JobTypeKey,
    pub description: Option<String>,
    #[serde(default)]
    pub job_data: JobDataMap,
    /// Keep the definition when no trigger references it
    #[serde(default)]
    pub durable: bool,
}

impl JobDetail {
    pub fn new(key: SchedulerKey, job_type: JobTypeKey) -> Self {
        Self {
            key,
            job_type,
            description: None,
            job_data: JobDataMap::new(),
            durable: false,
        }
    }

    pub fn with_job_data(mut self, job_data: JobDataMap) -> Self {
        self.job_data = job_data;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Trigger that fired, with its own configuration entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDetail {
    pub key: SchedulerKey,
    #[serde(default)]
    pub job_data: JobDataMap,
}

impl TriggerDetail {
    pub fn new(key: SchedulerKey) -> Self {
        Self {
            key,
            job_data: JobDataMap::new(),
        }
    }

    pub fn with_job_data(mut self, job_data: JobDataMap) -> Self {
        self.job_data = job_data;
        self
    }
}

/// Everything known about one trigger firing
///
/// `job_detail` is optional because the bundle crosses a trust boundary; the
/// job factory rejects a bundle without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerFiredBundle {
    pub job_detail: Option<JobDetail>,
    pub trigger: TriggerDetail,
    #[serde(default)]
    pub fire_times: FireTimes,
    pub fire_instance_id: String,
    /// Set when the scheduler replays a firing after a crash
    #[serde(default)]
    pub recovering: bool,
}

impl TriggerFiredBundle {
    pub fn new(
        job_detail: JobDetail,
        trigger: TriggerDetail,
        fire_times: FireTimes,
        fire_instance_id: impl Into<String>,
    ) -> Self {
        Self {
            job_detail: Some(job_detail),
            trigger,
            fire_times,
            fire_instance_id: fire_instance_id.into(),
            recovering: false,
        }
    }

    /// Job type declared by the job definition, if any
    pub fn job_type(&self) -> Option<&JobTypeKey> {
        self.job_detail.as_ref().map(|d| &d.job_type)
    }
}
