//! Shared job types and fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jobwire_core::application::{JobDescriptor, JobRegistry, JobRegistryBuilder};
use jobwire_core::domain::{
    FireTimes, JobDataMap, JobDetail, JobTypeKey, SchedulerKey, TriggerDetail,
    TriggerFiredBundle, FIRE_TIMES_ENTRY,
};
use jobwire_core::port::{Job, JobError, JobExecutionContext, MessageBus};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const REMINDER_JOB: &str = "Reminder";
pub const PLAIN_JOB: &str = "Plain";
pub const NO_CONSTRUCTOR_JOB: &str = "NoConstructor";

/// Job with a bus constructor and one field of every kind
pub struct ReminderJob {
    pub bus: Arc<dyn MessageBus>,
    pub destination: Option<Url>,
    pub subject: Option<String>,
    pub attempts: i64,
    pub ratio: f64,
    pub enabled: bool,
    pub payload: Value,
    pub fire_times_json: Option<String>,
}

impl ReminderJob {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self {
            bus,
            destination: None,
            subject: None,
            attempts: 0,
            ratio: 0.0,
            enabled: false,
            payload: Value::Null,
            fire_times_json: None,
        }
    }
}

#[async_trait]
impl Job for ReminderJob {
    async fn execute(&self, _ctx: &JobExecutionContext) -> Result<(), JobError> {
        Ok(())
    }
}

/// Job with only a parameterless constructor
#[derive(Default)]
pub struct PlainJob {
    pub label: Option<String>,
}

#[async_trait]
impl Job for PlainJob {
    async fn execute(&self, _ctx: &JobExecutionContext) -> Result<(), JobError> {
        Ok(())
    }
}

pub fn reminder_descriptor() -> JobDescriptor<ReminderJob> {
    JobDescriptor::<ReminderJob>::new(REMINDER_JOB)
        .with_bus_constructor(ReminderJob::new)
        .field("Destination", |job: &mut ReminderJob, uri: Url| {
            job.destination = Some(uri)
        })
        .field("Subject", |job: &mut ReminderJob, s: String| job.subject = Some(s))
        .field("Attempts", |job: &mut ReminderJob, n: i64| job.attempts = n)
        .field("Ratio", |job: &mut ReminderJob, r: f64| job.ratio = r)
        .field("Enabled", |job: &mut ReminderJob, b: bool| job.enabled = b)
        .field("Payload", |job: &mut ReminderJob, v: Value| job.payload = v)
        .field(FIRE_TIMES_ENTRY, |job: &mut ReminderJob, text: String| {
            job.fire_times_json = Some(text)
        })
}

pub fn registry_builder() -> JobRegistryBuilder {
    JobRegistry::builder()
        .register(reminder_descriptor())
        .register(
            JobDescriptor::<PlainJob>::new(PLAIN_JOB)
                .with_default_constructor(PlainJob::default)
                .field("Label", |job: &mut PlainJob, s: String| job.label = Some(s)),
        )
        .register(JobDescriptor::<PlainJob>::new(NO_CONSTRUCTOR_JOB))
}

pub fn registry() -> JobRegistry {
    registry_builder().build().expect("test registry is valid")
}

pub fn fire_times() -> FireTimes {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 15, 30).unwrap();
    FireTimes::fired_at(at)
        .with_next(Some(at + chrono::Duration::hours(1)))
        .with_previous(Some(at - chrono::Duration::hours(1)))
}

pub fn bundle(job_type: &str, job_data: JobDataMap, trigger_data: JobDataMap) -> TriggerFiredBundle {
    TriggerFiredBundle::new(
        JobDetail::new(SchedulerKey::new("job", "tests"), JobTypeKey::new(job_type))
            .with_job_data(job_data),
        TriggerDetail::new(SchedulerKey::new("trigger", "tests")).with_job_data(trigger_data),
        fire_times(),
        "fire-1",
    )
}

pub fn data(entries: &[(&str, Value)]) -> JobDataMap {
    entries.iter().cloned().collect()
}
