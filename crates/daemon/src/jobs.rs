//! Job types hosted by the daemon
//!
//! - `ScheduledMessage`: publishes a configured message to the bus on every
//!   firing, forwarding the trigger's fire times as message headers
//! - `Heartbeat`: logs a line; takes no bus

use async_trait::async_trait;
use jobwire_core::application::{JobDescriptor, JobRegistry};
use jobwire_core::domain::{FireTimes, FIRE_TIMES_ENTRY};
use jobwire_core::port::{Job, JobError, JobExecutionContext, MessageBus, MessageEnvelope};
use jobwire_core::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub const SCHEDULED_MESSAGE_JOB: &str = "ScheduledMessage";
pub const HEARTBEAT_JOB: &str = "Heartbeat";

/// Header carrying the scheduler's fire instance id
pub const FIRE_INSTANCE_HEADER: &str = "Jobwire-FireInstanceId";

pub struct ScheduledMessageJob {
    bus: Arc<dyn MessageBus>,
    pub destination: Option<Url>,
    pub response_address: Option<Url>,
    pub message_type: String,
    pub body: Value,
    pub payload_headers_json: Option<String>,
}

impl ScheduledMessageJob {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self {
            bus,
            destination: None,
            response_address: None,
            message_type: String::new(),
            body: Value::Null,
            payload_headers_json: None,
        }
    }

    pub fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    /// Assemble the envelope for one firing
    pub fn envelope(&self, ctx: &JobExecutionContext) -> std::result::Result<MessageEnvelope, JobError> {
        let destination = self
            .destination
            .clone()
            .ok_or(JobError::MissingField("Destination"))?;

        let mut headers = BTreeMap::new();
        if let Some(text) = self.payload_headers_json.as_deref() {
            match FireTimes::decode(text) {
                Ok(times) => {
                    for (name, value) in times.header_pairs() {
                        headers.insert(name.to_string(), value);
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring malformed fire time headers"),
            }
        }
        headers.insert(FIRE_INSTANCE_HEADER.to_string(), ctx.fire_instance_id.clone());

        Ok(MessageEnvelope {
            message_id: ctx.fire_instance_id.clone(),
            destination,
            response_address: Some(
                self.response_address
                    .clone()
                    .unwrap_or_else(|| self.bus.address().clone()),
            ),
            message_type: self.message_type.clone(),
            headers,
            body: self.body.clone(),
        })
    }
}

#[async_trait]
impl Job for ScheduledMessageJob {
    async fn execute(&self, ctx: &JobExecutionContext) -> std::result::Result<(), JobError> {
        let envelope = self.envelope(ctx)?;
        self.bus.publish(envelope).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct HeartbeatJob {
    pub label: String,
}

#[async_trait]
impl Job for HeartbeatJob {
    async fn execute(&self, ctx: &JobExecutionContext) -> std::result::Result<(), JobError> {
        info!(
            label = %self.label,
            trigger = %ctx.trigger_key,
            fire_instance_id = %ctx.fire_instance_id,
            "Heartbeat"
        );
        Ok(())
    }
}

/// Registry of every job type the daemon can run
pub fn registry() -> Result<JobRegistry> {
    JobRegistry::builder()
        .register(
            JobDescriptor::<ScheduledMessageJob>::new(SCHEDULED_MESSAGE_JOB)
                .with_bus_constructor(ScheduledMessageJob::new)
                .field("Destination", |job: &mut ScheduledMessageJob, uri: Url| {
                    job.destination = Some(uri)
                })
                .field("ResponseAddress", |job: &mut ScheduledMessageJob, uri: Url| {
                    job.response_address = Some(uri)
                })
                .field("MessageType", |job: &mut ScheduledMessageJob, t: String| {
                    job.message_type = t
                })
                .field("Body", |job: &mut ScheduledMessageJob, body: Value| job.body = body)
                .field(FIRE_TIMES_ENTRY, |job: &mut ScheduledMessageJob, text: String| {
                    job.payload_headers_json = Some(text)
                }),
        )
        .register(
            JobDescriptor::<HeartbeatJob>::new(HEARTBEAT_JOB)
                .with_default_constructor(HeartbeatJob::default)
                .field("Label", |job: &mut HeartbeatJob, label: String| job.label = label),
        )
        .build()
}
