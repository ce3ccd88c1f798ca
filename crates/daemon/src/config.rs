//! Daemon configuration from environment variables
//!
//! - `JOBWIRE_LOG_FORMAT`: `pretty` (default) or `json`
//! - `JOBWIRE_SCHEDULE_PATH`: JSON schedule file (`~` is expanded); a built-in
//!   demo schedule is used when unset
//! - `JOBWIRE_BUS_ADDRESS`: URI of the in-process bus
//! - `JOBWIRE_SCHEDULER_CONTEXT`: JSON object shared by every firing

use crate::constants::{DEFAULT_BUS_ADDRESS, DEFAULT_TRIGGER_GROUP, MIN_TRIGGER_INTERVAL_MS};
use crate::jobs::{HEARTBEAT_JOB, SCHEDULED_MESSAGE_JOB};
use anyhow::{bail, Context, Result};
use jobwire_core::domain::{JobDataMap, JobDetail, JobTypeKey, SchedulerKey, TriggerDetail};
use serde::Deserialize;
use serde_json::json;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// One repeating trigger
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TriggerSpec {
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
    pub job_type: String,
    pub interval_ms: u64,
    #[serde(default)]
    pub job_data: JobDataMap,
    #[serde(default)]
    pub trigger_data: JobDataMap,
}

fn default_group() -> String {
    DEFAULT_TRIGGER_GROUP.to_string()
}

impl TriggerSpec {
    pub fn job_detail(&self) -> JobDetail {
        JobDetail::new(
            SchedulerKey::new(self.name.clone(), self.group.clone()),
            JobTypeKey::new(self.job_type.clone()),
        )
        .with_job_data(self.job_data.clone())
    }

    pub fn trigger_detail(&self) -> TriggerDetail {
        TriggerDetail::new(SchedulerKey::new(
            format!("{}-trigger", self.name),
            self.group.clone(),
        ))
        .with_job_data(self.trigger_data.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schedule {
    pub triggers: Vec<TriggerSpec>,
}

impl Schedule {
    pub fn parse(text: &str) -> Result<Self> {
        let schedule: Schedule = serde_json::from_str(text).context("Invalid schedule JSON")?;
        schedule.validate()?;
        Ok(schedule)
    }

    fn validate(&self) -> Result<()> {
        for trigger in &self.triggers {
            if trigger.interval_ms < MIN_TRIGGER_INTERVAL_MS {
                bail!(
                    "Trigger '{}' has interval_ms {} (minimum {})",
                    trigger.name,
                    trigger.interval_ms,
                    MIN_TRIGGER_INTERVAL_MS
                );
            }
        }
        Ok(())
    }

    /// Schedule used when no schedule file is configured
    pub fn demo() -> Self {
        Self {
            triggers: vec![
                TriggerSpec {
                    name: "heartbeat".to_string(),
                    group: default_group(),
                    job_type: HEARTBEAT_JOB.to_string(),
                    interval_ms: 5_000,
                    job_data: [("Label", json!("demo"))].into_iter().collect(),
                    trigger_data: JobDataMap::new(),
                },
                TriggerSpec {
                    name: "order-reminder".to_string(),
                    group: default_group(),
                    job_type: SCHEDULED_MESSAGE_JOB.to_string(),
                    interval_ms: 10_000,
                    job_data: [
                        ("Destination", json!("loopback://localhost/orders")),
                        ("MessageType", json!("OrderReminder")),
                        ("Body", json!({"reminder": "pending orders"})),
                    ]
                    .into_iter()
                    .collect(),
                    trigger_data: JobDataMap::new(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub log_format: LogFormat,
    pub schedule: Schedule,
    pub bus_address: Url,
    pub scheduler_context: JobDataMap,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("JOBWIRE_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let schedule = match lookup("JOBWIRE_SCHEDULE_PATH") {
            Some(path) => {
                let path = shellexpand::tilde(&path).into_owned();
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read schedule file {}", path))?;
                Schedule::parse(&text).with_context(|| format!("Schedule file {}", path))?
            }
            None => Schedule::demo(),
        };

        let bus_address = lookup("JOBWIRE_BUS_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BUS_ADDRESS.to_string());
        let bus_address = Url::parse(&bus_address)
            .with_context(|| format!("Invalid JOBWIRE_BUS_ADDRESS '{}'", bus_address))?;

        let scheduler_context = match lookup("JOBWIRE_SCHEDULER_CONTEXT") {
            Some(text) => {
                let value: serde_json::Value = serde_json::from_str(&text)
                    .context("JOBWIRE_SCHEDULER_CONTEXT is not valid JSON")?;
                JobDataMap::from_json_object(value)
                    .context("JOBWIRE_SCHEDULER_CONTEXT must be a JSON object")?
            }
            None => JobDataMap::new(),
        };

        Ok(Self {
            log_format,
            schedule,
            bus_address,
            scheduler_context,
        })
    }
}
