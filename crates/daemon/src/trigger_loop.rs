// Trigger Loop - fires configured triggers on fixed intervals
//
// Stands in for an external scheduler: every firing goes through the
// JobFactory port exactly as a real scheduler would drive it.

use crate::config::TriggerSpec;
use crate::shutdown::ShutdownToken;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jobwire_core::domain::{FireTimes, JobDataMap, JobDetail, TriggerDetail, TriggerFiredBundle};
use jobwire_core::port::{IdProvider, JobExecutionContext, JobFactory, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Mutable per-trigger state
pub struct TriggerState {
    pub job_detail: JobDetail,
    pub trigger: TriggerDetail,
    pub interval: Duration,
    pub previous_fire: Option<DateTime<Utc>>,
    pub fire_count: u64,
}

impl TriggerState {
    pub fn from_spec(spec: &TriggerSpec) -> Self {
        Self {
            job_detail: spec.job_detail(),
            trigger: spec.trigger_detail(),
            interval: Duration::from_millis(spec.interval_ms),
            previous_fire: None,
            fire_count: 0,
        }
    }
}

pub struct TriggerLoop {
    factory: Arc<dyn JobFactory>,
    scheduler_context: JobDataMap,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl TriggerLoop {
    pub fn new(
        factory: Arc<dyn JobFactory>,
        scheduler_context: JobDataMap,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            factory,
            scheduler_context,
            time_provider,
            id_provider,
        }
    }

    /// Fire one trigger: build the job, execute it, hand it back
    pub async fn fire(&self, state: &mut TriggerState) -> Result<()> {
        let now = self.time_provider.now();
        let next = chrono::Duration::from_std(state.interval)
            .ok()
            .and_then(|d| now.checked_add_signed(d));
        let fire_times = FireTimes::fired_at(now)
            .with_previous(state.previous_fire)
            .with_next(next);

        let bundle = TriggerFiredBundle::new(
            state.job_detail.clone(),
            state.trigger.clone(),
            fire_times,
            self.id_provider.generate_id(),
        );
        state.previous_fire = Some(now);
        state.fire_count += 1;

        let job = self
            .factory
            .new_job(&bundle, &self.scheduler_context)
            .with_context(|| format!("Trigger {} could not build its job", state.trigger.key))?;

        let ctx = JobExecutionContext::from_bundle(&bundle)
            .context("Fired bundle lost its job detail")?;
        let outcome = job.execute(&ctx).await;
        self.factory.return_job(job);

        outcome.with_context(|| format!("Job {} failed", state.job_detail.key))?;
        info!(
            trigger = %state.trigger.key,
            fire_instance_id = %bundle.fire_instance_id,
            fire_count = state.fire_count,
            "Job completed"
        );
        Ok(())
    }

    /// Fire a trigger every interval until shutdown
    ///
    /// Failures are logged and the trigger keeps firing; retry and misfire
    /// handling are not this loop's concern.
    pub async fn run_trigger(&self, mut state: TriggerState, mut shutdown: ShutdownToken) {
        let mut ticker = interval(state.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            trigger = %state.trigger.key,
            job_type = %state.job_detail.job_type,
            interval_ms = state.interval.as_millis() as u64,
            "Trigger scheduled"
        );

        loop {
            if shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.fire(&mut state).await {
                        error!(trigger = %state.trigger.key, error = ?e, "Trigger firing failed");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!(trigger = %state.trigger.key, fired = state.fire_count, "Trigger stopped");
    }

    /// Run every trigger on its own task until shutdown
    pub async fn run(self: Arc<Self>, triggers: &[TriggerSpec], shutdown: ShutdownToken) {
        let mut tasks = JoinSet::new();
        for spec in triggers {
            let this = Arc::clone(&self);
            let state = TriggerState::from_spec(spec);
            let token = shutdown.clone();
            tasks.spawn(async move { this.run_trigger(state, token).await });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = ?e, "Trigger task aborted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{registry, HEARTBEAT_JOB, SCHEDULED_MESSAGE_JOB};
    use crate::shutdown::shutdown_channel;
    use chrono::TimeZone;
    use jobwire_core::application::BusJobFactory;
    use jobwire_core::domain::headers;
    use jobwire_core::port::id_provider::SequentialIdProvider;
    use jobwire_core::port::message_bus::mocks::RecordingBus;
    use jobwire_core::port::time_provider::FixedTimeProvider;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap()
    }

    fn trigger_loop(bus: Arc<RecordingBus>, scheduler_context: JobDataMap) -> TriggerLoop {
        let factory = Arc::new(BusJobFactory::new(bus, registry().unwrap()));
        TriggerLoop::new(
            factory,
            scheduler_context,
            Arc::new(FixedTimeProvider(fixed_now())),
            Arc::new(SequentialIdProvider::default()),
        )
    }

    fn spec(job_type: &str, job_data: JobDataMap) -> TriggerSpec {
        TriggerSpec {
            name: "test".to_string(),
            group: "tests".to_string(),
            job_type: job_type.to_string(),
            interval_ms: 60_000,
            job_data,
            trigger_data: JobDataMap::new(),
        }
    }

    #[tokio::test]
    async fn test_fire_publishes_and_tracks_previous_fire_time() {
        let bus = Arc::new(RecordingBus::default());
        let context: JobDataMap = [("MessageType", json!("FromContext"))].into_iter().collect();
        let runner = trigger_loop(bus.clone(), context);
        let mut state = TriggerState::from_spec(&spec(
            SCHEDULED_MESSAGE_JOB,
            [("Destination", json!("loopback://localhost/q"))]
                .into_iter()
                .collect(),
        ));

        runner.fire(&mut state).await.unwrap();
        runner.fire(&mut state).await.unwrap();

        let published = bus.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].message_type, "FromContext");
        assert_eq!(published[0].message_id, "fire-1");
        assert_eq!(published[1].message_id, "fire-2");
        // First firing has no previous fire time, the second one does
        assert!(!published[0].headers.contains_key(headers::PREVIOUS_SENT));
        assert!(published[1].headers.contains_key(headers::PREVIOUS_SENT));
        assert!(published[0].headers.contains_key(headers::NEXT_SCHEDULED));
        assert_eq!(state.fire_count, 2);
        assert_eq!(state.previous_fire, Some(fixed_now()));
    }

    #[tokio::test]
    async fn test_fire_reports_unregistered_job_type() {
        let runner = trigger_loop(Arc::new(RecordingBus::default()), JobDataMap::new());
        let mut state = TriggerState::from_spec(&spec("Unknown", JobDataMap::new()));

        let err = runner.fire(&mut state).await.unwrap_err();
        assert!(err.to_string().contains("could not build its job"));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let bus = Arc::new(RecordingBus::default());
        let runner = Arc::new(trigger_loop(bus, JobDataMap::new()));
        let (tx, token) = shutdown_channel();
        let triggers = vec![spec(HEARTBEAT_JOB, JobDataMap::new())];

        let handle = tokio::spawn(async move { runner.run(&triggers, token).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.shutdown();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("trigger loop did not stop")
            .unwrap();
    }
}
