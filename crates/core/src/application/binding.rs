// Job data merge - overlays configuration sources in precedence order

use crate::domain::{BindError, FireTimes, JobDataMap, FIRE_TIMES_ENTRY};
use tracing::trace;

/// Configuration sources for one firing, lowest precedence first
///
/// Precedence comes from the source, never from iteration order inside a map:
/// scheduler context < job definition < trigger < fire-time entry.
#[derive(Debug, Clone, Copy)]
pub struct JobDataSources<'a> {
    pub scheduler_context: &'a JobDataMap,
    pub job_detail: &'a JobDataMap,
    pub trigger: &'a JobDataMap,
    pub fire_times: &'a FireTimes,
}

impl JobDataSources<'_> {
    /// Merge every source into a single map (last writer wins)
    pub fn merge(&self) -> Result<JobDataMap, BindError> {
        let mut merged = JobDataMap::new();
        merged.put_all(self.scheduler_context);
        merged.put_all(self.job_detail);
        merged.put_all(self.trigger);

        let encoded = self.fire_times.encode()?;
        if merged.put(FIRE_TIMES_ENTRY, encoded).is_some() {
            trace!(entry = FIRE_TIMES_ENTRY, "Reserved entry overridden by fire times");
        }

        Ok(merged)
    }
}
