// Daemon constants (no magic values)
use std::time::Duration;

/// Default tracing filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "jobwire=info";

/// Address of the in-process logging bus
pub const DEFAULT_BUS_ADDRESS: &str = "loopback://localhost/";

/// Group used for triggers and jobs declared without one
pub const DEFAULT_TRIGGER_GROUP: &str = jobwire_core::domain::DEFAULT_GROUP;

/// Time allowed for trigger tasks to finish after shutdown is signalled
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Lower bound for a trigger interval (1ms)
pub const MIN_TRIGGER_INTERVAL_MS: u64 = 1;

/// Service name reported to OpenTelemetry when OTEL_SERVICE_NAME is unset
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
pub const DEFAULT_SERVICE_NAME: &str = "jobwire-daemon";
