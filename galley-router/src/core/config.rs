use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

/// Dispatch engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | GALLEY_PRINTER_TIMEOUT_MS | 3000 | Printer connect/write timeout |
/// | GALLEY_KDS_CHANNEL_CAPACITY | 1024 | KDS broadcast buffer |
/// | GALLEY_SERIALIZE_STATION_WRITES | false | One in-flight write per station |
/// | GALLEY_TIMEZONE | UTC | Timezone printed on tickets |
/// | GALLEY_PRINT_JOB_DB | (unset: in-memory) | redb file for print jobs |
/// | GALLEY_PRINT_JOB_RETENTION_DAYS | 30 | Age after which jobs are purged |
/// | GALLEY_LOG_LEVEL | info | tracing level |
/// | GALLEY_LOG_DIR | (unset: stdout) | Daily rolling log directory |
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub printer_timeout_ms: u64,
    pub kds_channel_capacity: usize,
    /// Queue writes per station instead of opening parallel connections
    pub serialize_station_writes: bool,
    pub timezone: Tz,
    pub print_job_db: Option<PathBuf>,
    pub print_job_retention_days: u32,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl DispatchConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            printer_timeout_ms: std::env::var("GALLEY_PRINTER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            kds_channel_capacity: std::env::var("GALLEY_KDS_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            serialize_station_writes: std::env::var("GALLEY_SERIALIZE_STATION_WRITES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            timezone: std::env::var("GALLEY_TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::UTC),
            print_job_db: std::env::var("GALLEY_PRINT_JOB_DB")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            print_job_retention_days: std::env::var("GALLEY_PRINT_JOB_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("GALLEY_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("GALLEY_LOG_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Environment config with the values tests usually pin
    pub fn with_overrides(printer_timeout_ms: u64, serialize_station_writes: bool) -> Self {
        let mut config = Self::from_env();
        config.printer_timeout_ms = printer_timeout_ms;
        config.serialize_station_writes = serialize_station_writes;
        config.print_job_db = None;
        config
    }

    pub fn printer_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_timeout_ms)
    }

    pub fn print_job_retention_millis(&self) -> i64 {
        i64::from(self.print_job_retention_days) * 24 * 60 * 60 * 1000
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Load `.env` (if present), then read the configuration
pub fn init_from_env() -> DispatchConfig {
    dotenv::dotenv().ok();
    DispatchConfig::from_env()
}
