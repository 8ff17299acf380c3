//! Delivery outcome logging
//!
//! Every delivery attempt becomes one `PrintJob`. Persisting it is best
//! effort: a failed write is logged and counted, and the ticket that was
//! already delivered stays delivered.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use shared::models::{PrintJob, PrintJobStatus};
use tracing::{debug, warn};

use super::storage::{PrintJobStore, PrintJobStoreError};

/// Counters for outcome writes that did not make it to storage
#[derive(Debug, Default)]
pub struct OutcomeDiagnostics {
    recorded: AtomicU64,
    missing_hardware: AtomicU64,
    storage_failures: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl OutcomeDiagnostics {
    pub fn recorded(&self) -> u64 {
        self.recorded.load(Ordering::Relaxed)
    }

    pub fn missing_hardware(&self) -> u64 {
        self.missing_hardware.load(Ordering::Relaxed)
    }

    pub fn storage_failures(&self) -> u64 {
        self.storage_failures.load(Ordering::Relaxed)
    }

    /// Every write that did not persist, whatever the reason
    pub fn failed(&self) -> u64 {
        self.missing_hardware() + self.storage_failures()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn note_failure(&self, err: &PrintJobStoreError) {
        match err {
            PrintJobStoreError::HardwareNotFound(_) => {
                self.missing_hardware.fetch_add(1, Ordering::Relaxed);
            }
            _ => {
                self.storage_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        *self.last_error.lock() = Some(err.to_string());
    }
}

/// Writes `PrintJob` records, never failing the caller
#[derive(Debug, Clone)]
pub struct OutcomeLogger {
    store: Option<PrintJobStore>,
    diagnostics: Arc<OutcomeDiagnostics>,
}

impl OutcomeLogger {
    pub fn new(store: PrintJobStore) -> Self {
        Self {
            store: Some(store),
            diagnostics: Arc::new(OutcomeDiagnostics::default()),
        }
    }

    /// Logger that only traces outcomes
    pub fn disabled() -> Self {
        Self {
            store: None,
            diagnostics: Arc::new(OutcomeDiagnostics::default()),
        }
    }

    pub fn store(&self) -> Option<&PrintJobStore> {
        self.store.as_ref()
    }

    pub fn diagnostics(&self) -> &Arc<OutcomeDiagnostics> {
        &self.diagnostics
    }

    pub fn log(&self, job: &PrintJob) {
        match job.status {
            PrintJobStatus::Failed => warn!(
                job_id = %job.id,
                order_id = %job.order_id,
                station_id = %job.station_id,
                attempt = ?job.attempt,
                error = job.error.as_deref().unwrap_or_default(),
                "Delivery attempt failed"
            ),
            _ => debug!(
                job_id = %job.id,
                order_id = %job.order_id,
                station_id = %job.station_id,
                attempt = ?job.attempt,
                bytes = job.byte_count,
                "Delivery attempt succeeded"
            ),
        }

        let Some(store) = &self.store else {
            return;
        };

        match store.record(job) {
            Ok(()) => {
                self.diagnostics.recorded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                warn!(
                    job_id = %job.id,
                    station_id = %job.station_id,
                    error = %e,
                    "Failed to persist print job"
                );
                self.diagnostics.note_failure(&e);
            }
        }
    }
}
