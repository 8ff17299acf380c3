//! redb-based storage for print jobs and station hardware records

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use serde::{Deserialize, Serialize};
use shared::models::{PrintJob, Station, StationType};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Print jobs table: key = job_id, value = JSON
const PRINT_JOBS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("print_jobs");

/// Index: (order_id, job_id) -> ()
const PRINT_JOBS_BY_ORDER_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("print_jobs_by_order");

/// Hardware records: key = station_id, value = JSON
const HARDWARE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("hardware");

#[derive(Debug, Error)]
pub enum PrintJobStoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No hardware record for station: {0}")]
    HardwareNotFound(String),
}

pub type PrintJobStoreResult<T> = Result<T, PrintJobStoreError>;

/// Physical device a station maps to; print jobs reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareRecord {
    pub station_id: String,
    pub location_id: String,
    pub name: String,
    pub station_type: StationType,
    /// Unix millis
    pub registered_at: i64,
}

impl HardwareRecord {
    pub fn for_station(station: &Station, registered_at: i64) -> Self {
        Self {
            station_id: station.id.clone(),
            location_id: station.location_id.clone(),
            name: station.name.clone(),
            station_type: station.station_type,
            registered_at,
        }
    }
}

/// Print job persistence
#[derive(Clone)]
pub struct PrintJobStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for PrintJobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintJobStore").finish_non_exhaustive()
    }
}

impl PrintJobStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> PrintJobStoreResult<Self> {
        Self::init(Database::create(path)?)
    }

    /// Open in-memory database (tests and ephemeral setups)
    pub fn open_in_memory() -> PrintJobStoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> PrintJobStoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRINT_JOBS_TABLE)?;
            let _ = write_txn.open_table(PRINT_JOBS_BY_ORDER_TABLE)?;
            let _ = write_txn.open_table(HARDWARE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Hardware ==========

    pub fn register_hardware(&self, record: &HardwareRecord) -> PrintJobStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(HARDWARE_TABLE)?;
            let value = serde_json::to_vec(record)?;
            table.insert(record.station_id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_hardware(&self, station_id: &str) -> PrintJobStoreResult<Option<HardwareRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HARDWARE_TABLE)?;

        match table.get(station_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn remove_hardware(&self, station_id: &str) -> PrintJobStoreResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(HARDWARE_TABLE)?;
            table.remove(station_id)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    // ========== Print Jobs ==========

    /// Persist one delivery attempt
    ///
    /// Fails with `HardwareNotFound` when the job's station has no hardware
    /// record; nothing is written in that case.
    pub fn record(&self, job: &PrintJob) -> PrintJobStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let hardware = txn.open_table(HARDWARE_TABLE)?;
            if hardware.get(job.station_id.as_str())?.is_none() {
                return Err(PrintJobStoreError::HardwareNotFound(job.station_id.clone()));
            }

            let mut table = txn.open_table(PRINT_JOBS_TABLE)?;
            let value = serde_json::to_vec(job)?;
            table.insert(job.id.as_str(), value.as_slice())?;

            let mut idx_table = txn.open_table(PRINT_JOBS_BY_ORDER_TABLE)?;
            idx_table.insert((job.order_id.as_str(), job.id.as_str()), ())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a print job by ID
    pub fn get(&self, id: &str) -> PrintJobStoreResult<Option<PrintJob>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRINT_JOBS_TABLE)?;

        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All attempts for an order, oldest first
    pub fn jobs_for_order(&self, order_id: &str) -> PrintJobStoreResult<Vec<PrintJob>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(PRINT_JOBS_BY_ORDER_TABLE)?;
        let data_table = read_txn.open_table(PRINT_JOBS_TABLE)?;

        let mut jobs: Vec<PrintJob> = Vec::new();
        let range_start: (&str, &str) = (order_id, "");
        let range_end: (&str, &str) = (order_id, "\u{ffff}");

        for result in idx_table.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, job_id) = key.value();
            if let Some(guard) = data_table.get(job_id)? {
                jobs.push(serde_json::from_slice(guard.value())?);
            }
        }

        jobs.sort_by_key(|j| j.created_at);
        Ok(jobs)
    }

    /// Delete jobs created before `now_millis - max_age_millis`
    pub fn cleanup_older_than(&self, max_age_millis: i64, now_millis: i64) -> PrintJobStoreResult<usize> {
        let cutoff = now_millis - max_age_millis;

        let txn = self.db.begin_write()?;
        let mut deleted = 0;
        {
            let mut table = txn.open_table(PRINT_JOBS_TABLE)?;
            let mut idx_table = txn.open_table(PRINT_JOBS_BY_ORDER_TABLE)?;

            let mut to_delete = Vec::new();
            for result in table.iter()? {
                let (key, guard) = result?;
                let job: PrintJob = serde_json::from_slice(guard.value())?;
                if job.created_at < cutoff {
                    to_delete.push((key.value().to_string(), job.order_id));
                }
            }

            for (id, order_id) in &to_delete {
                table.remove(id.as_str())?;
                idx_table.remove((order_id.as_str(), id.as_str()))?;
                deleted += 1;
            }
        }
        txn.commit()?;

        Ok(deleted)
    }

    /// Get storage statistics
    pub fn stats(&self) -> PrintJobStoreResult<PrintJobStoreStats> {
        let read_txn = self.db.begin_read()?;
        let jobs = read_txn.open_table(PRINT_JOBS_TABLE)?;
        let hardware = read_txn.open_table(HARDWARE_TABLE)?;

        Ok(PrintJobStoreStats {
            job_count: jobs.len()?,
            hardware_count: hardware.len()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintJobStoreStats {
    pub job_count: u64,
    pub hardware_count: u64,
}
