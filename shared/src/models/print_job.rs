//! Delivery audit types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintJobStatus {
    Pending,
    Sent,
    Failed,
}

/// Why this delivery attempt happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    /// First send to the routed station
    Primary,
    /// Operator asked to try the original station again
    OperatorRetry,
    /// Rebuilt for the backup station after the failover window
    Failover,
}

/// Persisted record of one delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: String,
    pub order_id: String,
    pub station_id: String,
    pub attempt: AttemptKind,
    /// Original station when `attempt` is `Failover`
    #[serde(default)]
    pub failover_from: Option<String>,
    pub status: PrintJobStatus,
    #[serde(default)]
    pub error: Option<String>,
    pub item_count: usize,
    #[serde(default)]
    pub byte_count: usize,
    /// Unix millis
    pub created_at: i64,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl PrintJob {
    pub fn pending(
        order_id: impl Into<String>,
        station_id: impl Into<String>,
        attempt: AttemptKind,
        item_count: usize,
        created_at: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            station_id: station_id.into(),
            attempt,
            failover_from: None,
            status: PrintJobStatus::Pending,
            error: None,
            item_count,
            byte_count: 0,
            created_at,
            completed_at: None,
        }
    }

    pub fn mark_sent(&mut self, byte_count: usize, completed_at: i64) {
        self.status = PrintJobStatus::Sent;
        self.byte_count = byte_count;
        self.error = None;
        self.completed_at = Some(completed_at);
    }

    pub fn mark_failed(&mut self, error: impl Into<String>, completed_at: i64) {
        self.status = PrintJobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(completed_at);
    }
}

/// Per-station outcome of a dispatch, reported back to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintResult {
    pub station_id: String,
    pub station_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub item_count: usize,
    /// Station that finally took the ticket when it differs from `station_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_via: Option<String>,
}

impl PrintResult {
    pub fn ok(station_id: &str, station_name: &str, item_count: usize) -> Self {
        Self {
            station_id: station_id.to_string(),
            station_name: station_name.to_string(),
            success: true,
            error: None,
            item_count,
            delivered_via: None,
        }
    }

    pub fn failed(
        station_id: &str,
        station_name: &str,
        item_count: usize,
        error: impl Into<String>,
    ) -> Self {
        Self {
            station_id: station_id.to_string(),
            station_name: station_name.to_string(),
            success: false,
            error: Some(error.into()),
            item_count,
            delivered_via: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_lifecycle() {
        let mut job = PrintJob::pending("o-1", "grill", AttemptKind::Primary, 3, 1_000);
        assert_eq!(job.status, PrintJobStatus::Pending);

        job.mark_failed("Timeout: 10.0.0.5:9100", 4_000);
        assert_eq!(job.status, PrintJobStatus::Failed);
        assert_eq!(job.completed_at, Some(4_000));

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains(r#""status":"failed""#));
        assert!(json.contains(r#""attempt":"primary""#));
    }

    #[test]
    fn test_print_result_omits_empty_fields() {
        let json = serde_json::to_string(&PrintResult::ok("bar", "Bar", 2)).unwrap();
        assert!(!json.contains("error"));
        assert!(!json.contains("delivered_via"));
    }
}
