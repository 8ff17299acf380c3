//! Station Model
//!
//! A station is a routing destination: a ticket printer or a kitchen
//! display screen subscribing to a set of route tags.

use serde::{Deserialize, Serialize};

use super::print_config::AtomicPrintConfig;
use crate::validation::{
    MAX_FAILOVER_TIMEOUT_MS, MAX_NAME_LEN, MAX_PAPER_WIDTH, MAX_TICKET_LINE_LEN, MIN_PAPER_WIDTH,
    ValidationError, ValidationResult, validate_required_text,
};

/// Default raw printing port
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationType {
    Printer,
    Kds,
}

/// Print head technology, selects the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterType {
    #[default]
    Thermal,
    Impact,
}

/// Character set the printer expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    #[default]
    Ascii,
    Gbk,
}

fn default_paper_width() -> usize {
    48
}

fn default_true() -> bool {
    true
}

/// Hardware capability profile of a printer station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterCapability {
    #[serde(default)]
    pub printer_type: PrinterType,
    /// Characters per line (58mm = 32, 80mm = 48)
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,
    #[serde(default = "default_true")]
    pub supports_cut: bool,
    /// Two-colour ribbon (impact) or two-colour paper (thermal)
    #[serde(default)]
    pub second_color: bool,
    #[serde(default)]
    pub encoding: TextEncoding,
}

impl Default for PrinterCapability {
    fn default() -> Self {
        Self {
            printer_type: PrinterType::Thermal,
            paper_width: default_paper_width(),
            supports_cut: true,
            second_color: false,
            encoding: TextEncoding::Ascii,
        }
    }
}

/// Layout hints forwarded to kitchen display clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProfile {
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default = "default_true")]
    pub show_modifiers: bool,
    #[serde(default)]
    pub color_by_course: bool,
}

fn default_columns() -> u8 {
    4
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            show_modifiers: true,
            color_by_course: false,
        }
    }
}

/// Station entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub location_id: String,
    pub name: String,
    pub station_type: StationType,
    /// Route tags this station subscribes to (case-sensitive)
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_expo: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Soft-delete marker (Unix millis)
    #[serde(default)]
    pub deleted_at: Option<i64>,

    // -- PRINTER --
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub capability: PrinterCapability,

    // -- KDS --
    #[serde(default)]
    pub display: DisplayProfile,

    #[serde(default)]
    pub backup_station_id: Option<String>,
    #[serde(default)]
    pub failover_timeout_ms: Option<u64>,
    #[serde(default)]
    pub show_reference_items: bool,
    #[serde(default)]
    pub print_config: AtomicPrintConfig,
}

impl Station {
    pub fn printer(
        id: impl Into<String>,
        location_id: impl Into<String>,
        ip_address: impl Into<String>,
        port: u16,
    ) -> Self {
        let mut station = Self::base(id.into(), location_id.into(), StationType::Printer);
        station.ip_address = Some(ip_address.into());
        station.port = Some(port);
        station
    }

    pub fn kds(id: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self::base(id.into(), location_id.into(), StationType::Kds)
    }

    fn base(id: String, location_id: String, station_type: StationType) -> Self {
        Self {
            name: id.clone(),
            id,
            location_id,
            station_type,
            tags: Vec::new(),
            is_expo: false,
            is_default: false,
            is_active: true,
            deleted_at: None,
            ip_address: None,
            port: None,
            capability: PrinterCapability::default(),
            display: DisplayProfile::default(),
            backup_station_id: None,
            failover_timeout_ms: None,
            show_reference_items: false,
            print_config: AtomicPrintConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn expo(mut self) -> Self {
        self.is_expo = true;
        self
    }

    pub fn with_reference_items(mut self) -> Self {
        self.show_reference_items = true;
        self
    }

    pub fn with_capability(mut self, capability: PrinterCapability) -> Self {
        self.capability = capability;
        self
    }

    pub fn with_backup(mut self, backup_station_id: impl Into<String>, timeout_ms: u64) -> Self {
        self.backup_station_id = Some(backup_station_id.into());
        self.failover_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn is_printer(&self) -> bool {
        self.station_type == StationType::Printer
    }

    /// Active and not soft-deleted
    pub fn is_available(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }

    /// Tag match, ignoring surrounding whitespace in configured tags
    pub fn subscribes_to(&self, tag: &str) -> bool {
        let tag = tag.trim();
        !tag.is_empty() && self.tags.iter().any(|t| t.trim() == tag)
    }

    /// `(ip, port)` when both are configured
    pub fn network_address(&self) -> Option<(&str, u16)> {
        let ip = self.ip_address.as_deref().filter(|ip| !ip.trim().is_empty())?;
        Some((ip, self.port?))
    }

    /// Failover is configured only when both backup and window are set
    pub fn failover_target(&self) -> Option<(&str, u64)> {
        let backup = self.backup_station_id.as_deref()?;
        Some((backup, self.failover_timeout_ms?))
    }

    /// Station-save validation
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text(&self.id, "id", MAX_NAME_LEN)?;
        validate_required_text(&self.location_id, "location_id", MAX_NAME_LEN)?;
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;

        for tag in &self.tags {
            validate_required_text(tag, "tags[]", MAX_TICKET_LINE_LEN)?;
        }

        if self.is_printer() {
            if self.ip_address.as_deref().is_none_or(|ip| ip.trim().is_empty()) {
                return Err(ValidationError::Missing("ip_address".to_string()));
            }
            if self.port.is_none() {
                return Err(ValidationError::Missing("port".to_string()));
            }
            let width = self.capability.paper_width;
            if !(MIN_PAPER_WIDTH..=MAX_PAPER_WIDTH).contains(&width) {
                return Err(ValidationError::InvalidValue {
                    field: "capability.paper_width".to_string(),
                    reason: format!("{width} not in {MIN_PAPER_WIDTH}..={MAX_PAPER_WIDTH}"),
                });
            }
        }

        if self.backup_station_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "backup_station_id".to_string(),
                reason: "station cannot back itself up".to_string(),
            });
        }
        if let Some(ms) = self.failover_timeout_ms
            && ms > MAX_FAILOVER_TIMEOUT_MS
        {
            return Err(ValidationError::InvalidValue {
                field: "failover_timeout_ms".to_string(),
                reason: format!("{ms} exceeds {MAX_FAILOVER_TIMEOUT_MS}"),
            });
        }

        self.print_config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_requires_address() {
        let mut s = Station::printer("grill", "loc-1", "10.0.0.20", 9100);
        assert!(s.validate().is_ok());

        s.ip_address = None;
        assert_eq!(
            s.validate(),
            Err(ValidationError::Missing("ip_address".to_string()))
        );
    }

    #[test]
    fn test_kds_needs_no_address() {
        let s = Station::kds("line-screen", "loc-1").with_tags(["kitchen"]);
        assert!(s.validate().is_ok());
        assert!(s.network_address().is_none());
    }

    #[test]
    fn test_self_backup_rejected() {
        let s = Station::printer("bar", "loc-1", "10.0.0.21", 9100).with_backup("bar", 2000);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_failover_target_needs_both_fields() {
        let mut s = Station::printer("bar", "loc-1", "10.0.0.21", 9100);
        s.backup_station_id = Some("kitchen".to_string());
        assert!(s.failover_target().is_none());
        s.failover_timeout_ms = Some(1500);
        assert_eq!(s.failover_target(), Some(("kitchen", 1500)));
    }

    #[test]
    fn test_subscribes_to_ignores_padding() {
        let s = Station::kds("line", "loc-1").with_tags([" kitchen", "bar ", " "]);
        assert!(s.subscribes_to("kitchen"));
        assert!(s.subscribes_to("bar"));
        assert!(!s.subscribes_to(""));
        assert!(!s.subscribes_to("Kitchen"));
    }

    #[test]
    fn test_station_from_json_defaults() {
        let s: Station = serde_json::from_str(
            r#"{"id":"s1","location_id":"l1","name":"Bar","station_type":"PRINTER",
                "tags":["bar"],"ip_address":"10.0.0.9","port":9100,
                "capability":{"printer_type":"impact","supports_cut":false}}"#,
        )
        .unwrap();
        assert!(s.is_available());
        assert_eq!(s.capability.printer_type, PrinterType::Impact);
        assert_eq!(s.capability.paper_width, 48);
        assert!(!s.capability.supports_cut);
        assert_eq!(s.network_address(), Some(("10.0.0.9", 9100)));
    }
}
