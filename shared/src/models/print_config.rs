//! Atomic print configuration
//!
//! Per-station formatting of every logical ticket element. The document
//! skeleton itself is fixed; this only controls whether an element is
//! printed and how it looks. Missing fields deserialize to the defaults
//! below so partially-stored configurations stay usable.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, validate_affix, validate_required_text};

/// Horizontal alignment of a ticket line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Character size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    #[default]
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// Formatting of one logical element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    pub enabled: bool,
    pub alignment: Alignment,
    pub size: TextSize,
    pub emphasis: bool,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            alignment: Alignment::Left,
            size: TextSize::Normal,
            emphasis: false,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl ElementStyle {
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn sized(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasis = true;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Wrap `text` in the configured prefix and suffix
    pub fn decorate(&self, text: &str) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }

    fn validate(&self, element: &str) -> ValidationResult<()> {
        validate_affix(&self.prefix, &format!("{element}.prefix"))?;
        validate_affix(&self.suffix, &format!("{element}.suffix"))
    }
}

fn default_station_header() -> ElementStyle {
    ElementStyle::default()
        .aligned(Alignment::Center)
        .sized(TextSize::Double)
        .emphasized()
}

fn default_order_number() -> ElementStyle {
    ElementStyle::default()
        .sized(TextSize::DoubleHeight)
        .emphasized()
        .with_prefix("#")
}

fn default_item_name() -> ElementStyle {
    ElementStyle::default().sized(TextSize::DoubleHeight).emphasized()
}

fn default_footer() -> ElementStyle {
    ElementStyle::default().aligned(Alignment::Center)
}

fn default_divider_char() -> char {
    '-'
}

fn default_reference_header() -> String {
    "ALSO ON THIS ORDER".to_string()
}

/// Fixed-schema per-station print configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicPrintConfig {
    #[serde(default = "default_station_header")]
    pub station_header: ElementStyle,
    #[serde(default = "default_order_number")]
    pub order_number: ElementStyle,
    /// Order type, table/tab, server and timestamp lines
    #[serde(default)]
    pub order_info: ElementStyle,
    #[serde(default = "default_item_name")]
    pub item_name: ElementStyle,
    #[serde(default)]
    pub modifier: ElementStyle,
    #[serde(default)]
    pub reference_item: ElementStyle,
    #[serde(default = "default_footer")]
    pub footer: ElementStyle,
    #[serde(default = "default_divider_char")]
    pub divider_char: char,
    #[serde(default = "default_reference_header")]
    pub reference_header: String,
}

impl Default for AtomicPrintConfig {
    fn default() -> Self {
        Self {
            station_header: default_station_header(),
            order_number: default_order_number(),
            order_info: ElementStyle::default(),
            item_name: default_item_name(),
            modifier: ElementStyle::default(),
            reference_item: ElementStyle::default(),
            footer: default_footer(),
            divider_char: default_divider_char(),
            reference_header: default_reference_header(),
        }
    }
}

impl AtomicPrintConfig {
    /// Checked when the station is saved, never at print time
    pub fn validate(&self) -> ValidationResult<()> {
        self.station_header.validate("station_header")?;
        self.order_number.validate("order_number")?;
        self.order_info.validate("order_info")?;
        self.item_name.validate("item_name")?;
        self.modifier.validate("modifier")?;
        self.reference_item.validate("reference_item")?;
        self.footer.validate("footer")?;

        if !self.divider_char.is_ascii_graphic() {
            return Err(crate::ValidationError::InvalidValue {
                field: "divider_char".to_string(),
                reason: "must be a printable ASCII character".to_string(),
            });
        }
        validate_required_text(
            &self.reference_header,
            "reference_header",
            crate::validation::MAX_TICKET_LINE_LEN,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: AtomicPrintConfig =
            serde_json::from_str(r#"{"item_name":{"size":"double","prefix":"> "}}"#).unwrap();

        assert_eq!(cfg.item_name.size, TextSize::Double);
        assert_eq!(cfg.item_name.prefix, "> ");
        // Fields missing inside a present element use ElementStyle::default
        assert!(!cfg.item_name.emphasis);
        assert_eq!(cfg.station_header, default_station_header());
        assert_eq!(cfg.divider_char, '-');
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_prefix() {
        let mut cfg = AtomicPrintConfig::default();
        cfg.modifier.prefix = "x".repeat(40);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("modifier.prefix"));
    }

    #[test]
    fn test_validate_rejects_control_divider() {
        let cfg = AtomicPrintConfig {
            divider_char: '\x1b',
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
