//! Processing configuration
//!
//! Sheet and column names default to the ledger layout the tool was built
//! for. A TOML file can override any subset of them.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Names and thresholds used by a processing run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Input sheet holding the detail ledger
    pub detail_sheet: String,
    /// Input sheet holding the processed ("done") ledger
    pub done_sheet: String,
    /// Identifier column on the detail sheet, synthesized on the done sheet
    pub order_column: String,
    /// Free-text column the done identifier is extracted from
    pub summary_column: String,
    /// Column recording which input sheet a row came from
    pub origin_column: String,
    pub detail_label: String,
    pub done_label: String,
    /// Minimum digit run length for an identifier found in free text
    pub min_id_digits: usize,
    pub output: OutputSheets,
}

/// Output sheet names, in workbook order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSheets {
    pub duplicates: String,
    pub detail_unique: String,
    pub done_unique: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            detail_sheet: "明细".to_string(),
            done_sheet: "已做单".to_string(),
            order_column: "订单编号".to_string(),
            summary_column: "记录摘要".to_string(),
            origin_column: "来源".to_string(),
            detail_label: "明细".to_string(),
            done_label: "已做单".to_string(),
            min_id_digits: 12,
            output: OutputSheets::default(),
        }
    }
}

impl Default for OutputSheets {
    fn default() -> Self {
        Self {
            duplicates: "重复订单".to_string(),
            detail_unique: "明细非重复".to_string(),
            done_unique: "已做单非重复".to_string(),
        }
    }
}

/// Default config location (~/.config/order-dedup/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("order-dedup")
        .join("config.toml")
}

impl ProcessingConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one the default location is
    /// tried and missing files fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                Self::from_file(path)?
            }
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    log::debug!("Using config file: {}", default_path.display());
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_id_digits == 0 {
            bail!("min_id_digits must be at least 1");
        }
        if self.detail_sheet == self.done_sheet {
            bail!("detail_sheet and done_sheet must differ");
        }
        if self.detail_label == self.done_label {
            bail!("detail_label and done_label must differ");
        }

        let out = &self.output;
        if out.duplicates == out.detail_unique
            || out.duplicates == out.done_unique
            || out.detail_unique == out.done_unique
        {
            bail!("Output sheet names must be distinct");
        }

        Ok(())
    }
}
