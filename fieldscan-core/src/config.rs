//! Configuration for workbook analysis

use crate::classifier::ClassifierSettings;
use crate::error::{FieldScanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name picked up from the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "fieldscan.toml";

/// Main analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub global: ClassifierSettings,
    #[serde(default)]
    pub sheets: HashMap<String, SheetConfig>,
}

/// Sheet-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Leave this worksheet out of the analysis
    pub exclude: bool,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn is_sheet_excluded(&self, sheet_name: &str) -> bool {
        self.sheets.get(sheet_name).is_some_and(|s| s.exclude)
    }

    /// Reject thresholds the classifier cannot work with
    pub fn validate(&self) -> Result<()> {
        let ratio = self.global.common_value_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(FieldScanError::InvalidConfig(format!(
                "common_value_ratio must be in (0, 1], got {}",
                ratio
            )));
        }

        if self.global.header_repeat_limit == 0 {
            return Err(FieldScanError::InvalidConfig(
                "header_repeat_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Configured sheet names that are not in `sheet_names`, sorted
    pub fn unknown_sheets<'a>(&'a self, sheet_names: &[&str]) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = self
            .sheets
            .keys()
            .map(String::as_str)
            .filter(|name| !sheet_names.contains(name))
            .collect();
        unknown.sort_unstable();
        unknown
    }
}
