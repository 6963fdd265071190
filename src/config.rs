//! Analysis configuration
//!
//! Loaded from an optional TOML file and overridden by CLI flags.
//!
//! # Example plusmaze.toml
//!
//! ```toml
//! data_path = "EPM.csv"
//! out_dir = "EPM_Results"
//! primary_params = ["Time_OpenArms", "Percent_OpenArms"]
//! locomotion_params = ["MeanSpeed_Overall_cm/s", "Entries_ClosedArms"]
//! group_order = ["Treatment", "Control"]
//! condition_order = ["Baseline", "Intervention"]
//! ```

use crate::column::{Condition, Group};
use crate::error::{AnalysisError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Primary EPM outcome parameters (pre-specified)
pub const DEFAULT_PRIMARY_PARAMS: [&str; 2] = ["Time_OpenArms", "Percent_OpenArms"];

/// Locomotion control parameters (pre-specified)
pub const DEFAULT_LOCOMOTION_PARAMS: [&str; 2] = ["MeanSpeed_Overall_cm/s", "Entries_ClosedArms"];

/// Default output directory
pub const DEFAULT_OUT_DIR: &str = "EPM_Results";

/// Configuration for one analysis run
///
/// Group and condition order only affect iteration and output order; test
/// statistics and p-values do not depend on them.
///
/// # Example
/// ```
/// use plusmaze::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.primary_params, vec!["Time_OpenArms", "Percent_OpenArms"]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Wide input table (CSV)
    pub data_path: Option<PathBuf>,

    /// Directory for the supplementary tables, created if absent
    pub out_dir: PathBuf,

    /// Parameters reported subject by subject (S3, S5)
    pub primary_params: Vec<String>,

    /// Parameters compared with the fixed paired t-test (S4)
    pub locomotion_params: Vec<String>,

    /// Order in which group families are run and written
    pub group_order: Vec<Group>,

    /// Column order of the two conditions in subject-level tables
    pub condition_order: Vec<Condition>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            primary_params: DEFAULT_PRIMARY_PARAMS.map(String::from).to_vec(),
            locomotion_params: DEFAULT_LOCOMOTION_PARAMS.map(String::from).to_vec(),
            group_order: vec![Group::Treatment, Group::Control],
            condition_order: vec![Condition::Baseline, Condition::Intervention],
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_order("group_order", &self.group_order, &[Group::Treatment, Group::Control])?;
        validate_order(
            "condition_order",
            &self.condition_order,
            &[Condition::Baseline, Condition::Intervention],
        )?;

        for (key, params) in [
            ("primary_params", &self.primary_params),
            ("locomotion_params", &self.locomotion_params),
        ] {
            if params.iter().any(|p| p.trim().is_empty()) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} contains an empty parameter name",
                    key
                )));
            }
        }

        Ok(())
    }
}

/// An order list must name every expected value exactly once
fn validate_order<T: PartialEq + std::fmt::Debug>(key: &str, order: &[T], expected: &[T]) -> Result<()> {
    let complete = order.len() == expected.len() && expected.iter().all(|e| order.contains(e));
    if complete {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{} must list each of {:?} exactly once, got {:?}",
            key, expected, order
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.out_dir, PathBuf::from("EPM_Results"));
        assert_eq!(
            config.locomotion_params,
            vec!["MeanSpeed_Overall_cm/s", "Entries_ClosedArms"]
        );
        assert_eq!(config.group_order, vec![Group::Treatment, Group::Control]);
        assert!(config.data_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = AnalysisConfig::from_toml_str(
            r#"
data_path = "EPM.csv"
out_dir = "results"
primary_params = ["Time_OpenArms"]
locomotion_params = []
group_order = ["Control", "Treatment"]
condition_order = ["Intervention", "Baseline"]
"#,
        )
        .unwrap();

        assert_eq!(config.data_path, Some(PathBuf::from("EPM.csv")));
        assert_eq!(config.out_dir, PathBuf::from("results"));
        assert_eq!(config.primary_params, vec!["Time_OpenArms"]);
        assert!(config.locomotion_params.is_empty());
        assert_eq!(config.group_order, vec![Group::Control, Group::Treatment]);
        assert_eq!(
            config.condition_order,
            vec![Condition::Intervention, Condition::Baseline]
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml_str("out_dir = \"x\"\n").unwrap();
        assert_eq!(config.out_dir, PathBuf::from("x"));
        assert_eq!(config.primary_params, AnalysisConfig::default().primary_params);
    }

    #[test]
    fn test_group_aliases() {
        let config = AnalysisConfig::from_toml_str("group_order = [\"CO\", \"PD\"]\n").unwrap();
        assert_eq!(config.group_order, vec![Group::Control, Group::Treatment]);
    }

    #[test]
    fn test_incomplete_group_order_rejected() {
        let result = AnalysisConfig::from_toml_str("group_order = [\"Treatment\"]\n");
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_condition_order_rejected() {
        let result = AnalysisConfig::from_toml_str("condition_order = [\"Baseline\", \"Baseline\"]\n");
        assert!(result.is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_empty_parameter_name_rejected() {
        let mut config = AnalysisConfig::default();
        config.primary_params.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AnalysisConfig::from_toml_str("alpha = 0.1\n").is_err());
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary_params = [\"Time_Center\"]").unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.primary_params, vec!["Time_Center"]);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(AnalysisConfig::from_file("/nonexistent/plusmaze.toml").is_err());
    }
}
