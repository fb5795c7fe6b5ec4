//! Configuration management and validation.
//!
//! Provides the compiler configuration: where the input tables live, where
//! section files and the merged database are written, the generation date,
//! and the policy applied when the merge finds a section missing.

use crate::constants::{
    ANALOG_TABLE_FILE, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_SECTION_DIR,
    PREFIX_SUFFIX_TABLE_FILE, STATION_TABLE_FILE, STATUS_TABLE_FILE, UNIT_TABLE_FILE,
};
use crate::error::{Result, ScadaError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// What the merge does when a section file is absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSectionPolicy {
    /// Leave the section out of the merged file
    #[default]
    Skip,
    /// Abort the merge
    Fail,
    /// Insert the section's header and footer with no records
    Empty,
}

impl FromStr for MissingSectionPolicy {
    type Err = ScadaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            "empty" => Ok(Self::Empty),
            other => Err(ScadaError::configuration(format!(
                "Unknown missing-section policy '{}': expected skip, fail or empty",
                other
            ))),
        }
    }
}

/// File names of the input tables inside the input directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub stations: String,
    pub analogs: String,
    pub statuses: String,
    pub prefix_suffixes: String,
    pub units: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            stations: STATION_TABLE_FILE.to_string(),
            analogs: ANALOG_TABLE_FILE.to_string(),
            statuses: STATUS_TABLE_FILE.to_string(),
            prefix_suffixes: PREFIX_SUFFIX_TABLE_FILE.to_string(),
            units: UNIT_TABLE_FILE.to_string(),
        }
    }
}

/// Global configuration for a compilation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Directory holding the source CSV tables
    pub input_dir: PathBuf,

    /// Directory receiving one `.dat` file per section
    pub section_dir: PathBuf,

    /// Directory receiving the merged `SCADA_<YYMMDD>.dat`
    pub output_dir: PathBuf,

    pub input_files: InputFiles,

    /// Date stamped into the merged file name (today when unset)
    pub generation_date: Option<NaiveDate>,

    pub missing_section_policy: MissingSectionPolicy,

    /// Write the composite-key cross-reference next to the sections
    pub write_key_index: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            section_dir: PathBuf::from(DEFAULT_SECTION_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            input_files: InputFiles::default(),
            generation_date: None,
            missing_section_policy: MissingSectionPolicy::default(),
            write_key_index: true,
        }
    }
}

impl CompilerConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ScadaError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default config file location under the user's config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scada-db-compiler").join("config.toml"))
    }

    /// Set the input table directory
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the section output directory
    pub fn with_section_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.section_dir = dir.into();
        self
    }

    /// Set the merged file directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Pin the generation date instead of using today
    pub fn with_generation_date(mut self, date: NaiveDate) -> Self {
        self.generation_date = Some(date);
        self
    }

    pub fn with_missing_section_policy(mut self, policy: MissingSectionPolicy) -> Self {
        self.missing_section_policy = policy;
        self
    }

    pub fn without_key_index(mut self) -> Self {
        self.write_key_index = false;
        self
    }

    /// Generation date, defaulting to the local date
    pub fn generation_date(&self) -> NaiveDate {
        self.generation_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn station_table_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_files.stations)
    }

    pub fn analog_table_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_files.analogs)
    }

    pub fn status_table_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_files.statuses)
    }

    pub fn prefix_suffix_table_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_files.prefix_suffixes)
    }

    pub fn unit_table_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_files.units)
    }

    /// Reject configurations that would write over the input tables
    pub fn validate(&self) -> Result<()> {
        if self.input_dir == self.section_dir {
            return Err(ScadaError::configuration(format!(
                "Section directory must differ from the input directory ({})",
                self.input_dir.display()
            )));
        }

        let files = &self.input_files;
        for (label, name) in [
            ("stations", &files.stations),
            ("analogs", &files.analogs),
            ("statuses", &files.statuses),
            ("prefix_suffixes", &files.prefix_suffixes),
            ("units", &files.units),
        ] {
            if name.trim().is_empty() {
                return Err(ScadaError::configuration(format!(
                    "Input file name for '{}' cannot be empty",
                    label
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("Inputs"));
        assert_eq!(config.section_dir, PathBuf::from("Dat_files"));
        assert_eq!(config.output_dir, PathBuf::from("Populateables"));
        assert_eq!(config.missing_section_policy, MissingSectionPolicy::Skip);
        assert!(config.write_key_index);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let config = CompilerConfig::default()
            .with_input_dir("/data/in")
            .with_section_dir("/data/dat")
            .with_generation_date(date)
            .with_missing_section_policy(MissingSectionPolicy::Fail)
            .without_key_index();

        assert_eq!(config.generation_date(), date);
        assert_eq!(
            config.station_table_path(),
            PathBuf::from("/data/in/StationPoints.CSV")
        );
        assert_eq!(config.missing_section_policy, MissingSectionPolicy::Fail);
        assert!(!config.write_key_index);
    }

    #[test]
    fn test_validate_rejects_shared_input_and_section_dir() {
        let config = CompilerConfig::default()
            .with_input_dir("same")
            .with_section_dir("same");
        assert!(matches!(
            config.validate(),
            Err(ScadaError::Configuration { .. })
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "EMPTY".parse::<MissingSectionPolicy>().unwrap(),
            MissingSectionPolicy::Empty
        );
        assert!("ignore".parse::<MissingSectionPolicy>().is_err());
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
input_dir = "exports"
missing_section_policy = "empty"
generation_date = "2024-11-02"

[input_files]
units = "Units.csv"
"#,
        )
        .unwrap();

        let config = CompilerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("exports"));
        assert_eq!(config.section_dir, PathBuf::from("Dat_files"));
        assert_eq!(config.missing_section_policy, MissingSectionPolicy::Empty);
        assert_eq!(
            config.generation_date,
            NaiveDate::from_ymd_opt(2024, 11, 2)
        );
        assert_eq!(config.input_files.units, "Units.csv");
        assert_eq!(config.input_files.stations, "StationPoints.CSV");
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "input_dir = [").unwrap();
        assert!(matches!(
            CompilerConfig::load_from_file(&path),
            Err(ScadaError::Configuration { .. })
        ));
    }
}
