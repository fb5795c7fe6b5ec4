//! Core data structures for SCADA point database compilation.
//!
//! Defines the entity shapes produced by normalization (stations, analog
//! points, status points, units), the reference-table records, and the
//! statistics reported at the end of a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::{ANALOG_HIGH_SENTINEL, ANALOG_LOW_SENTINEL};
use crate::keys::CompositeKey;

/// The four entity kinds that each produce one output section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Station,
    Analog,
    Status,
    Unit,
}

impl SectionKind {
    /// Order in which sections are concatenated into the merged file
    pub const MERGE_ORDER: [SectionKind; 4] = [
        SectionKind::Station,
        SectionKind::Status,
        SectionKind::Analog,
        SectionKind::Unit,
    ];

    /// Type tag used in the section descriptor line
    pub fn tag(&self) -> &'static str {
        match self {
            SectionKind::Station => "STATION",
            SectionKind::Analog => "ANALOG",
            SectionKind::Status => "STATUS",
            SectionKind::Unit => "UNIT",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A numeric cell taken leniently from a source table.
///
/// Holds the trimmed source text when it parses as a number and is blank
/// otherwise. Blank renders as an empty field; no zero is substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericField(Option<String>);

impl NumericField {
    pub fn blank() -> Self {
        Self(None)
    }

    /// Keep `raw` only if it reads as an integer or decimal number
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
            Self(Some(trimmed.to_string()))
        } else {
            Self(None)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station record; `order` is the join target for every point reference
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Value of the table's unique identifier column
    pub source_key: String,
    /// Join key other tables use to reference this station
    pub raw_key: String,
    pub display_name: String,
    pub aor_group: NumericField,
    pub priority: NumericField,
    /// 1-based position in the station table
    pub order: u32,
}

/// Named state-code set from the prefix/suffix registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSuffixCode {
    pub name: String,
    pub code: i64,
}

/// Analog point variant, decided by whether the point has an RTU source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogType {
    Telemetered,
    Calculated,
}

impl AnalogType {
    pub fn type_code(&self) -> u8 {
        match self {
            AnalogType::Telemetered => 1,
            AnalogType::Calculated => 2,
        }
    }

    /// Single-letter form written to the analog section
    pub fn letter(&self) -> &'static str {
        match self {
            AnalogType::Telemetered => "T",
            AnalogType::Calculated => "C",
        }
    }
}

/// Four alarm thresholds plus the unreasonable-limit pair
#[derive(Debug, Clone, PartialEq)]
pub struct LimitSet {
    pub thresholds: [NumericField; 4],
    pub sentinel: i64,
    pub deadband: NumericField,
}

impl LimitSet {
    pub fn high(thresholds: [NumericField; 4], deadband: NumericField) -> Self {
        Self {
            thresholds,
            sentinel: ANALOG_HIGH_SENTINEL,
            deadband,
        }
    }

    pub fn low(thresholds: [NumericField; 4], deadband: NumericField) -> Self {
        Self {
            thresholds,
            sentinel: ANALOG_LOW_SENTINEL,
            deadband,
        }
    }

    /// Comma-joined thresholds, blanks kept as empty items
    pub fn thresholds_field(&self) -> String {
        self.thresholds
            .iter()
            .map(NumericField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Sentinel followed by the deadband
    pub fn unreasonable_field(&self) -> String {
        format!("{},{}", self.sentinel, self.deadband)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalogPoint {
    pub analog_type: AnalogType,
    pub name: String,
    pub engineering_unit: String,
    pub scale_factor: NumericField,
    pub configured_group: NumericField,
    pub station_ref: String,
    /// `Station.order`, or 0 when the reference did not resolve
    pub resolved_station: u32,
    pub high_limits: LimitSet,
    pub low_limits: LimitSet,
    pub composite_key: CompositeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusPoint {
    pub name: String,
    pub station_ref: String,
    pub resolved_station: u32,
    /// Prefix/suffix code plus 200, or 0 when absent or unresolved
    pub state_code: i64,
    pub configured_group: NumericField,
    pub normal_state: NumericField,
    pub composite_key: CompositeKey,
}

impl StatusPoint {
    pub const TYPE_CODE: u8 = 1;
    pub const ALARM_GROUP: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub record_number: u32,
    pub name: String,
}

/// Outcome of one section within a run
#[derive(Debug, Clone)]
pub enum SectionOutcome {
    Written { path: PathBuf, records: usize },
    Failed { reason: String },
}

/// Run statistics reported once the pipeline finishes
#[derive(Debug, Default)]
pub struct RunSummary {
    pub sections: Vec<(SectionKind, SectionOutcome)>,
    pub unresolved_station_refs: usize,
    pub unresolved_state_codes: usize,
    pub key_index_path: Option<PathBuf>,
    pub merged_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}

impl RunSummary {
    pub fn sections_written(&self) -> usize {
        self.sections
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SectionOutcome::Written { .. }))
            .count()
    }

    pub fn sections_failed(&self) -> usize {
        self.sections.len() - self.sections_written()
    }

    pub fn records_written(&self) -> usize {
        self.sections
            .iter()
            .map(|(_, outcome)| match outcome {
                SectionOutcome::Written { records, .. } => *records,
                SectionOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}
