//! Application constants for the SCADA database compiler
//!
//! Input file names, source column names, sentinels and the merged-file
//! framing. The per-section wire layouts live in [`crate::format`].

// =============================================================================
// Input Tables
// =============================================================================

pub const STATION_TABLE_FILE: &str = "StationPoints.CSV";
pub const ANALOG_TABLE_FILE: &str = "AnalogPoints.csv";
pub const STATUS_TABLE_FILE: &str = "StatusPoints.csv";
pub const PREFIX_SUFFIX_TABLE_FILE: &str = "PrefixSuffixes.csv";
pub const UNIT_TABLE_FILE: &str = "MeasurementUnits.CSV";

/// Default directory names, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "Inputs";
pub const DEFAULT_SECTION_DIR: &str = "Dat_files";
pub const DEFAULT_OUTPUT_DIR: &str = "Populateables";

// =============================================================================
// Source Columns
// =============================================================================

pub mod station_columns {
    /// Unique station identifier; the only hard-required column
    pub const PKEY: &str = "PKEY";
    pub const NAME: &str = "NAME";
    pub const DESC: &str = "DESC";
    pub const ZONE_ID: &str = "ZONEID";
    pub const ALARM_PRIORITY: &str = "ALRMPRIOR";
}

pub mod analog_columns {
    pub const RTU_ID: &str = "RTUID";
    pub const NAME: &str = "NAME";
    pub const ENG_UNITS: &str = "ENGUNITS";
    pub const SCALE_FACTOR: &str = "SCALEFACT";
    pub const USER_TYPE_ID: &str = "USERTYPEID";
    pub const STATION_ID: &str = "STATIONPID";

    pub const PRE_EMERGENCY_HI: &str = "PREMGHI";
    pub const EMERGENCY_HI: &str = "EMGHI";
    pub const PRE_EMERGENCY_DEADBAND: &str = "PREMDB";
    pub const EMERGENCY_DEADBAND: &str = "EMGDB";
    pub const PRE_EMERGENCY_LO: &str = "PREMGLO";
    pub const EMERGENCY_LO: &str = "EMGLO";
    pub const PRE_EMERGENCY_LO_DEADBAND: &str = "PREMGDB";
    pub const UNREASONABLE_DEADBAND: &str = "UNRSDB";
}

pub mod status_columns {
    pub const NAME: &str = "NAME";
    pub const STATION_ID: &str = "STATIONPID";
    pub const PREFIX_SUFFIX_ID: &str = "PREFSUFFID";
    pub const USER_TYPE_ID: &str = "USERTYPEID";
    pub const NORMAL_STATE: &str = "NORMSTATE";
}

pub mod prefix_suffix_columns {
    pub const NAME: &str = "Name";
    pub const PKEY: &str = "PKey";
}

pub mod unit_columns {
    pub const DESC: &str = "Desc";
}

// =============================================================================
// Sentinels and Offsets
// =============================================================================

/// Resolved-station value for a reference that matched no station
pub const UNRESOLVED_STATION: u32 = 0;

/// State code for a blank or unmatched prefix/suffix reference
pub const UNRESOLVED_STATE_CODE: i64 = 0;

/// Offset added to every resolved prefix/suffix code
pub const STATE_CODE_OFFSET: i64 = 200;

pub const ANALOG_HIGH_SENTINEL: i64 = 999_999;
pub const ANALOG_LOW_SENTINEL: i64 = -999_999;

// =============================================================================
// Composite Keys
// =============================================================================

pub const KEY_TYPE_WIDTH: usize = 2;
pub const KEY_STATION_WIDTH: usize = 3;
pub const KEY_SEQUENCE_WIDTH: usize = 3;

/// Cross-reference of every point's composite key
pub const KEY_INDEX_FILE: &str = "point_keys.csv";

// =============================================================================
// Merged Database File
// =============================================================================

pub const MERGED_HEADER: &str = "10 SCADA.DB";
pub const MERGED_TRAILER: &str = "0";
pub const MERGED_FILE_PREFIX: &str = "SCADA_";
pub const MERGED_FILE_EXTENSION: &str = "dat";
pub const MERGED_DATE_FORMAT: &str = "%y%m%d";
