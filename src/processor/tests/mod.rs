//! Pipeline tests
//!
//! Exercise the complete compile run against small input tables written
//! to a temporary directory.

pub mod error_handling;

use crate::config::CompilerConfig;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const STATIONS_CSV: &str = "PKEY,NAME,DESC,ZONEID\n\
501,ALPHA,Alpha Site,3\n\
502,BETA,Beta Site,4\n";

pub const ANALOGS_CSV: &str = "RTUID,NAME,ENGUNITS,SCALEFACT,USERTYPEID,STATIONPID,PREMGHI,EMGHI,PREMDB,EMGDB,PREMGLO,EMGLO,PREMGDB,UNRSDB\n\
7,FDR1 AMPS,AMP,1,2,ALPHA,90,100,1,2,10,5,1,4\n\
7,FDR2 AMPS,AMP,1,2,ALPHA,,,,,,,,\n\
,BUS KV,KV,0.5,,BETA,,,,,,,,\n\
7,SPARE,,,,GAMMA,,,,,,,,\n";

pub const STATUSES_CSV: &str = "NAME,STATIONPID,PREFSUFFID,USERTYPEID,NORMSTATE\n\
CB 52-1,ALPHA,BREAKER,5,0\n\
DISC 89-1,beta,,5,1\n\
CB 52-9,GAMMA,UNKNOWN,,\n";

pub const PREFIX_SUFFIXES_CSV: &str = "Name,PKey\n\
BREAKER,12\n\
SWITCH,13\n";

pub const UNITS_CSV: &str = "Desc\nkV\nMW\n";

/// Input tables plus the directories a run writes to
pub struct Fixture {
    pub _temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub section_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Fixture {
    /// Write every input table with its default name
    pub fn complete() -> Self {
        let fixture = Self::empty();
        fixture.write_input("StationPoints.CSV", STATIONS_CSV);
        fixture.write_input("AnalogPoints.csv", ANALOGS_CSV);
        fixture.write_input("StatusPoints.csv", STATUSES_CSV);
        fixture.write_input("PrefixSuffixes.csv", PREFIX_SUFFIXES_CSV);
        fixture.write_input("MeasurementUnits.CSV", UNITS_CSV);
        fixture
    }

    /// An input directory with no tables in it
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("Inputs");
        let section_dir = temp_dir.path().join("Dat_files");
        let output_dir = temp_dir.path().join("Populateables");
        fs::create_dir_all(&input_dir).unwrap();

        Self {
            _temp_dir: temp_dir,
            input_dir,
            section_dir,
            output_dir,
        }
    }

    pub fn write_input(&self, name: &str, content: &str) {
        fs::write(self.input_dir.join(name), content).unwrap();
    }

    pub fn remove_input(&self, name: &str) {
        fs::remove_file(self.input_dir.join(name)).unwrap();
    }

    pub fn config(&self) -> CompilerConfig {
        CompilerConfig::default()
            .with_input_dir(&self.input_dir)
            .with_section_dir(&self.section_dir)
            .with_output_dir(&self.output_dir)
            .with_generation_date(date())
    }

    pub fn section(&self, file_name: &str) -> String {
        read(&self.section_dir.join(file_name))
    }

    pub fn merged_path(&self) -> PathBuf {
        self.output_dir.join("SCADA_240309.dat")
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
