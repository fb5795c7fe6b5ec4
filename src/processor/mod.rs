//! Main compilation pipeline.
//!
//! Runs the sections in dependency order: stations first (their orders feed
//! the station index), then analog and status points, then units, and
//! finally the merge. A failure in one section is reported and the
//! remaining sections still run.

pub mod writer;

#[cfg(test)]
pub mod tests;

use self::writer::SectionWriter;

use crate::config::CompilerConfig;
use crate::error::{Result, ScadaError};
use crate::format::{DatRecord, SectionLayout};
use crate::merge::merge_sections;
use crate::models::{
    AnalogPoint, RunSummary, SectionKind, SectionOutcome, Station, StatusPoint, Unit,
};
use crate::normalizer::{
    normalize_analog_points, normalize_stations, normalize_status_points, normalize_units,
};
use crate::registry::{PrefixSuffixIndex, StationIndex};
use crate::table::RawTable;

use std::time::Instant;
use tracing::{error, info, warn};

/// Compiles the input tables into section files and the merged database
#[derive(Debug)]
pub struct Pipeline {
    config: CompilerConfig,
    writer: SectionWriter,
}

impl Pipeline {
    pub fn new(config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        let writer = SectionWriter::new(config.section_dir.clone());
        Ok(Self { config, writer })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Run every section, then merge.
    ///
    /// Fails with [`ScadaError::NoContentProduced`] when no section could be
    /// written; in that case no merged file is produced.
    pub fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        info!(
            "Compiling point database from {}",
            self.config.input_dir.display()
        );

        // Stations must come first: their orders are the resolution targets
        let stations = self.section(&mut summary, self.load_stations()).unwrap_or_default();
        let station_index = StationIndex::from_stations(&stations);
        if station_index.is_empty() {
            warn!("Station index is empty; every point will resolve to station 0");
        }

        let analogs = self
            .section(&mut summary, self.load_analogs(&station_index))
            .unwrap_or_default();
        let statuses = self
            .section(&mut summary, self.load_statuses(&station_index))
            .unwrap_or_default();
        self.section(&mut summary, self.load_units());

        summary.unresolved_station_refs = analogs
            .iter()
            .map(|p| p.resolved_station)
            .chain(statuses.iter().map(|p| p.resolved_station))
            .filter(|station| *station == 0)
            .count();
        summary.unresolved_state_codes = statuses.iter().filter(|p| p.state_code == 0).count();

        if summary.unresolved_station_refs > 0 {
            warn!(
                "{} points reference no known station and were assigned station 0",
                summary.unresolved_station_refs
            );
        }

        if self.config.write_key_index && (!analogs.is_empty() || !statuses.is_empty()) {
            summary.key_index_path = Some(self.writer.write_key_index(&analogs, &statuses)?);
        } else if let Err(e) = self.writer.remove_key_index() {
            warn!("Could not remove stale key index: {}", e);
        }

        if summary.sections_written() == 0 {
            return Err(ScadaError::NoContentProduced {
                directory: self.config.section_dir.clone(),
            });
        }

        summary.merged_path = Some(merge_sections(
            &self.config.section_dir,
            &self.config.output_dir,
            self.config.generation_date(),
            self.config.missing_section_policy,
        )?);

        summary.processing_time_ms = start_time.elapsed().as_millis();
        Ok(summary)
    }

    /// Write a successfully normalized section or record its failure.
    ///
    /// Section-local errors are logged and swallowed; anything else (such
    /// as a failed write) is logged and recorded the same way, since the
    /// other sections do not depend on it.
    fn section<R: DatRecord>(
        &self,
        summary: &mut RunSummary,
        records: Result<Vec<R>>,
    ) -> Option<Vec<R>> {
        let kind = R::KIND;
        let written = records.and_then(|records| {
            let path = self.writer.write_section(&records)?;
            Ok((path, records))
        });

        match written {
            Ok((path, records)) => {
                info!(
                    "{} section: {} records written to {}",
                    kind,
                    records.len(),
                    path.display()
                );
                summary.sections.push((
                    kind,
                    SectionOutcome::Written {
                        path,
                        records: records.len(),
                    },
                ));
                Some(records)
            }
            Err(e) => {
                if e.is_section_local() {
                    error!("{} section skipped: {}", kind, e);
                } else {
                    error!("{} section failed: {}", kind, e);
                }
                if let Err(remove_error) = self.writer.remove_section(SectionLayout::for_kind(kind))
                {
                    warn!(
                        "Could not remove stale {} section file: {}",
                        kind, remove_error
                    );
                }
                summary.sections.push((
                    kind,
                    SectionOutcome::Failed {
                        reason: e.to_string(),
                    },
                ));
                None
            }
        }
    }

    fn load_stations(&self) -> Result<Vec<Station>> {
        let table = RawTable::load(&self.config.station_table_path(), SectionKind::Station)?;
        normalize_stations(&table)
    }

    fn load_analogs(&self, stations: &StationIndex) -> Result<Vec<AnalogPoint>> {
        let table = RawTable::load(&self.config.analog_table_path(), SectionKind::Analog)?;
        normalize_analog_points(&table, stations)
    }

    fn load_statuses(&self, stations: &StationIndex) -> Result<Vec<StatusPoint>> {
        let table = RawTable::load(&self.config.status_table_path(), SectionKind::Status)?;
        let codes_table = RawTable::load(
            &self.config.prefix_suffix_table_path(),
            SectionKind::Status,
        )?;
        let codes = PrefixSuffixIndex::from_table(&codes_table)?;
        normalize_status_points(&table, stations, &codes)
    }

    fn load_units(&self) -> Result<Vec<Unit>> {
        let table = RawTable::load(&self.config.unit_table_path(), SectionKind::Unit)?;
        normalize_units(&table)
    }
}
