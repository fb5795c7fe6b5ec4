//! Output writing for compiled sections
//!
//! Every artifact is written whole to a temporary file beside its target
//! and renamed into place, so a reader never sees a partial file.

use crate::constants::KEY_INDEX_FILE;
use crate::error::{Result, ScadaError};
use crate::format::{DatRecord, SectionLayout, render_section};
use crate::models::{AnalogPoint, StatusPoint};

use polars::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `content` to `path` through a temporary file in the same directory
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| ScadaError::Io(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Section file writer rooted at the section directory
#[derive(Debug, Clone)]
pub struct SectionWriter {
    section_dir: PathBuf,
}

impl SectionWriter {
    pub fn new(section_dir: PathBuf) -> Self {
        Self { section_dir }
    }

    pub fn section_path(&self, layout: &SectionLayout) -> PathBuf {
        self.section_dir.join(layout.file_name)
    }

    /// Render and write the section for `records`, returning its path
    pub fn write_section<R: DatRecord>(&self, records: &[R]) -> Result<PathBuf> {
        let path = self.section_path(SectionLayout::for_kind(R::KIND));
        write_atomic(&path, render_section(records).as_bytes())?;
        Ok(path)
    }

    /// Remove a stale section file left by an earlier run
    pub fn remove_section(&self, layout: &SectionLayout) -> Result<bool> {
        let path = self.section_path(layout);
        if path.is_file() {
            fs::remove_file(&path)?;
            debug!("Removed stale section file {}", path.display());
            return Ok(true);
        }
        Ok(false)
    }

    /// Remove a key index left by an earlier run
    pub fn remove_key_index(&self) -> Result<bool> {
        let path = self.section_dir.join(KEY_INDEX_FILE);
        if path.is_file() {
            fs::remove_file(&path)?;
            debug!("Removed stale key index {}", path.display());
            return Ok(true);
        }
        Ok(false)
    }

    /// Write the composite-key cross-reference for every keyed point
    pub fn write_key_index(
        &self,
        analogs: &[AnalogPoint],
        statuses: &[StatusPoint],
    ) -> Result<PathBuf> {
        let total = analogs.len() + statuses.len();
        let mut kinds = Vec::with_capacity(total);
        let mut names = Vec::with_capacity(total);
        let mut station_refs = Vec::with_capacity(total);
        let mut resolved = Vec::with_capacity(total);
        let mut keys = Vec::with_capacity(total);

        for point in statuses {
            kinds.push("status");
            names.push(point.name.as_str());
            station_refs.push(point.station_ref.as_str());
            resolved.push(point.resolved_station);
            keys.push(point.composite_key.as_str());
        }
        for point in analogs {
            kinds.push("analog");
            names.push(point.name.as_str());
            station_refs.push(point.station_ref.as_str());
            resolved.push(point.resolved_station);
            keys.push(point.composite_key.as_str());
        }

        let mut frame = df!(
            "kind" => kinds,
            "name" => names,
            "station_ref" => station_refs,
            "resolved_station" => resolved,
            "composite_key" => keys
        )?;

        let path = self.section_dir.join(KEY_INDEX_FILE);
        fs::create_dir_all(&self.section_dir)?;
        let mut temp = NamedTempFile::new_in(&self.section_dir)?;
        CsvWriter::new(temp.as_file_mut())
            .include_header(true)
            .finish(&mut frame)?;
        temp.persist(&path).map_err(|e| ScadaError::Io(e.error))?;

        debug!("Wrote {} composite keys to {}", total, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::UNIT_LAYOUT;
    use crate::keys::CompositeKey;
    use crate::models::{NumericField, Unit};
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_directories_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.dat");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_and_remove_section() {
        let temp_dir = TempDir::new().unwrap();
        let writer = SectionWriter::new(temp_dir.path().join("dat"));

        let path = writer
            .write_section(&[Unit {
                record_number: 1,
                name: "kV".to_string(),
            }])
            .unwrap();
        assert!(path.ends_with("unit_dat.dat"));
        assert!(fs::read_to_string(&path).unwrap().ends_with("\t1\t'kV'\n 0"));

        assert!(writer.remove_section(&UNIT_LAYOUT).unwrap());
        assert!(!path.exists());
        assert!(!writer.remove_section(&UNIT_LAYOUT).unwrap());
    }

    #[test]
    fn test_key_index_lists_status_then_analog() {
        let temp_dir = TempDir::new().unwrap();
        let writer = SectionWriter::new(temp_dir.path().to_path_buf());

        let status = StatusPoint {
            name: "CB1".to_string(),
            station_ref: "ALPHA".to_string(),
            resolved_station: 1,
            state_code: 0,
            configured_group: NumericField::blank(),
            normal_state: NumericField::blank(),
            composite_key: CompositeKey::new(1, 1, 1),
        };

        let path = writer.write_key_index(&[], &[status]).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "kind,name,station_ref,resolved_station,composite_key"
        );
        assert_eq!(lines[1], "status,CB1,ALPHA,1,01001001");
        assert_eq!(lines.len(), 2);

        assert!(writer.remove_key_index().unwrap());
        assert!(!temp_dir.path().join(KEY_INDEX_FILE).exists());
        assert!(!writer.remove_key_index().unwrap());
    }
}
