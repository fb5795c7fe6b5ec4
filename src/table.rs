//! Source table loading.
//!
//! Every input table is a header-row CSV read through polars with schema
//! inference disabled, so each column arrives as text. Bytes that are not
//! valid UTF-8 are replaced rather than failing the table. Column access is
//! lenient: a missing column or a null cell reads as the empty string.

use crate::error::{Result, ScadaError};
use crate::models::{NumericField, SectionKind};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One source table held as an all-text DataFrame
#[derive(Debug, Clone)]
pub struct RawTable {
    path: PathBuf,
    frame: DataFrame,
}

impl RawTable {
    /// Read the table at `path` for `section`.
    ///
    /// The file name is matched exactly first, then case-insensitively within
    /// its directory. An absent file is a [`ScadaError::MissingInput`].
    pub fn load(path: &Path, section: SectionKind) -> Result<Self> {
        let resolved = resolve_input_path(path).ok_or_else(|| ScadaError::MissingInput {
            section,
            path: path.to_path_buf(),
        })?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|options| options.with_encoding(CsvEncoding::LossyUtf8))
            .try_into_reader_with_file_path(Some(resolved.clone()))
            .and_then(|reader| reader.finish())
            .map_err(|e| ScadaError::TableRead {
                path: resolved.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Loaded {} rows x {} columns from {}",
            frame.height(),
            frame.width(),
            resolved.display()
        );

        Ok(Self {
            path: resolved,
            frame,
        })
    }

    /// Wrap an in-memory frame (used by tests and callers that build tables)
    pub fn from_frame(path: impl Into<PathBuf>, frame: DataFrame) -> Self {
        Self {
            path: path.into(),
            frame,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    /// Fail with [`ScadaError::MissingRequiredColumn`] when `name` is absent
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(ScadaError::MissingRequiredColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
        }
    }

    /// Lenient accessor for `name`; absent columns read as blank
    pub fn column(&self, name: &str) -> TextColumn<'_> {
        let chunked = self
            .frame
            .column(name)
            .ok()
            .and_then(|column| column.as_materialized_series().str().ok());
        TextColumn(chunked)
    }
}

/// Text view of one column that never fails on access
#[derive(Debug, Clone, Copy)]
pub struct TextColumn<'a>(Option<&'a StringChunked>);

impl<'a> TextColumn<'a> {
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Cell text, or "" for a missing column, null cell or out-of-range row
    pub fn text(&self, row: usize) -> &'a str {
        self.0
            .filter(|chunked| row < chunked.len())
            .and_then(|chunked| chunked.get(row))
            .unwrap_or("")
    }

    pub fn numeric(&self, row: usize) -> NumericField {
        NumericField::parse(self.text(row))
    }
}

/// Find `path`, falling back to a case-insensitive file name match
pub fn resolve_input_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let wanted = path.file_name()?.to_string_lossy().to_lowercase();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|candidate| {
            candidate.is_file()
                && candidate
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().to_lowercase() == wanted)
        })
}
