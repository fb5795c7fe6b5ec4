//! Error handling for SCADA database compilation.
//!
//! Failures are local to the section that raised them: a missing table or a
//! missing required column aborts that section only. Unresolved cross
//! references are not errors at all and never surface here.

use crate::models::SectionKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScadaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input table for {section} section not found at path: {path}")]
    MissingInput { section: SectionKind, path: PathBuf },

    #[error("Required column '{column}' is not present in table: {path}")]
    MissingRequiredColumn { path: PathBuf, column: String },

    #[error("Failed to read table {path} - {reason}")]
    TableRead { path: PathBuf, reason: String },

    #[error("Section file for {section} is missing from {path}")]
    SectionMissing { section: SectionKind, path: PathBuf },

    #[error("No section produced any content in {directory}; merged file not written")]
    NoContentProduced { directory: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ScadaError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors that only abort the section that raised them
    pub fn is_section_local(&self) -> bool {
        matches!(
            self,
            ScadaError::MissingInput { .. }
                | ScadaError::MissingRequiredColumn { .. }
                | ScadaError::TableRead { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScadaError>;
