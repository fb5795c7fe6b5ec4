//! SCADA Database Compiler Library
//!
//! Compiles a field-equipment point inventory, exported as CSV tables, into
//! the fixed-format master database file a SCADA loader consumes.
//!
//! This library provides tools for:
//! - Reading station, analog, status, prefix/suffix and unit tables
//! - Resolving point cross-references to station orders and state codes
//! - Synthesizing `TTSSSCCC` composite keys per type and station
//! - Rendering each entity type as a positional section file
//! - Merging the sections into `SCADA_<YYMMDD>.dat`

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod keys;
pub mod merge;
pub mod models;
pub mod normalizer;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod table;

pub use config::{CompilerConfig, MissingSectionPolicy};
pub use error::{Result, ScadaError};
pub use models::{RunSummary, SectionKind, SectionOutcome};
pub use processor::Pipeline;
