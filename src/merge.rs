//! Merged database assembly.
//!
//! Concatenates the section files in loader order between the database
//! header and trailer and writes `SCADA_<YYMMDD>.dat`.

use crate::config::MissingSectionPolicy;
use crate::constants::{
    MERGED_DATE_FORMAT, MERGED_FILE_EXTENSION, MERGED_FILE_PREFIX, MERGED_HEADER, MERGED_TRAILER,
};
use crate::error::{Result, ScadaError};
use crate::format::{SectionLayout, empty_section};
use crate::models::SectionKind;
use crate::processor::writer::write_atomic;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the merged database for `date`
pub fn merged_file_name(date: NaiveDate) -> String {
    format!(
        "{}{}.{}",
        MERGED_FILE_PREFIX,
        date.format(MERGED_DATE_FORMAT),
        MERGED_FILE_EXTENSION
    )
}

/// Join section texts between the header and trailer lines
pub fn compose_merged<S: AsRef<str>>(sections: &[S]) -> String {
    let body = sections
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}\n{}", MERGED_HEADER, body, MERGED_TRAILER)
}

/// One section as it will appear in the merged file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedSection {
    pub kind: SectionKind,
    pub text: String,
    /// True when the text was synthesized because the file was absent
    pub inserted: bool,
}

/// Collect the section texts found in `section_dir`, applying `policy`
/// to the ones that are absent
pub fn collect_sections(
    section_dir: &Path,
    policy: MissingSectionPolicy,
) -> Result<Vec<CollectedSection>> {
    let mut sections = Vec::new();

    for kind in SectionKind::MERGE_ORDER {
        let path = section_dir.join(SectionLayout::for_kind(kind).file_name);
        if path.is_file() {
            debug!("Including {} section from {}", kind, path.display());
            sections.push(CollectedSection {
                kind,
                text: fs::read_to_string(&path)?,
                inserted: false,
            });
            continue;
        }

        match policy {
            MissingSectionPolicy::Skip => {
                warn!("Section file not found, skipping: {}", path.display());
            }
            MissingSectionPolicy::Fail => {
                return Err(ScadaError::SectionMissing {
                    section: kind,
                    path,
                });
            }
            MissingSectionPolicy::Empty => {
                warn!(
                    "Section file not found, inserting empty {} section: {}",
                    kind,
                    path.display()
                );
                sections.push(CollectedSection {
                    kind,
                    text: empty_section(kind),
                    inserted: true,
                });
            }
        }
    }

    Ok(sections)
}

/// Merge the section files in `section_dir` into `output_dir`.
///
/// Returns the merged file path. When no section file exists the merge
/// fails with [`ScadaError::NoContentProduced`] and nothing is written.
pub fn merge_sections(
    section_dir: &Path,
    output_dir: &Path,
    date: NaiveDate,
    policy: MissingSectionPolicy,
) -> Result<PathBuf> {
    let sections = collect_sections(section_dir, policy)?;

    if sections.iter().all(|section| section.inserted) {
        return Err(ScadaError::NoContentProduced {
            directory: section_dir.to_path_buf(),
        });
    }

    let texts: Vec<&str> = sections.iter().map(|section| section.text.as_str()).collect();
    let merged = compose_merged(&texts);

    let output_path = output_dir.join(merged_file_name(date));
    write_atomic(&output_path, merged.as_bytes())?;

    info!(
        "Merged {} sections into {}",
        sections.len(),
        output_path.display()
    );
    Ok(output_path)
}
