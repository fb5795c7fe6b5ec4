//! Fixed-format section rendering.
//!
//! A section is the block one entity type contributes to the database file:
//!
//! ```text
//! *
//! <descriptor line>
//! *\t<column>\t<column>...
//! \t<field>\t<field>...      one line per record
//!  0
//! ```
//!
//! Descriptor lines and column lists are loader format constants declared
//! once in [`SectionLayout`]. Record field order is part of the loader's
//! positional contract.

use crate::models::{AnalogPoint, SectionKind, Station, StatusPoint, Unit};

/// Leading comment line of every section
pub const SECTION_COMMENT: &str = "*";

/// Closing line of every section, written without a trailing newline
pub const SECTION_FOOTER: &str = " 0";

/// One column of a section record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Whether the loader expects the value inside single quotes
    pub quoted: bool,
}

const fn bare(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        quoted: false,
    }
}

const fn quoted(name: &'static str) -> ColumnSpec {
    ColumnSpec { name, quoted: true }
}

/// Wire layout of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub kind: SectionKind,
    /// File the section is written to inside the section directory
    pub file_name: &'static str,
    pub descriptor: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const STATION_LAYOUT: SectionLayout = SectionLayout {
    kind: SectionKind::Station,
    file_name: "station_dat.dat",
    descriptor: "\t2\tSTATION\t0\t3\t4\t13",
    columns: &[bare("Order"), bare("Key"), quoted("Name"), bare("pAORGroup")],
};

pub const ANALOG_LAYOUT: SectionLayout = SectionLayout {
    kind: SectionKind::Analog,
    file_name: "analog_dat.dat",
    descriptor: "\t5\tANALOG\t1\t4\t23\t24\t64\t77,1\t77,4\t78,1\t78,4",
    columns: &[
        bare("Type"),
        quoted("Name"),
        bare("pUNIT"),
        bare("pScale"),
        bare("pConfiguredAORGroup"),
        bare("NominalHiLimits"),
        bare("NominalHiLimits2"),
        bare("NominalLowLimits"),
        bare("NominalLowLimits2"),
    ],
};

pub const STATUS_LAYOUT: SectionLayout = SectionLayout {
    kind: SectionKind::Status,
    file_name: "status_dat.dat",
    descriptor: "\t4\tSTATUS\t1\t4\t5\t19\t29\t40\t49",
    columns: &[
        bare("Type"),
        quoted("Name"),
        bare("pStation"),
        bare("pStates"),
        bare("pALARM_GROUP"),
        bare("pConfiguredAORGroup"),
        bare("ConfigNormalState"),
    ],
};

pub const UNIT_LAYOUT: SectionLayout = SectionLayout {
    kind: SectionKind::Unit,
    file_name: "unit_dat.dat",
    descriptor: "\t2\tUNIT\t0\t1",
    columns: &[bare("record"), quoted("NAME")],
};

impl SectionLayout {
    pub fn for_kind(kind: SectionKind) -> &'static SectionLayout {
        match kind {
            SectionKind::Station => &STATION_LAYOUT,
            SectionKind::Analog => &ANALOG_LAYOUT,
            SectionKind::Status => &STATUS_LAYOUT,
            SectionKind::Unit => &UNIT_LAYOUT,
        }
    }

    /// `*` followed by the tab-separated column names
    pub fn column_comment(&self) -> String {
        let mut line = String::from(SECTION_COMMENT);
        for column in self.columns {
            line.push('\t');
            line.push_str(column.name);
        }
        line
    }
}

/// An entity that renders as one section record
pub trait DatRecord {
    const KIND: SectionKind;

    /// Field values in layout column order, unquoted
    fn fields(&self) -> Vec<String>;
}

impl DatRecord for Station {
    const KIND: SectionKind = SectionKind::Station;

    fn fields(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.raw_key.clone(),
            self.display_name.clone(),
            self.aor_group.to_string(),
        ]
    }
}

impl DatRecord for AnalogPoint {
    const KIND: SectionKind = SectionKind::Analog;

    fn fields(&self) -> Vec<String> {
        vec![
            self.analog_type.letter().to_string(),
            self.name.clone(),
            self.engineering_unit.clone(),
            self.scale_factor.to_string(),
            self.configured_group.to_string(),
            self.high_limits.thresholds_field(),
            self.high_limits.unreasonable_field(),
            self.low_limits.thresholds_field(),
            self.low_limits.unreasonable_field(),
        ]
    }
}

impl DatRecord for StatusPoint {
    const KIND: SectionKind = SectionKind::Status;

    fn fields(&self) -> Vec<String> {
        vec![
            StatusPoint::TYPE_CODE.to_string(),
            self.name.clone(),
            self.resolved_station.to_string(),
            self.state_code.to_string(),
            StatusPoint::ALARM_GROUP.to_string(),
            self.configured_group.to_string(),
            self.normal_state.to_string(),
        ]
    }
}

impl DatRecord for Unit {
    const KIND: SectionKind = SectionKind::Unit;

    fn fields(&self) -> Vec<String> {
        vec![self.record_number.to_string(), self.name.clone()]
    }
}

/// Render one record line, quoting per the layout
pub fn format_record(layout: &SectionLayout, fields: &[String]) -> String {
    debug_assert_eq!(fields.len(), layout.columns.len());

    let mut line = String::new();
    for (column, value) in layout.columns.iter().zip(fields) {
        line.push('\t');
        if column.quoted {
            line.push('\'');
            line.push_str(value);
            line.push('\'');
        } else {
            line.push_str(value);
        }
    }
    line
}

/// Render a full section from pre-split record fields
pub fn format_section<I>(layout: &SectionLayout, records: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = String::new();
    out.push_str(SECTION_COMMENT);
    out.push('\n');
    out.push_str(layout.descriptor);
    out.push('\n');
    out.push_str(&layout.column_comment());
    out.push('\n');
    for fields in records {
        out.push_str(&format_record(layout, &fields));
        out.push('\n');
    }
    out.push_str(SECTION_FOOTER);
    out
}

/// Render the section for a list of entities in their given order
pub fn render_section<R: DatRecord>(records: &[R]) -> String {
    format_section(
        SectionLayout::for_kind(R::KIND),
        records.iter().map(DatRecord::fields),
    )
}

/// Header and footer of a section with no records
pub fn empty_section(kind: SectionKind) -> String {
    format_section(SectionLayout::for_kind(kind), std::iter::empty())
}
