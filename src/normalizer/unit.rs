//! Engineering unit normalization

use crate::constants::unit_columns;
use crate::error::Result;
use crate::models::Unit;
use crate::table::RawTable;

/// Number units 1..=N in row order
pub fn normalize_units(table: &RawTable) -> Result<Vec<Unit>> {
    let descriptions = table.column(unit_columns::DESC);

    Ok((0..table.height())
        .map(|row| Unit {
            record_number: row as u32 + 1,
            name: descriptions.text(row).to_string(),
        })
        .collect())
}
