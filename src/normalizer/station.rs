//! Station table normalization

use crate::constants::station_columns;
use crate::error::Result;
use crate::models::Station;
use crate::table::RawTable;
use tracing::debug;

/// Normalize the station table, numbering stations 1..=N in row order.
///
/// The unique identifier column (`PKEY`) must be present.
pub fn normalize_stations(table: &RawTable) -> Result<Vec<Station>> {
    table.require_column(station_columns::PKEY)?;

    let source_keys = table.column(station_columns::PKEY);
    let names = table.column(station_columns::NAME);
    let descriptions = table.column(station_columns::DESC);
    let zones = table.column(station_columns::ZONE_ID);
    let priorities = table.column(station_columns::ALARM_PRIORITY);

    let stations: Vec<Station> = (0..table.height())
        .map(|row| Station {
            source_key: source_keys.text(row).to_string(),
            raw_key: names.text(row).to_string(),
            display_name: descriptions.text(row).to_string(),
            aor_group: zones.numeric(row),
            priority: priorities.numeric(row),
            order: row as u32 + 1,
        })
        .collect();

    debug!("Normalized {} stations", stations.len());
    Ok(stations)
}
