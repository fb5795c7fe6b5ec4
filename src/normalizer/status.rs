//! Status point normalization

use super::{KeySlot, assign_composite_keys};
use crate::constants::status_columns as cols;
use crate::error::Result;
use crate::keys::{CompositeKey, KeyedPoint};
use crate::models::StatusPoint;
use crate::registry::{PrefixSuffixIndex, StationIndex};
use crate::resolver::{resolve_state_code, resolve_station};
use crate::table::RawTable;
use tracing::debug;

impl KeyedPoint for StatusPoint {
    fn type_code(&self) -> u8 {
        StatusPoint::TYPE_CODE
    }

    fn resolved_station(&self) -> u32 {
        self.resolved_station
    }
}

impl KeySlot for StatusPoint {
    fn set_composite_key(&mut self, key: CompositeKey) {
        self.composite_key = key;
    }
}

/// Normalize the status table, resolving stations and state codes
pub fn normalize_status_points(
    table: &RawTable,
    stations: &StationIndex,
    codes: &PrefixSuffixIndex,
) -> Result<Vec<StatusPoint>> {
    let names = table.column(cols::NAME);
    let station_refs = table.column(cols::STATION_ID);
    let prefix_suffixes = table.column(cols::PREFIX_SUFFIX_ID);
    let groups = table.column(cols::USER_TYPE_ID);
    let normal_states = table.column(cols::NORMAL_STATE);

    let mut points: Vec<StatusPoint> = (0..table.height())
        .map(|row| {
            let station_ref = station_refs.text(row).to_string();
            StatusPoint {
                name: names.text(row).to_string(),
                resolved_station: resolve_station(&station_ref, stations),
                station_ref,
                state_code: resolve_state_code(prefix_suffixes.text(row), codes),
                configured_group: groups.numeric(row),
                normal_state: normal_states.numeric(row),
                composite_key: CompositeKey::default(),
            }
        })
        .collect();

    assign_composite_keys(&mut points);

    debug!(
        "Normalized {} status points ({} unresolved stations, {} without state code)",
        points.len(),
        points.iter().filter(|p| p.resolved_station == 0).count(),
        points.iter().filter(|p| p.state_code == 0).count()
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumericField, PrefixSuffixCode, Station};
    use polars::prelude::*;

    fn indices() -> (StationIndex, PrefixSuffixIndex) {
        let station = Station {
            source_key: "501".to_string(),
            raw_key: "ALPHA".to_string(),
            display_name: "Alpha Site".to_string(),
            aor_group: NumericField::parse("3"),
            priority: NumericField::blank(),
            order: 1,
        };
        let codes = PrefixSuffixIndex::from_codes([PrefixSuffixCode {
            name: "OpenClose".to_string(),
            code: 12,
        }]);
        (StationIndex::from_stations(&[station]), codes)
    }

    #[test]
    fn test_status_resolution() {
        let frame = df!(
            "NAME" => ["CB1", "CB2", "CB3"],
            "STATIONPID" => ["Alpha", "ALPHA", "OMEGA"],
            "PREFSUFFID" => [Some("openclose"), None, Some("Unknown")],
            "USERTYPEID" => ["5", "5", ""],
            "NORMSTATE" => ["0", "1", "x"]
        )
        .unwrap();
        let table = RawTable::from_frame("StatusPoints.csv", frame);
        let (stations, codes) = indices();

        let points = normalize_status_points(&table, &stations, &codes).unwrap();
        let state_codes: Vec<i64> = points.iter().map(|p| p.state_code).collect();
        assert_eq!(state_codes, [212, 0, 0]);

        let keys: Vec<&str> = points.iter().map(|p| p.composite_key.as_str()).collect();
        assert_eq!(keys, ["01001001", "01001002", "01000001"]);

        assert_eq!(points[2].resolved_station, 0);
        assert_eq!(points[2].station_ref, "OMEGA");
        assert!(points[2].configured_group.is_blank());
        assert!(points[2].normal_state.is_blank());
        assert_eq!(points[1].normal_state.as_str(), "1");
    }

    #[test]
    fn test_empty_prefix_suffix_is_zero_not_offset() {
        let frame = df!("NAME" => ["CB1"], "PREFSUFFID" => [""]).unwrap();
        let table = RawTable::from_frame("StatusPoints.csv", frame);
        let (stations, codes) = indices();

        let points = normalize_status_points(&table, &stations, &codes).unwrap();
        assert_eq!(points[0].state_code, 0);
    }
}
