//! Analog point normalization
//!
//! Maps the analog export onto [`AnalogPoint`], resolves each point's
//! station and assigns composite keys.

use super::{KeySlot, assign_composite_keys};
use crate::constants::analog_columns as cols;
use crate::error::Result;
use crate::keys::{CompositeKey, KeyedPoint};
use crate::models::{AnalogPoint, AnalogType, LimitSet};
use crate::registry::StationIndex;
use crate::resolver::resolve_station;
use crate::table::RawTable;
use tracing::debug;

impl KeyedPoint for AnalogPoint {
    fn type_code(&self) -> u8 {
        self.analog_type.type_code()
    }

    fn resolved_station(&self) -> u32 {
        self.resolved_station
    }
}

impl KeySlot for AnalogPoint {
    fn set_composite_key(&mut self, key: CompositeKey) {
        self.composite_key = key;
    }
}

/// Normalize the analog table against the station index
pub fn normalize_analog_points(
    table: &RawTable,
    stations: &StationIndex,
) -> Result<Vec<AnalogPoint>> {
    let rtu_ids = table.column(cols::RTU_ID);
    let names = table.column(cols::NAME);
    let units = table.column(cols::ENG_UNITS);
    let scales = table.column(cols::SCALE_FACTOR);
    let groups = table.column(cols::USER_TYPE_ID);
    let station_refs = table.column(cols::STATION_ID);

    let pre_emergency_hi = table.column(cols::PRE_EMERGENCY_HI);
    let emergency_hi = table.column(cols::EMERGENCY_HI);
    let pre_emergency_db = table.column(cols::PRE_EMERGENCY_DEADBAND);
    let emergency_db = table.column(cols::EMERGENCY_DEADBAND);
    let pre_emergency_lo = table.column(cols::PRE_EMERGENCY_LO);
    let emergency_lo = table.column(cols::EMERGENCY_LO);
    let pre_emergency_lo_db = table.column(cols::PRE_EMERGENCY_LO_DEADBAND);
    let unreasonable_db = table.column(cols::UNREASONABLE_DEADBAND);

    let mut points: Vec<AnalogPoint> = (0..table.height())
        .map(|row| {
            let analog_type = if rtu_ids.text(row).trim().is_empty() {
                AnalogType::Calculated
            } else {
                AnalogType::Telemetered
            };
            let station_ref = station_refs.text(row).to_string();
            let resolved_station = resolve_station(&station_ref, stations);

            AnalogPoint {
                analog_type,
                name: names.text(row).to_string(),
                engineering_unit: units.text(row).to_string(),
                scale_factor: scales.numeric(row),
                configured_group: groups.numeric(row),
                station_ref,
                resolved_station,
                high_limits: LimitSet::high(
                    [
                        pre_emergency_hi.numeric(row),
                        emergency_hi.numeric(row),
                        pre_emergency_db.numeric(row),
                        emergency_db.numeric(row),
                    ],
                    unreasonable_db.numeric(row),
                ),
                // Deadband order on the low side is as exported
                low_limits: LimitSet::low(
                    [
                        pre_emergency_lo.numeric(row),
                        emergency_lo.numeric(row),
                        emergency_db.numeric(row),
                        pre_emergency_lo_db.numeric(row),
                    ],
                    unreasonable_db.numeric(row),
                ),
                composite_key: CompositeKey::default(),
            }
        })
        .collect();

    assign_composite_keys(&mut points);

    debug!(
        "Normalized {} analog points ({} unresolved stations)",
        points.len(),
        points.iter().filter(|p| p.resolved_station == 0).count()
    );
    Ok(points)
}
