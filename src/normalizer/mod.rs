//! Entity normalizers.
//!
//! Each normalizer maps one raw source table onto its entity type, keeping
//! input row order. Optional columns that are absent read as blank; the only
//! hard failure is a missing required column.

pub mod analog;
pub mod station;
pub mod status;
pub mod unit;

pub use analog::normalize_analog_points;
pub use station::normalize_stations;
pub use status::normalize_status_points;
pub use unit::normalize_units;

use crate::keys::{CompositeKey, KeyedPoint, synthesize_keys};

/// Points that carry their own composite key slot
pub(crate) trait KeySlot: KeyedPoint {
    fn set_composite_key(&mut self, key: CompositeKey);
}

/// Synthesize keys over `points` in order and store them on each point
pub(crate) fn assign_composite_keys<P: KeySlot>(points: &mut [P]) {
    let keys = synthesize_keys(points);
    for (point, key) in points.iter_mut().zip(keys) {
        point.set_composite_key(key);
    }
}
