//! Cross-reference resolution.
//!
//! Both lookups are total: a miss yields the documented sentinel instead of
//! an error, so one bad reference never stops a batch.

use crate::constants::{STATE_CODE_OFFSET, UNRESOLVED_STATE_CODE, UNRESOLVED_STATION};
use crate::registry::{PrefixSuffixIndex, StationIndex};
use tracing::warn;

/// Resolve a point's station reference to `Station.order`, or 0 on a miss
pub fn resolve_station(raw_ref: &str, index: &StationIndex) -> u32 {
    if raw_ref.trim().is_empty() {
        return UNRESOLVED_STATION;
    }
    index.get(raw_ref).unwrap_or(UNRESOLVED_STATION)
}

/// Resolve a status point's prefix/suffix name to its state code.
///
/// A match yields `code + 200`; a blank name or a miss yields 0 with no
/// offset applied. A code too large to take the offset also yields 0.
pub fn resolve_state_code(prefix_name: &str, index: &PrefixSuffixIndex) -> i64 {
    if prefix_name.trim().is_empty() {
        return UNRESOLVED_STATE_CODE;
    }
    let Some(code) = index.get(prefix_name) else {
        return UNRESOLVED_STATE_CODE;
    };
    code.checked_add(STATE_CODE_OFFSET).unwrap_or_else(|| {
        warn!(
            "Prefix/suffix '{}' code {} is out of range; state code left at {}",
            prefix_name, code, UNRESOLVED_STATE_CODE
        );
        UNRESOLVED_STATE_CODE
    })
}
