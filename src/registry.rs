//! Reference indices for cross-table lookups.
//!
//! Both indices are built once per run and only read afterwards. Keys are
//! case-normalised (trimmed and uppercased) so lookups ignore case.

use crate::constants::prefix_suffix_columns;
use crate::error::Result;
use crate::models::{PrefixSuffixCode, Station};
use crate::table::RawTable;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Normalise a join key for case-insensitive lookup
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Station raw key to `Station.order`
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    orders: HashMap<String, u32>,
}

impl StationIndex {
    /// Index every station with a non-blank raw key
    pub fn from_stations(stations: &[Station]) -> Self {
        let mut orders = HashMap::with_capacity(stations.len());

        for station in stations {
            let key = normalize_key(&station.raw_key);
            if key.is_empty() {
                debug!(
                    "Station with identifier '{}' has no key and cannot be referenced",
                    station.source_key
                );
                continue;
            }
            if let Some(previous) = orders.insert(key, station.order) {
                warn!(
                    "Duplicate station key '{}': order {} replaces order {}",
                    station.raw_key, station.order, previous
                );
            }
        }

        Self { orders }
    }

    /// Order for `raw_ref`, if any station carries that key
    pub fn get(&self, raw_ref: &str) -> Option<u32> {
        self.orders.get(&normalize_key(raw_ref)).copied()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Prefix/suffix name to numeric code
#[derive(Debug, Clone, Default)]
pub struct PrefixSuffixIndex {
    codes: HashMap<String, i64>,
}

impl PrefixSuffixIndex {
    /// Build from code records; on a duplicate name the last one wins
    pub fn from_codes(codes: impl IntoIterator<Item = PrefixSuffixCode>) -> Self {
        let mut index = HashMap::new();

        for entry in codes {
            let key = normalize_key(&entry.name);
            if key.is_empty() {
                continue;
            }
            if let Some(previous) = index.insert(key, entry.code) {
                // Last-seen wins; the table is expected to be unique
                warn!(
                    "Duplicate prefix/suffix name '{}': code {} replaces code {}",
                    entry.name, entry.code, previous
                );
            }
        }

        Self { codes: index }
    }

    /// Read the `Name`/`PKey` registry table; both columns are required
    pub fn from_table(table: &RawTable) -> Result<Self> {
        table.require_column(prefix_suffix_columns::NAME)?;
        table.require_column(prefix_suffix_columns::PKEY)?;

        let names = table.column(prefix_suffix_columns::NAME);
        let keys = table.column(prefix_suffix_columns::PKEY);

        let mut codes = Vec::with_capacity(table.height());
        for row in 0..table.height() {
            let name = names.text(row);
            match parse_code(keys.text(row)) {
                Some(code) => codes.push(PrefixSuffixCode {
                    name: name.to_string(),
                    code,
                }),
                None => warn!(
                    "Skipping prefix/suffix '{}' in {}: key '{}' is not an integer",
                    name,
                    table.path().display(),
                    keys.text(row)
                ),
            }
        }

        let index = Self::from_codes(codes);
        debug!("Prefix/suffix index holds {} names", index.len());
        Ok(index)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.codes.get(&normalize_key(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Integer code, accepting a whole-valued decimal such as `12.0`.
///
/// Codes must fit in an `i32`; anything larger is rejected.
fn parse_code(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let code = trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .filter(|value| value.abs() <= f64::from(i32::MAX))
            .map(|value| value as i64)
    })?;
    i32::try_from(code).ok().map(i64::from)
}
