//! Composite key synthesis.
//!
//! Each point gets a `TTSSSCCC` key: two digits of type code, three of
//! resolved station, three of per-bucket sequence. A bucket is one
//! (type code, resolved station) pair and its sequence starts at 1 and
//! advances by one per point in input order. Unresolved points share the
//! station-0 bucket like any other station.

use crate::constants::{KEY_SEQUENCE_WIDTH, KEY_STATION_WIDTH, KEY_TYPE_WIDTH};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Fixed-width point key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Format a key without checking the field widths
    pub fn new(type_code: u8, station: u32, sequence: u32) -> Self {
        Self(format!(
            "{:0tw$}{:0sw$}{:0cw$}",
            type_code,
            station,
            sequence,
            tw = KEY_TYPE_WIDTH,
            sw = KEY_STATION_WIDTH,
            cw = KEY_SEQUENCE_WIDTH
        ))
    }

    /// Format a key, or `None` when a component does not fit its width
    pub fn checked(type_code: u8, station: u32, sequence: u32) -> Option<Self> {
        let fits = |value: u32, width: usize| u64::from(value) < 10u64.pow(width as u32);
        (fits(u32::from(type_code), KEY_TYPE_WIDTH)
            && fits(station, KEY_STATION_WIDTH)
            && fits(sequence, KEY_SEQUENCE_WIDTH))
        .then(|| Self::new(type_code, station, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The grouping a point is keyed under
pub trait KeyedPoint {
    fn type_code(&self) -> u8;
    fn resolved_station(&self) -> u32;
}

/// Bucket of the key sequence: (type code, resolved station)
pub type KeyBucket = (u8, u32);

/// Next sequence number per bucket
#[derive(Debug, Clone, Default)]
pub struct SequenceCounters {
    next: BTreeMap<KeyBucket, u32>,
}

impl SequenceCounters {
    /// Create counters for the distinct buckets of `points`, each starting at 1
    pub fn for_points<P: KeyedPoint>(points: &[P]) -> Self {
        let next = points
            .iter()
            .map(|point| ((point.type_code(), point.resolved_station()), 1))
            .collect();
        Self { next }
    }

    /// Take the current sequence of `bucket` and advance it
    pub fn advance(&mut self, bucket: KeyBucket) -> u32 {
        let counter = self.next.entry(bucket).or_insert(1);
        let sequence = *counter;
        *counter += 1;
        sequence
    }

    /// Number of distinct buckets seen
    pub fn bucket_count(&self) -> usize {
        self.next.len()
    }
}

/// Compute one key per point, in the points' order.
///
/// The counters are owned by this call; nothing persists between calls.
/// A point whose station or sequence overflows the fixed width gets an
/// unassigned key and a warning.
pub fn synthesize_keys<P: KeyedPoint>(points: &[P]) -> Vec<CompositeKey> {
    let mut counters = SequenceCounters::for_points(points);
    points
        .iter()
        .map(|point| {
            let bucket = (point.type_code(), point.resolved_station());
            let sequence = counters.advance(bucket);
            CompositeKey::checked(bucket.0, bucket.1, sequence).unwrap_or_else(|| {
                warn!(
                    "Composite key for type {} station {} sequence {} exceeds its fixed width; left unassigned",
                    bucket.0, bucket.1, sequence
                );
                CompositeKey::default()
            })
        })
        .collect()
}
