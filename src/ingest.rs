//! Trip-record ingest
//!
//! Turns taxi-trip messages (one JSON object per line) into trips. Pickup
//! and drop-off zones may be integers or strings; both become location
//! names. Fields other than the endpoints and the weight are ignored.

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::graph::edge::validate_weight;
use crate::graph::EdgeStore;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use tracing::{debug, info};

/// A pickup or drop-off zone as it appears on the wire.
///
/// Integral floats (`168.0`, as written by dataframe exports with nullable
/// integer columns) are read as the integer id. A fractional id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocationKey {
    Id(i64),
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireKey {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for LocationKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match WireKey::deserialize(deserializer)? {
            WireKey::Signed(id) => Ok(LocationKey::Id(id)),
            WireKey::Unsigned(id) => Ok(LocationKey::Name(id.to_string())),
            WireKey::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                if v >= i64::MIN as f64 && v < i64::MAX as f64 {
                    Ok(LocationKey::Id(v as i64))
                } else {
                    Ok(LocationKey::Name(format!("{:.0}", v)))
                }
            }
            WireKey::Float(v) => Err(de::Error::custom(format!(
                "location id {} is not an integer",
                v
            ))),
            WireKey::Text(name) => Ok(LocationKey::Name(name)),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKey::Id(id) => write!(f, "{}", id),
            LocationKey::Name(name) => f.write_str(name),
        }
    }
}

/// One trip message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(alias = "PULocationID", alias = "pickup")]
    pub source: LocationKey,

    #[serde(alias = "DOLocationID", alias = "dropoff")]
    pub target: LocationKey,

    /// Missing or null means 1.0 (one trip)
    #[serde(default, alias = "trip_distance")]
    pub weight: Option<f64>,
}

impl TripRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        TripRecord {
            source: LocationKey::Name(source.into()),
            target: LocationKey::Name(target.into()),
            weight: Some(weight),
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// Totals for one ingest batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Trips added
    pub records: usize,
    /// Locations seen for the first time
    pub new_locations: usize,
}

/// Decode JSON-lines trip messages. Blank lines are skipped; the first bad
/// line aborts with its 1-based line number.
pub fn read_jsonl<R: BufRead>(reader: R) -> AnalyticsResult<Vec<TripRecord>> {
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: TripRecord = serde_json::from_str(trimmed)
            .map_err(|source| AnalyticsError::MalformedRecord { line: i + 1, source })?;
        records.push(record);
    }

    debug!("Decoded {} trip records", records.len());
    Ok(records)
}

/// Add a batch of records. Every weight is checked first, so a bad record
/// leaves the store untouched.
pub fn ingest_records(
    store: &mut EdgeStore,
    records: &[TripRecord],
) -> AnalyticsResult<IngestStats> {
    for record in records {
        validate_weight(record.weight())?;
    }

    let before = store.node_count();
    for record in records {
        store.ingest(
            &record.source.to_string(),
            &record.target.to_string(),
            record.weight(),
        )?;
    }

    let stats = IngestStats {
        records: records.len(),
        new_locations: store.node_count() - before,
    };
    info!(
        "Ingested {} trips ({} new locations, {} total)",
        stats.records,
        stats.new_locations,
        store.node_count()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_taxi_messages() {
        let input = r#"{"VendorID": 2, "PULocationID": 168, "DOLocationID": 247, "trip_distance": 2.5}
{"PULocationID": 247, "DOLocationID": 168}

{"source": "Mott Haven", "target": "Melrose", "weight": null}
"#;
        let records = read_jsonl(Cursor::new(input)).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source, LocationKey::Id(168));
        assert_eq!(records[0].weight(), 2.5);
        assert_eq!(records[1].weight(), 1.0);
        assert_eq!(records[2].target, LocationKey::Name("Melrose".to_string()));
        assert_eq!(records[2].weight(), 1.0);
    }

    #[test]
    fn test_malformed_line_number() {
        let input = "{\"source\": \"A\", \"target\": \"B\"}\n\n{\"source\": \"A\"}\n";
        let err = read_jsonl(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_ingest_records() {
        let mut store = EdgeStore::new();
        let records = vec![
            TripRecord::new("A", "B", 1.0),
            TripRecord::new("A", "B", 3.0),
            TripRecord::new("B", "C", 1.0),
        ];

        let stats = ingest_records(&mut store, &records).unwrap();
        assert_eq!(stats, IngestStats { records: 3, new_locations: 3 });
        assert_eq!(store.edge_count(), 3);

        let stats = ingest_records(&mut store, &[TripRecord::new("C", "D", 1.0)]).unwrap();
        assert_eq!(stats.new_locations, 1);
    }

    #[test]
    fn test_bad_weight_rejects_whole_batch() {
        let mut store = EdgeStore::new();
        let records = vec![TripRecord::new("A", "B", 1.0), TripRecord::new("B", "C", -4.0)];

        assert!(ingest_records(&mut store, &records).is_err());
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_float_and_negative_ids() {
        let input = r#"{"PULocationID": 168.0, "DOLocationID": 247.0}
{"PULocationID": -1, "DOLocationID": 18446744073709551615}
"#;
        let records = read_jsonl(Cursor::new(input)).unwrap();

        assert_eq!(records[0].source, LocationKey::Id(168));
        assert_eq!(records[0].target.to_string(), "247");
        assert_eq!(records[1].source, LocationKey::Id(-1));
        assert_eq!(records[1].target.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_fractional_id_rejected() {
        let input = "{\"PULocationID\": 168.5, \"DOLocationID\": 247}\n";
        let err = read_jsonl(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_integer_and_string_keys_share_names() {
        let mut store = EdgeStore::new();
        let records = read_jsonl(Cursor::new(
            "{\"PULocationID\": 3, \"DOLocationID\": \"4\"}\n{\"source\": \"3\", \"target\": 4}\n",
        ))
        .unwrap();

        ingest_records(&mut store, &records).unwrap();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 2);
    }
}
