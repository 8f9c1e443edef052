//! Duration relabeling for catalog documents.
//!
//! Fixed thresholds suit pop catalogs, but a catalog dominated by long live
//! recordings ends up with every song in `Long`. Relabeling clusters the
//! catalog's own durations into three groups with one-dimensional k-means and
//! stores the resulting bucket in each record's `listen` field, which the
//! normalizer then trusts.

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::{CatalogError, DURATION_KEYS, TRUSTED_BUCKET_KEY};
use crate::error::{Result, ResultExt};
use crate::model::{LengthBucket, parse_duration};

const CLUSTERS: usize = 3;
const MAX_ITERATIONS: usize = 100;
const BACKUP_SUFFIX: &str = "bak";

/// Three duration cluster centers in ascending order (Short, Mid, Long).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthClusters {
    pub centers: [f64; CLUSTERS],
}

impl LengthClusters {
    /// Classify a duration by its nearest center.
    pub fn classify(&self, seconds: u32) -> LengthBucket {
        if seconds == 0 {
            return LengthBucket::Unknown;
        }
        LengthBucket::NAMED[nearest(&self.centers, f64::from(seconds))]
    }
}

/// What a relabel pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct RelabelSummary {
    /// Records in the document
    pub songs: usize,
    /// Records that got a cluster label
    pub labeled: usize,
    pub clusters: LengthClusters,
}

/// Cluster positive durations into three groups.
///
/// Deterministic: centers start at the minimum, median and maximum. Returns
/// `None` when fewer than three positive durations are given.
pub fn cluster_lengths(seconds: &[u32]) -> Option<LengthClusters> {
    let mut points: Vec<f64> = seconds.iter().filter(|&&s| s > 0).map(|&s| f64::from(s)).collect();
    if points.len() < CLUSTERS {
        return None;
    }
    points.sort_by(f64::total_cmp);

    let mut centers = [points[0], points[points.len() / 2], points[points.len() - 1]];

    for _ in 0..MAX_ITERATIONS {
        let mut sums = [0.0f64; CLUSTERS];
        let mut counts = [0usize; CLUSTERS];
        for &p in &points {
            let k = nearest(&centers, p);
            sums[k] += p;
            counts[k] += 1;
        }

        let mut next = centers;
        for k in 0..CLUSTERS {
            // An empty cluster keeps its previous center
            if counts[k] > 0 {
                next[k] = sums[k] / counts[k] as f64;
            }
        }

        if next == centers {
            break;
        }
        centers = next;
    }

    centers.sort_by(f64::total_cmp);
    Some(LengthClusters { centers })
}

fn nearest(centers: &[f64; CLUSTERS], point: f64) -> usize {
    let mut best = 0;
    for k in 1..CLUSTERS {
        if (centers[k] - point).abs() < (centers[best] - point).abs() {
            best = k;
        }
    }
    best
}

/// Relabel every record in a catalog document in place.
///
/// Records with a parseable duration get their cluster's label; records
/// without one get `Unknown` unless they already carry a label.
pub fn relabel_document(document: &mut Value) -> std::result::Result<RelabelSummary, CatalogError> {
    let records = match document {
        Value::Array(records) => records,
        Value::Object(obj) => match obj.get_mut("songs") {
            Some(Value::Array(records)) => records,
            _ => return Err(CatalogError::InvalidFormat),
        },
        _ => return Err(CatalogError::InvalidFormat),
    };

    let seconds: Vec<u32> = records.iter().map(record_seconds).collect();
    let found = seconds.iter().filter(|&&s| s > 0).count();
    let clusters = cluster_lengths(&seconds).ok_or(CatalogError::NotEnoughDurations { found })?;

    let mut labeled = 0;
    for (record, &secs) in records.iter_mut().zip(&seconds) {
        let Some(obj) = record.as_object_mut() else {
            continue;
        };
        if secs > 0 {
            obj.insert(
                TRUSTED_BUCKET_KEY.to_string(),
                Value::from(clusters.classify(secs).as_str()),
            );
            labeled += 1;
        } else {
            let has_label = obj
                .get(TRUSTED_BUCKET_KEY)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !has_label {
                obj.insert(
                    TRUSTED_BUCKET_KEY.to_string(),
                    Value::from(LengthBucket::Unknown.as_str()),
                );
            }
        }
    }

    Ok(RelabelSummary {
        songs: records.len(),
        labeled,
        clusters,
    })
}

fn record_seconds(record: &Value) -> u32 {
    DURATION_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(parse_duration)
        .unwrap_or(0)
}

/// Relabel a catalog file, keeping a `.bak` copy of the original.
pub fn relabel_file(path: &Path) -> Result<RelabelSummary> {
    let text = std::fs::read_to_string(path).with_context(format!("reading {}", path.display()))?;
    let mut document: Value = serde_json::from_str(&text).with_context("parsing catalog document")?;

    let summary = relabel_document(&mut document)?;

    let backup = backup_path(path);
    if let Err(e) = std::fs::copy(path, &backup) {
        tracing::warn!(target: "catalog::relabel", backup = %backup.display(), error = %e, "Could not create backup");
    }

    let output = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, output).with_context(format!("writing {}", path.display()))?;

    tracing::info!(
        target: "catalog::relabel",
        songs = summary.songs,
        labeled = summary.labeled,
        "Relabeled catalog"
    );
    Ok(summary)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_separates_obvious_groups() {
        let clusters = cluster_lengths(&[60, 70, 80, 240, 250, 260, 600, 620, 640]).unwrap();
        assert_eq!(clusters.centers, [70.0, 250.0, 620.0]);
        assert_eq!(clusters.classify(75), LengthBucket::Short);
        assert_eq!(clusters.classify(300), LengthBucket::Mid);
        assert_eq!(clusters.classify(900), LengthBucket::Long);
        assert_eq!(clusters.classify(0), LengthBucket::Unknown);
    }

    #[test]
    fn test_cluster_needs_three_durations() {
        assert!(cluster_lengths(&[120, 0, 0, 240]).is_none());
        assert!(cluster_lengths(&[]).is_none());
        assert!(cluster_lengths(&[120, 180, 240]).is_some());
    }

    #[test]
    fn test_relabel_document_keeps_shape() {
        let mut doc = json!({"songs": [
            {"id": "a", "duration": "1:00"},
            {"id": "b", "duration": "4:00"},
            {"id": "c", "duration": "10:00"},
            {"id": "d"},
            {"id": "e", "listen": "Mid"}
        ]});

        let summary = relabel_document(&mut doc).unwrap();
        assert_eq!(summary.songs, 5);
        assert_eq!(summary.labeled, 3);

        let songs = doc["songs"].as_array().unwrap();
        assert_eq!(songs[0]["listen"], "Short");
        assert_eq!(songs[1]["listen"], "Mid");
        assert_eq!(songs[2]["listen"], "Long");
        assert_eq!(songs[3]["listen"], "Unknown");
        assert_eq!(songs[4]["listen"], "Mid");
    }

    #[test]
    fn test_relabel_rejects_sparse_documents() {
        let mut doc = json!([{"id": "a", "duration": "1:00"}, {"id": "b"}]);
        let err = relabel_document(&mut doc).unwrap_err();
        assert!(matches!(err, CatalogError::NotEnoughDurations { found: 1 }));

        let mut not_songs = json!({"tracks": []});
        assert!(matches!(relabel_document(&mut not_songs), Err(CatalogError::InvalidFormat)));
    }

    #[test]
    fn test_relabel_file_writes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duration_fix.json");
        let original = r#"[{"id":"a","duration":"1:00"},{"id":"b","duration":"4:00"},{"id":"c","duration":"9:00"}]"#;
        std::fs::write(&path, original).unwrap();

        relabel_file(&path).unwrap();

        let backup = std::fs::read_to_string(dir.path().join("duration_fix.json.bak")).unwrap();
        assert_eq!(backup, original);

        let updated: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(updated.is_array());
        assert_eq!(updated[2]["listen"], "Long");
    }
}
