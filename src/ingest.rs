//! Building a textual index from GeoJSON features.
//!
//! Features are indexed `batch_size` at a time on the rayon pool; each batch's
//! records are written, in feature order, before the next batch starts.

use crate::compute::drill::make_polygon_index;
use crate::compute::geojson::{SourceFeature, read_feature_collection};
use crate::config::IndexConfig;
use crate::error::{GeohashTreeError, Result};
use crate::index::IndexHeader;
use crate::index::compact::compact;
use crate::index::csv::RecordWriter;
use geohash_tree_types::IndexRecord;
use geojson::{Feature, FeatureCollection};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Outcome of ingesting a feature collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Features that produced records.
    pub indexed: usize,
    /// Features skipped for a missing id, unsupported geometry or no valid polygon.
    pub skipped: usize,
    /// Cell records written, header excluded.
    pub records: usize,
}

/// Writes the header and then the records of every indexed feature.
pub struct IndexWriter<W: Write> {
    writer: RecordWriter<W>,
    config: IndexConfig,
}

impl IndexWriter<File> {
    /// Create (or truncate) the index file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, config: IndexConfig) -> Result<Self> {
        config.validate().map_err(GeohashTreeError::Config)?;
        let header = IndexHeader::new(config.min_precision, config.max_precision);
        Ok(Self {
            writer: RecordWriter::create(path, &header)?,
            config,
        })
    }
}

impl<W: Write> IndexWriter<W> {
    pub fn new(writer: W, config: IndexConfig) -> Result<Self> {
        config.validate().map_err(GeohashTreeError::Config)?;
        let header = IndexHeader::new(config.min_precision, config.max_precision);
        Ok(Self {
            writer: RecordWriter::new(writer, &header)?,
            config,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Records for one feature, without writing them.
    ///
    /// Every member polygon is subdivided and the union of their leaves is
    /// compacted under the feature's id.
    pub fn index_feature(&self, feature: &Feature) -> Result<Vec<IndexRecord>> {
        index_feature(feature, &self.config)
    }

    /// Index and write every feature of `collection`.
    ///
    /// Per-feature failures are logged and skipped; write failures abort.
    pub fn write_collection(&mut self, collection: &FeatureCollection) -> Result<IngestStats> {
        let total = collection.features.len();
        let mut stats = IngestStats::default();

        for batch in collection.features.chunks(self.config.batch_size) {
            let config = &self.config;
            let results: Vec<Result<Vec<IndexRecord>>> = batch
                .par_iter()
                .map(|feature| index_feature(feature, config))
                .collect();

            for (feature, result) in batch.iter().zip(results) {
                match result {
                    Ok(records) => {
                        self.writer.write_records(&records)?;
                        stats.indexed += 1;
                        stats.records += records.len();
                    }
                    Err(e) => {
                        warn!("Skipping feature {}: {}", feature_label(feature), e);
                        stats.skipped += 1;
                    }
                }
            }
            self.writer.flush()?;
            info!(
                "Indexed {}/{} features",
                stats.indexed + stats.skipped,
                total
            );
        }

        Ok(stats)
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer.into_inner()
    }
}

fn index_feature(feature: &Feature, config: &IndexConfig) -> Result<Vec<IndexRecord>> {
    let source = SourceFeature::from_feature(feature, &config.id_field)?;

    let members = source.polygons.len();
    let mut leaves = Vec::new();
    let mut indexed = 0;
    let mut first_error = None;
    for (member, polygon) in source.polygons.into_iter().enumerate() {
        match make_polygon_index(polygon, config.min_precision, config.max_precision) {
            Ok(cells) => {
                leaves.extend(cells);
                indexed += 1;
            }
            Err(e) => {
                warn!(
                    "Skipping polygon {}/{} of feature {}: {}",
                    member + 1,
                    members,
                    source.id,
                    e
                );
                first_error.get_or_insert(e);
            }
        }
    }
    if indexed == 0 {
        return Err(first_error.unwrap_or_else(|| {
            GeohashTreeError::GeoJson(format!("Feature '{}' has no polygons", source.id))
        }));
    }
    leaves.sort_unstable();
    leaves.dedup();

    debug!("Feature {} covers {} leaf cells", source.id, leaves.len());
    Ok(compact(&leaves, &source.id, config.min_precision))
}

fn feature_label(feature: &Feature) -> String {
    match &feature.id {
        Some(geojson::feature::Id::String(id)) => id.clone(),
        Some(geojson::feature::Id::Number(id)) => id.to_string(),
        None => "<unnamed>".to_string(),
    }
}

/// Read a GeoJSON FeatureCollection from `input` and write its textual index
/// to `output`.
pub fn index_from_geojson<P, Q>(input: P, output: Q, config: &IndexConfig) -> Result<IngestStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let collection = read_feature_collection(input.as_ref())?;
    info!(
        "Indexing {} features from {} at precision {}..={}",
        collection.features.len(),
        input.as_ref().display(),
        config.min_precision,
        config.max_precision
    );

    let mut writer = IndexWriter::create(output.as_ref(), config.clone())?;
    let stats = writer.write_collection(&collection)?;
    writer.finish()?.sync_all()?;

    info!(
        "Wrote {} records for {} features to {} ({} skipped)",
        stats.records,
        stats.indexed,
        output.as_ref().display(),
        stats.skipped
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::csv::RecordReader;

    fn collection(json: &str) -> FeatureCollection {
        serde_json::from_str(json).unwrap()
    }

    const TWO_SQUARES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"id":"A"},
         "geometry":{"type":"Polygon","coordinates":[[[-1,-1],[1,-1],[1,1],[-1,1],[-1,-1]]]}},
        {"type":"Feature","properties":{"name":"no id"},
         "geometry":{"type":"Polygon","coordinates":[[[10,10],[11,10],[11,11],[10,11],[10,10]]]}},
        {"type":"Feature","properties":{"id":"line"},
         "geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}},
        {"type":"Feature","properties":{"id":"B"},
         "geometry":{"type":"MultiPolygon","coordinates":[
            [[[20,20],[21,20],[21,21],[20,21],[20,20]]],
            [[[30,30],[31,30],[31,31],[30,31],[30,30]]]]}}
    ]}"#;

    fn config() -> IndexConfig {
        IndexConfig::default().with_precision(1, 3)
    }

    #[test]
    fn test_write_collection_skips_bad_features() {
        let mut writer = IndexWriter::new(Vec::new(), config()).unwrap();
        let stats = writer.write_collection(&collection(TWO_SQUARES)).unwrap();
        assert_eq!(stats.indexed, 2);
        assert_eq!(stats.skipped, 2);

        let bytes = writer.finish().unwrap();
        let records: Vec<IndexRecord> = RecordReader::new(bytes.as_slice())
            .into_records()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 4 + stats.records);
        assert_eq!(records[0], IndexRecord::new("GEOHASH", "ID"));
        assert_eq!(records[1], IndexRecord::new("min", "1"));
        assert_eq!(records[2], IndexRecord::new("max", "3"));
        assert_eq!(records[3], IndexRecord::new("dummy", "-1"));
        assert!(records.iter().any(|r| r.value == "A"));
        assert!(records.iter().any(|r| r.value == "B"));
    }

    #[test]
    fn test_multipolygon_members_share_id() {
        let features = collection(TWO_SQUARES).features;
        let writer = IndexWriter::new(Vec::new(), config()).unwrap();
        let records = writer.index_feature(&features[3]).unwrap();

        let matched: Vec<&str> = records
            .iter()
            .filter(|r| !r.is_sentinel())
            .map(|r| r.cell.as_str())
            .collect();
        assert!(matched.iter().any(|cell| cell.starts_with('s')));
        assert!(records.iter().filter(|r| !r.is_sentinel()).all(|r| r.value == "B"));

        let mut cells: Vec<&str> = records.iter().map(|r| r.cell.as_str()).collect();
        let before = cells.len();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), before);
    }

    #[test]
    fn test_degenerate_member_skipped_alone() {
        let features = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"id":"M"},
                 "geometry":{"type":"MultiPolygon","coordinates":[
                    [[[-1,-1],[1,-1],[1,1],[-1,1],[-1,-1]]],
                    [[[20,20],[25,20],[30,20],[20,20]]]]}},
                {"type":"Feature","properties":{"id":"FLAT"},
                 "geometry":{"type":"MultiPolygon","coordinates":[
                    [[[20,20],[25,20],[30,20],[20,20]]]]}}
            ]}"#,
        );

        let mut writer = IndexWriter::new(Vec::new(), config()).unwrap();
        let stats = writer.write_collection(&features).unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.skipped, 1);
        assert!(stats.records > 0);

        let records = writer.index_feature(&features.features[0]).unwrap();
        assert!(records.iter().any(|r| r.value == "M"));
        assert!(records.iter().all(|r| r.cell.starts_with(['7', 'e', 'k', 's'])));
        assert!(matches!(
            writer.index_feature(&features.features[1]),
            Err(GeohashTreeError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_batch_size_does_not_change_output() {
        let run = |batch_size| {
            let mut writer =
                IndexWriter::new(Vec::new(), config().with_batch_size(batch_size)).unwrap();
            writer.write_collection(&collection(TWO_SQUARES)).unwrap();
            writer.finish().unwrap()
        };
        assert_eq!(run(1), run(3));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            IndexWriter::new(Vec::new(), config().with_batch_size(0)),
            Err(GeohashTreeError::Config(_))
        ));
    }

    #[test]
    fn test_custom_id_field() {
        let features = collection(TWO_SQUARES).features;
        let writer = IndexWriter::new(Vec::new(), config().with_id_field("name")).unwrap();
        let records = writer.index_feature(&features[1]).unwrap();
        assert!(records.iter().any(|r| r.value == "no id"));
        assert!(writer.index_feature(&features[0]).is_err());
    }
}
