// GeoJSON map adapter - writes the track for any web map to pick up
use crate::application::collaborators::MapAdapter;
use crate::domain::trajectory::{BoundingRegion, Trajectory};
use anyhow::Context;
use chrono::SecondsFormat;
use serde_json::{Value, json};
use std::path::PathBuf;

pub struct GeoJsonMapAdapter {
    path: PathBuf,
}

impl GeoJsonMapAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// One LineString in point order, then one Point per sample carrying its
/// backend index and ISO time. The bounding region rides along as `bbox`.
pub fn trajectory_feature_collection(trajectory: &Trajectory) -> Value {
    let coordinates: Vec<[f64; 2]> = trajectory.points().iter().map(|p| [p.lng, p.lat]).collect();

    let mut features = vec![json!({
        "type": "Feature",
        "properties": { "kind": "trajectory" },
        "geometry": { "type": "LineString", "coordinates": coordinates }
    })];
    features.extend(trajectory.points().iter().map(|p| {
        json!({
            "type": "Feature",
            "properties": {
                "index": p.index,
                "time": p.time.to_rfc3339_opts(SecondsFormat::Millis, true)
            },
            "geometry": { "type": "Point", "coordinates": [p.lng, p.lat] }
        })
    }));

    let mut collection = json!({ "type": "FeatureCollection", "features": features });
    if let Some(BoundingRegion {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }) = trajectory.bounds()
    {
        collection["bbox"] = json!([min_lng, min_lat, max_lng, max_lat]);
    }
    collection
}

impl MapAdapter for GeoJsonMapAdapter {
    fn draw_trajectory(&mut self, trajectory: &Trajectory) -> anyhow::Result<()> {
        if trajectory.is_empty() {
            tracing::warn!("Trajectory is empty, nothing to draw");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let collection = trajectory_feature_collection(trajectory);
        std::fs::write(&self.path, serde_json::to_vec_pretty(&collection)?)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        if let Some(bounds) = trajectory.bounds() {
            tracing::info!(
                "Trajectory written to {} (viewport lat {:.4}..{:.4}, lng {:.4}..{:.4})",
                self.path.display(),
                bounds.min_lat,
                bounds.max_lat,
                bounds.min_lng,
                bounds.max_lng
            );
        }
        Ok(())
    }
}
