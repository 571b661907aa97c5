// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine-readable run reports.
//!
//! Field names are camelCase to stay stable for downstream print-layer
//! tooling that already consumes these reports.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use tactile_prep_osm::RANK_BUCKETS;

/// Rectangle as it appears in reports.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectReport {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClipTimings {
    pub parse_seconds: f64,
    pub clip_seconds: f64,
    pub dedupe_write_seconds: f64,
    pub total_seconds: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct ObjectStats {
    pub seen: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TriangleStats {
    pub input: u64,
    pub clipped_output: u64,
    pub dropped: u64,
    pub dropped_degenerate: u64,
}

/// Per-file entry of a clip run, in emission order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub group: String,
    pub path: String,
    pub input_triangles: u64,
    pub clipped_triangles: u64,
    pub dropped_degenerate: u64,
    pub dropped_collapsed: u64,
    pub vertices_before_dedupe: u64,
    pub vertices_after_dedupe: u64,
    pub written_faces: u64,
}

/// Summary of one mesh clip run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipReport {
    pub input_obj_path: String,
    pub out_dir: String,
    pub tmp_out_dir: String,
    pub bounds: RectReport,
    pub quantization: f64,
    pub eps: f64,
    pub area_eps: f64,
    pub timings: ClipTimings,
    pub objects: ObjectStats,
    pub triangles: TriangleStats,
    pub files: Vec<FileEntry>,
}

impl ClipReport {
    /// Write the pretty-printed report with a trailing newline.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Summary of one OSM pruning run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneReport {
    pub input_path: String,
    pub output_path: String,
    pub bounds: RectReport,
    pub target_density_km_per_km2: f64,
    pub area_m2: f64,
    pub target_m: f64,
    pub length_by_rank_m: [f64; RANK_BUCKETS],
    pub removed_ranks: [bool; RANK_BUCKETS],
    pub kept_nodes: u64,
    pub kept_ways: u64,
    pub kept_relations: u64,
    pub total_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_report_uses_camel_case_keys() {
        let report = ClipReport {
            input_obj_path: "in.obj".into(),
            out_dir: "out".into(),
            tmp_out_dir: "out/tmp".into(),
            bounds: RectReport {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1.0,
                max_y: 1.0,
            },
            quantization: 1e6,
            eps: 1e-9,
            area_eps: 1e-12,
            timings: ClipTimings::default(),
            objects: ObjectStats { seen: 2, skipped: 1 },
            triangles: TriangleStats::default(),
            files: vec![FileEntry {
                group: "roads_car".into(),
                path: "out/tmp/map-clip-roads-car.ply".into(),
                input_triangles: 1,
                clipped_triangles: 1,
                dropped_degenerate: 0,
                dropped_collapsed: 0,
                vertices_before_dedupe: 3,
                vertices_after_dedupe: 3,
                written_faces: 1,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"inputObjPath\""));
        assert!(json.contains("\"tmpOutDir\""));
        assert!(json.contains("\"clippedOutput\""));
        assert!(json.contains("\"droppedCollapsed\""));
        assert!(json.contains("\"verticesBeforeDedupe\""));
        assert!(json.contains("\"minX\""));
    }

    #[test]
    fn prune_report_serializes_rank_arrays() {
        let report = PruneReport {
            input_path: "in.osm".into(),
            output_path: "out.osm".into(),
            bounds: RectReport {
                min_x: 24.9,
                min_y: 60.0,
                max_x: 24.91,
                max_y: 60.01,
            },
            target_density_km_per_km2: 120.0,
            area_m2: 618_000.0,
            target_m: 74_160.0,
            length_by_rank_m: [0.0; RANK_BUCKETS],
            removed_ranks: [false; RANK_BUCKETS],
            kept_nodes: 10,
            kept_ways: 2,
            kept_relations: 1,
            total_seconds: 0.5,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"lengthByRankM\""));
        assert!(json.contains("\"removedRanks\""));
        assert!(json.contains("\"targetDensityKmPerKm2\""));
    }
}
