// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle classification, clipping and bucket accumulation.
//!
//! Walks parsed triangles in document order, drops degenerates, clips
//! the rest against the rectangle and re-fans the clipped polygon.
//! Sub-triangles whose signed area flipped relative to the pre-clip
//! triangle get their last two corners swapped to restore winding.

use nalgebra::Point2;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::classify::{classify_object, Group};
use crate::clip::{clip_triangle, signed_area2, ClipRect};
use crate::obj::ObjMesh;

/// Document-wide counters for the preparation run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrepareStats {
    /// Distinct source objects that contributed at least one face.
    pub objects_seen: u64,
    /// Distinct source objects discarded by classification.
    pub objects_skipped: u64,
    pub input_triangles: u64,
    pub clipped_triangles: u64,
    pub dropped_triangles: u64,
    pub dropped_degenerate: u64,
}

/// One output partition of clipped triangles.
#[derive(Debug)]
pub struct TriangleBucket {
    pub group: Group,
    /// Name and ordinal of the first contributing source object.
    pub source_name: String,
    pub source_ordinal: u32,
    pub triangles: Vec<[Point2<f64>; 3]>,
    pub input_triangles: u64,
    pub clipped_triangles: u64,
    pub dropped_degenerate: u64,
}

impl TriangleBucket {
    fn new(group: Group, source_name: &str, source_ordinal: u32) -> Self {
        TriangleBucket {
            group,
            source_name: source_name.to_string(),
            source_ordinal,
            triangles: Vec::new(),
            input_triangles: 0,
            clipped_triangles: 0,
            dropped_degenerate: 0,
        }
    }
}

/// Classify and clip every triangle of the mesh. Buckets come back in
/// emission order: fixed group order, water areas by source ordinal.
/// Buckets that ended up with no surviving triangles are not returned.
pub fn classify_and_clip(mesh: &ObjMesh, rect: &ClipRect) -> (Vec<TriangleBucket>, PrepareStats) {
    let extent = rect.extent();
    let eps = 1e-9 * extent;
    let area_eps = 1e-12 * extent * extent;

    let mut stats = PrepareStats::default();
    let mut buckets: Vec<TriangleBucket> = Vec::new();
    // Non-water groups share one bucket; each water body gets its own.
    let mut bucket_index: FxHashMap<(Group, u32), usize> = FxHashMap::default();
    let mut seen_objects: FxHashSet<u32> = FxHashSet::default();
    let mut skipped_objects: FxHashSet<u32> = FxHashSet::default();

    for tri in &mesh.triangles {
        stats.input_triangles += 1;

        let name = mesh.object_name(tri.object_ordinal);
        if seen_objects.insert(tri.object_ordinal) {
            stats.objects_seen += 1;
        }

        let Some(group) = classify_object(name) else {
            stats.dropped_triangles += 1;
            if skipped_objects.insert(tri.object_ordinal) {
                stats.objects_skipped += 1;
            }
            continue;
        };

        let v0 = mesh.vertices[tri.indices[0] as usize];
        let v1 = mesh.vertices[tri.indices[1] as usize];
        let v2 = mesh.vertices[tri.indices[2] as usize];

        let orig_area2 = signed_area2(v0, v1, v2);
        if orig_area2.abs() <= area_eps {
            stats.dropped_triangles += 1;
            stats.dropped_degenerate += 1;
            continue;
        }

        let clipped = clip_triangle([v0, v1, v2], rect, eps);
        if clipped.len() < 3 {
            stats.dropped_triangles += 1;
            continue;
        }

        let bucket_ordinal = if group == Group::WaterAreas {
            tri.object_ordinal
        } else {
            0
        };
        let bucket_ix = *bucket_index
            .entry((group, bucket_ordinal))
            .or_insert_with(|| {
                buckets.push(TriangleBucket::new(group, name, tri.object_ordinal));
                buckets.len() - 1
            });
        let bucket = &mut buckets[bucket_ix];
        bucket.input_triangles += 1;

        for j in 1..clipped.len() - 1 {
            let a = clipped[0];
            let b = clipped[j];
            let c = clipped[j + 1];
            let area2 = signed_area2(a, b, c);
            if area2.abs() <= area_eps {
                stats.dropped_triangles += 1;
                stats.dropped_degenerate += 1;
                bucket.dropped_degenerate += 1;
                continue;
            }
            if area2 * orig_area2 < 0.0 {
                bucket.triangles.push([a, c, b]);
            } else {
                bucket.triangles.push([a, b, c]);
            }
            stats.clipped_triangles += 1;
            bucket.clipped_triangles += 1;
        }
    }

    buckets.retain(|b| !b.triangles.is_empty());
    buckets.sort_by_key(|b| (b.group.order_index(), b.source_ordinal));

    debug!(
        buckets = buckets.len(),
        input = stats.input_triangles,
        clipped = stats.clipped_triangles,
        dropped = stats.dropped_triangles,
        "classify and clip complete"
    );
    (buckets, stats)
}
