// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Density-budgeted pruning decision.
//!
//! Road length is aggregated per rank bucket; whole buckets are removed
//! from least to most important until removing another would undershoot
//! the target. A bucket is never partially removed.

use tracing::info;

use crate::geo::{effective_area_m2, haversine_m, GeoBounds};
use crate::graph::{OsmGraph, FLAG_ROAD, FLAG_WATER_AREA};
use crate::rank::RANK_BUCKETS;

/// Outcome of the pruning decision over a graph.
pub struct PruneDecision {
    /// Way survives pruning (road kept by rank, or water area).
    pub keep_way: Vec<bool>,
    /// Way is a road that survived by rank (used for relation keep).
    pub kept_road_way: Vec<bool>,
    /// Rank buckets removed entirely.
    pub removed_ranks: [bool; RANK_BUCKETS],
    /// Total road meters per rank bucket.
    pub length_by_rank_m: [f64; RANK_BUCKETS],
    /// Bounded area in m².
    pub area_m2: f64,
    /// Target total road meters for the area.
    pub target_m: f64,
}

/// Sum of haversine distances between consecutive coordinate-bearing refs.
/// A ref without a coordinate breaks the chain rather than bridging it.
pub fn way_length_m(graph: &OsmGraph, way_ix: u32) -> f64 {
    let mut total = 0.0;
    let mut prev: Option<u32> = None;

    for &node_ix in graph.way_refs(way_ix) {
        if !graph.node_has_coord[node_ix as usize] {
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            total += haversine_m(
                graph.node_lat[p as usize],
                graph.node_lon[p as usize],
                graph.node_lat[node_ix as usize],
                graph.node_lon[node_ix as usize],
            );
        }
        prev = Some(node_ix);
    }
    total
}

/// Decide which rank buckets to drop. Starting from rank 0: stop once the
/// remaining total is within target; remove a bucket only when doing so
/// still leaves the remaining total at or above target.
pub fn derive_removed_rank_buckets(
    length_by_rank_m: &[f64; RANK_BUCKETS],
    area_m2: f64,
    target_density_km_per_km2: f64,
) -> [bool; RANK_BUCKETS] {
    let mut removed = [false; RANK_BUCKETS];
    if !(area_m2 > 0.0) {
        return removed;
    }

    let target_m = target_density_km_per_km2 * 1000.0 * (area_m2 / 1_000_000.0);
    let mut remaining_m: f64 = length_by_rank_m.iter().sum();

    for rank in 0..RANK_BUCKETS {
        if remaining_m <= target_m {
            break;
        }
        let bucket_m = length_by_rank_m[rank];
        if remaining_m - bucket_m >= target_m {
            removed[rank] = true;
            remaining_m -= bucket_m;
        } else {
            break;
        }
    }
    removed
}

/// Compute the full pruning decision for a graph and bounded area.
pub fn decide_pruning(
    graph: &OsmGraph,
    bounds: &GeoBounds,
    target_density_km_per_km2: f64,
) -> PruneDecision {
    let way_count = graph.way_count();
    let mut length_by_rank_m = [0.0f64; RANK_BUCKETS];

    for way_ix in 0..way_count as u32 {
        if graph.way_flags[way_ix as usize] & FLAG_ROAD == 0 {
            continue;
        }
        let rank = graph.way_rank[way_ix as usize] as usize;
        length_by_rank_m[rank] += way_length_m(graph, way_ix);
    }

    let area_m2 = effective_area_m2(bounds);
    let target_m = target_density_km_per_km2 * 1000.0 * (area_m2 / 1_000_000.0);
    let removed_ranks =
        derive_removed_rank_buckets(&length_by_rank_m, area_m2, target_density_km_per_km2);

    let mut keep_way = vec![false; way_count];
    let mut kept_road_way = vec![false; way_count];

    for way_ix in 0..way_count {
        let flags = graph.way_flags[way_ix];
        if flags & FLAG_ROAD != 0 {
            let rank = graph.way_rank[way_ix] as usize;
            if !removed_ranks[rank] {
                keep_way[way_ix] = true;
                kept_road_way[way_ix] = true;
            }
        }
        // Water areas are kept regardless of the rank outcome.
        if flags & FLAG_WATER_AREA != 0 {
            keep_way[way_ix] = true;
        }
    }

    info!(
        area_m2,
        target_m,
        removed = removed_ranks.iter().filter(|r| **r).count(),
        "pruning decision"
    );

    PruneDecision {
        keep_way,
        kept_road_way,
        removed_ranks,
        length_by_rank_m,
        area_m2,
        target_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_removal_never_undershoots() {
        // 50km at rank 0, 10km at rank 1, target 40km: removing rank 0
        // would leave 10km < 40km, so nothing is removed.
        let mut lengths = [0.0; RANK_BUCKETS];
        lengths[0] = 50_000.0;
        lengths[1] = 10_000.0;
        // 1 km² at density 40 km/km² -> target 40km.
        let removed = derive_removed_rank_buckets(&lengths, 1_000_000.0, 40.0);
        assert!(removed.iter().all(|r| !r));
    }

    #[test]
    fn bucket_removal_proceeds_from_low_ranks() {
        // 50 + 30 + 20 = 100km, target 40km: remove rank 0 (leaves 50),
        // remove rank 1 (leaves... 50-30=20 < 40) -> stop after rank 0.
        let mut lengths = [0.0; RANK_BUCKETS];
        lengths[0] = 50_000.0;
        lengths[1] = 30_000.0;
        lengths[2] = 20_000.0;
        let removed = derive_removed_rank_buckets(&lengths, 1_000_000.0, 40.0);
        assert!(removed[0]);
        assert!(!removed[1]);
        assert!(!removed[2]);
    }

    #[test]
    fn exact_boundary_bucket_is_removed() {
        // Removing rank 0 leaves exactly the target: removal allowed.
        let mut lengths = [0.0; RANK_BUCKETS];
        lengths[0] = 60_000.0;
        lengths[1] = 40_000.0;
        let removed = derive_removed_rank_buckets(&lengths, 1_000_000.0, 40.0);
        assert!(removed[0]);
        assert!(!removed[1]);
    }

    #[test]
    fn zero_area_removes_nothing() {
        let mut lengths = [0.0; RANK_BUCKETS];
        lengths[0] = 1_000.0;
        let removed = derive_removed_rank_buckets(&lengths, 0.0, 100.0);
        assert!(removed.iter().all(|r| !r));
    }

    #[test]
    fn under_target_removes_nothing() {
        let mut lengths = [0.0; RANK_BUCKETS];
        lengths[3] = 10_000.0;
        let removed = derive_removed_rank_buckets(&lengths, 1_000_000.0, 40.0);
        assert!(removed.iter().all(|r| !r));
    }
}
