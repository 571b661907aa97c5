// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tactile-Prep OSM Pruning
//!
//! Compact graph model and density-budgeted road pruning for OSM XML
//! extracts. The pipeline is:
//!
//! 1. Two-pass graph build ([`OsmGraph::from_file`]): pass 1 indexes ways
//!    and relations and interns referenced node ids; pass 2 loads
//!    coordinates for interned nodes only.
//! 2. Pruning decision ([`decide_pruning`]): per-rank road length versus
//!    the density target over the bounded area; whole rank buckets are
//!    removed from least important upward.
//! 3. Relation closure ([`apply_relation_closure`]): kept entities never
//!    orphan relations, water relations pull in members transitively.
//! 4. Serialization ([`write_pruned_to_path`]): streaming re-emission of
//!    the kept subgraph, atomic rename for in-place output.

pub mod closure;
pub mod error;
pub mod geo;
pub mod graph;
pub mod prune;
pub mod rank;
pub mod serializer;
pub mod tags;

pub use closure::{apply_relation_closure, KeepSet};
pub use error::{Error, Result};
pub use geo::{effective_area_m2, haversine_m, GeoBounds};
pub use graph::{
    Member, MemberType, OsmGraph, FLAG_LINEAR_WATERWAY, FLAG_ROAD, FLAG_WATER_AREA,
};
pub use prune::{decide_pruning, derive_removed_rank_buckets, way_length_m, PruneDecision};
pub use rank::{adjusted_road_rank, RANK_BUCKETS};
pub use serializer::{write_pruned, write_pruned_to_path};
pub use tags::{TagList, TagView};
