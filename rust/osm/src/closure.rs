// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relation keep closure.
//!
//! Extends the pruning decision so that kept entities never orphan the
//! relations that reference them, and water relations pull in their
//! members transitively. The closure only ever adds "keep" marks, never
//! removes one.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::graph::{MemberType, OsmGraph, FLAG_LINEAR_WATERWAY};
use crate::prune::PruneDecision;

/// Final keep marks consumed by the serializer.
pub struct KeepSet {
    pub keep_node: Vec<bool>,
    pub keep_way: Vec<bool>,
    /// Relation ids to emit. May contain ids with no backing relation in
    /// the document (unknown nested members); those are never emitted.
    pub keep_relation: FxHashSet<i64>,
}

/// Apply relation-driven keep logic on top of the pruning decision.
pub fn apply_relation_closure(graph: &OsmGraph, decision: PruneDecision) -> KeepSet {
    let mut keep_way = decision.keep_way;
    let mut keep_relation: FxHashSet<i64> = FxHashSet::default();
    let mut water_closure: FxHashSet<i64> = FxHashSet::default();
    let mut keep_node_from_relations = vec![false; graph.node_count()];

    // Seed: water-tagged relations, plus any relation with a way member
    // that survived road pruning.
    for rel_ix in 0..graph.relation_count() {
        let rel_id = graph.relation_ids[rel_ix];
        if graph.relation_is_water[rel_ix] {
            keep_relation.insert(rel_id);
            water_closure.insert(rel_id);
        }

        for member in &graph.relation_members[rel_ix] {
            if member.member_type != MemberType::Way {
                continue;
            }
            let Some(way_ix) = graph.way_ix(member.ref_id) else {
                continue;
            };
            if decision.kept_road_way[way_ix as usize] {
                keep_relation.insert(rel_id);
                break;
            }
        }
    }

    // BFS over the water closure. Node members are kept; way members are
    // force-kept unless they are linear waterways; nested relations join
    // the closure.
    let mut queue: Vec<i64> = water_closure.iter().copied().collect();
    let mut qi = 0;
    while qi < queue.len() {
        let rel_id = queue[qi];
        qi += 1;
        let Some(rel_ix) = graph.relation_ix(rel_id) else {
            continue;
        };

        for member in &graph.relation_members[rel_ix as usize] {
            match member.member_type {
                MemberType::Node => {
                    if let Some(node_ix) = graph.node_ix(member.ref_id) {
                        keep_node_from_relations[node_ix as usize] = true;
                    }
                }
                MemberType::Way => {
                    if let Some(way_ix) = graph.way_ix(member.ref_id) {
                        let linear =
                            graph.way_flags[way_ix as usize] & FLAG_LINEAR_WATERWAY != 0;
                        if !linear {
                            keep_way[way_ix as usize] = true;
                        }
                    }
                }
                MemberType::Relation => {
                    if water_closure.insert(member.ref_id) {
                        keep_relation.insert(member.ref_id);
                        queue.push(member.ref_id);
                    }
                }
            }
        }
    }

    // Every kept relation, water or not, keeps its direct node members.
    // Deliberately node-granular: way and nested-relation members of
    // non-water kept relations are not recursed into.
    for &rel_id in &keep_relation {
        let Some(rel_ix) = graph.relation_ix(rel_id) else {
            continue;
        };
        for member in &graph.relation_members[rel_ix as usize] {
            if member.member_type == MemberType::Node {
                if let Some(node_ix) = graph.node_ix(member.ref_id) {
                    keep_node_from_relations[node_ix as usize] = true;
                }
            }
        }
    }

    // Final node mask: relation-kept union referenced-by-kept-way.
    let mut keep_node = keep_node_from_relations;
    for way_ix in 0..graph.way_count() {
        if !keep_way[way_ix] {
            continue;
        }
        for &node_ix in graph.way_refs(way_ix as u32) {
            keep_node[node_ix as usize] = true;
        }
    }

    debug!(
        relations = keep_relation.len(),
        ways = keep_way.iter().filter(|k| **k).count(),
        nodes = keep_node.iter().filter(|k| **k).count(),
        "relation closure complete"
    );

    KeepSet {
        keep_node,
        keep_way,
        keep_relation,
    }
}
