// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compact, index-based graph model built in two passes.
//!
//! Pass 1 walks the token stream and collects ways and relations into
//! columnar side tables, interning every referenced node id into a dense
//! 0-based index. Pass 2 walks the stream again and loads coordinates and
//! tags only for interned node ids, so memory stays proportional to
//! referenced data rather than document size.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use tactile_prep_markup::{tokenize_chunks, tokenize_file, MarkupToken};

use crate::error::Result;
use crate::rank::adjusted_road_rank;
use crate::tags::{TagList, TagView};

/// Way flag: has a non-empty `highway` tag and is not a linear waterway.
pub const FLAG_ROAD: u8 = 1;
/// Way flag: water area (natural=water, water=*, reservoir, riverbank).
pub const FLAG_WATER_AREA: u8 = 2;
/// Way flag: linear waterway (stream, river, ...).
pub const FLAG_LINEAR_WATERWAY: u8 = 4;

/// Relation member target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

impl MemberType {
    /// Parse the `type` attribute; unrecognized strings yield `None` and
    /// the member is skipped.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "node" => Some(MemberType::Node),
            "way" => Some(MemberType::Way),
            "relation" => Some(MemberType::Relation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Node => "node",
            MemberType::Way => "way",
            MemberType::Relation => "relation",
        }
    }
}

/// One relation member in document order.
#[derive(Debug, Clone)]
pub struct Member {
    pub member_type: MemberType,
    pub ref_id: i64,
    pub role: String,
}

/// In-memory OSM graph with columnar storage keyed by dense indices.
#[derive(Default)]
pub struct OsmGraph {
    /// Attributes of the root `osm` element, first occurrence wins.
    pub root_attrs: Option<Vec<(String, String)>>,

    node_id_to_ix: FxHashMap<i64, u32>,
    pub node_ids: Vec<i64>,
    pub node_lat: Vec<f64>,
    pub node_lon: Vec<f64>,
    pub node_has_coord: Vec<bool>,
    pub node_tags: Vec<TagList>,

    way_id_to_ix: FxHashMap<i64, u32>,
    pub way_ids: Vec<i64>,
    pub way_flags: Vec<u8>,
    pub way_rank: Vec<u8>,
    pub way_ref_start: Vec<u32>,
    pub way_ref_len: Vec<u32>,
    pub way_tags: Vec<TagList>,
    /// Flat arena of node indices; each way owns the
    /// `[way_ref_start, way_ref_start + way_ref_len)` slice.
    pub way_node_refs: Vec<u32>,

    relation_id_to_ix: FxHashMap<i64, u32>,
    pub relation_ids: Vec<i64>,
    pub relation_is_water: Vec<bool>,
    pub relation_tags: Vec<TagList>,
    pub relation_members: Vec<Vec<Member>>,
}

impl OsmGraph {
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn way_count(&self) -> usize {
        self.way_ids.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relation_ids.len()
    }

    /// Dense index for a node id, interning it on first sight.
    pub fn intern_node(&mut self, id: i64) -> u32 {
        if let Some(&ix) = self.node_id_to_ix.get(&id) {
            return ix;
        }
        let ix = self.node_ids.len() as u32;
        self.node_id_to_ix.insert(id, ix);
        self.node_ids.push(id);
        ix
    }

    pub fn node_ix(&self, id: i64) -> Option<u32> {
        self.node_id_to_ix.get(&id).copied()
    }

    pub fn way_ix(&self, id: i64) -> Option<u32> {
        self.way_id_to_ix.get(&id).copied()
    }

    pub fn relation_ix(&self, id: i64) -> Option<u32> {
        self.relation_id_to_ix.get(&id).copied()
    }

    /// Node-index slice referenced by a way.
    pub fn way_refs(&self, way_ix: u32) -> &[u32] {
        let start = self.way_ref_start[way_ix as usize] as usize;
        let len = self.way_ref_len[way_ix as usize] as usize;
        &self.way_node_refs[start..start + len]
    }

    /// Build the graph from a file with two streaming passes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = GraphBuilder::default();
        tokenize_file(path, &mut |token| builder.first_pass(&token))?;
        let mut graph = builder.into_graph();
        debug!(
            nodes = graph.node_count(),
            ways = graph.way_count(),
            relations = graph.relation_count(),
            "first pass complete"
        );

        let mut loader = CoordinateLoader::new(&mut graph);
        tokenize_file(path, &mut |token| loader.second_pass(&token))?;
        Ok(graph)
    }

    /// Build the graph from in-memory chunks (two passes over the same
    /// chunk sequence).
    pub fn from_chunks(chunks: &[&str]) -> Result<Self> {
        let mut builder = GraphBuilder::default();
        tokenize_chunks(chunks, &mut |token| builder.first_pass(&token))?;
        let mut graph = builder.into_graph();

        let mut loader = CoordinateLoader::new(&mut graph);
        tokenize_chunks(chunks, &mut |token| loader.second_pass(&token))?;
        Ok(graph)
    }
}

/// Parse an id attribute. Non-integer ids make the element unusable and
/// are skipped rather than failing the run.
fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

fn collect_tag(token: &MarkupToken, tags: &mut TagList) {
    if let (Some(k), Some(v)) = (token.attr("k"), token.attr("v")) {
        tags.push((k.to_string(), v.to_string()));
    }
}

struct WayAccum {
    id: i64,
    tags: TagList,
    ref_start: u32,
    ref_len: u32,
}

struct RelationAccum {
    id: i64,
    tags: TagList,
    members: Vec<Member>,
}

/// Explicit parser state: what element the first pass is accumulating.
enum Accum {
    Idle,
    Way(WayAccum),
    Relation(RelationAccum),
}

/// First-pass builder: ways, relations, node interning.
pub struct GraphBuilder {
    graph: OsmGraph,
    state: Accum,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            graph: OsmGraph::default(),
            state: Accum::Idle,
        }
    }
}

impl GraphBuilder {
    /// Feed one token of the first pass.
    pub fn first_pass(&mut self, token: &MarkupToken) {
        if token.name == "osm" && !token.is_closing && self.graph.root_attrs.is_none() {
            self.graph.root_attrs = Some(token.attrs.clone());
        }

        match &mut self.state {
            Accum::Way(way) => {
                if !token.is_closing && token.name == "nd" {
                    if let Some(node_id) = parse_id(token.attr("ref")) {
                        let node_ix = self.graph.intern_node(node_id);
                        self.graph.way_node_refs.push(node_ix);
                        way.ref_len += 1;
                    }
                } else if !token.is_closing && token.name == "tag" {
                    collect_tag(token, &mut way.tags);
                }
                if token.name == "way" && (token.is_closing || token.is_self_closing) {
                    self.finalize_way();
                }
            }
            Accum::Relation(relation) => {
                if !token.is_closing && token.name == "member" {
                    let member_type = token.attr("type").and_then(MemberType::from_attr);
                    let ref_id = parse_id(token.attr("ref"));
                    if let (Some(member_type), Some(ref_id)) = (member_type, ref_id) {
                        if member_type == MemberType::Node {
                            self.graph.intern_node(ref_id);
                        }
                        relation.members.push(Member {
                            member_type,
                            ref_id,
                            role: token.attr("role").unwrap_or("").to_string(),
                        });
                    }
                } else if !token.is_closing && token.name == "tag" {
                    collect_tag(token, &mut relation.tags);
                }
                if token.name == "relation" && (token.is_closing || token.is_self_closing) {
                    self.finalize_relation();
                }
            }
            Accum::Idle => {
                if !token.is_closing && token.name == "way" {
                    if let Some(id) = parse_id(token.attr("id")) {
                        self.state = Accum::Way(WayAccum {
                            id,
                            tags: TagList::new(),
                            ref_start: self.graph.way_node_refs.len() as u32,
                            ref_len: 0,
                        });
                        // A self-closing way takes the same finalization
                        // path as an explicit open+close pair.
                        if token.is_self_closing {
                            self.finalize_way();
                        }
                    }
                } else if !token.is_closing && token.name == "relation" {
                    if let Some(id) = parse_id(token.attr("id")) {
                        self.state = Accum::Relation(RelationAccum {
                            id,
                            tags: TagList::new(),
                            members: Vec::new(),
                        });
                        if token.is_self_closing {
                            self.finalize_relation();
                        }
                    }
                }
            }
        }
    }

    fn finalize_way(&mut self) {
        let Accum::Way(way) = std::mem::replace(&mut self.state, Accum::Idle) else {
            return;
        };

        let view = TagView::new(&way.tags);
        let linear_waterway = view.is_linear_waterway();
        let is_road = view.get("highway").is_some_and(|v| !v.is_empty()) && !linear_waterway;

        let mut flags = 0u8;
        let mut rank = 0u8;
        if linear_waterway {
            flags |= FLAG_LINEAR_WATERWAY;
        }
        if is_road {
            flags |= FLAG_ROAD;
            rank = adjusted_road_rank(&view);
        }
        if view.is_water_area() {
            flags |= FLAG_WATER_AREA;
        }

        let way_ix = self.graph.way_ids.len() as u32;
        self.graph.way_id_to_ix.insert(way.id, way_ix);
        self.graph.way_ids.push(way.id);
        self.graph.way_flags.push(flags);
        self.graph.way_rank.push(rank);
        self.graph.way_ref_start.push(way.ref_start);
        self.graph.way_ref_len.push(way.ref_len);
        self.graph.way_tags.push(way.tags);
    }

    fn finalize_relation(&mut self) {
        let Accum::Relation(relation) = std::mem::replace(&mut self.state, Accum::Idle) else {
            return;
        };

        let view = TagView::new(&relation.tags);
        let rel_ix = self.graph.relation_ids.len() as u32;
        self.graph.relation_id_to_ix.insert(relation.id, rel_ix);
        self.graph.relation_ids.push(relation.id);
        self.graph.relation_is_water.push(view.is_water_area());
        self.graph.relation_tags.push(relation.tags);
        self.graph.relation_members.push(relation.members);
    }

    /// Finish pass 1, sizing the node-side tables for pass 2.
    pub fn into_graph(self) -> OsmGraph {
        let mut graph = self.graph;
        let node_count = graph.node_ids.len();
        graph.node_lat = vec![0.0; node_count];
        graph.node_lon = vec![0.0; node_count];
        graph.node_has_coord = vec![false; node_count];
        graph.node_tags = vec![TagList::new(); node_count];
        graph
    }
}

struct NodeAccum {
    ix: Option<u32>,
    tags: TagList,
}

/// Second-pass loader: coordinates and tags for interned nodes only.
pub struct CoordinateLoader<'g> {
    graph: &'g mut OsmGraph,
    current: Option<NodeAccum>,
}

impl<'g> CoordinateLoader<'g> {
    pub fn new(graph: &'g mut OsmGraph) -> Self {
        Self {
            graph,
            current: None,
        }
    }

    /// Feed one token of the second pass.
    pub fn second_pass(&mut self, token: &MarkupToken) {
        if let Some(node) = &mut self.current {
            if !token.is_closing && token.name == "tag" && node.ix.is_some() {
                collect_tag(token, &mut node.tags);
            }
            if token.name == "node" && (token.is_closing || token.is_self_closing) {
                let node = self.current.take().unwrap_or(NodeAccum {
                    ix: None,
                    tags: TagList::new(),
                });
                if let Some(ix) = node.ix {
                    if !node.tags.is_empty() {
                        self.graph.node_tags[ix as usize] = node.tags;
                    }
                }
            }
            return;
        }

        if !token.is_closing && token.name == "node" {
            let mut ix = None;
            if let Some(node_id) = parse_id(token.attr("id")) {
                if let Some(got) = self.graph.node_ix(node_id) {
                    ix = Some(got);
                    let lat = token.attr("lat").and_then(|v| v.parse::<f64>().ok());
                    let lon = token.attr("lon").and_then(|v| v.parse::<f64>().ok());
                    if let (Some(lat), Some(lon)) = (lat, lon) {
                        if lat.is_finite() && lon.is_finite() {
                            self.graph.node_lat[got as usize] = lat;
                            self.graph.node_lon[got as usize] = lon;
                            self.graph.node_has_coord[got as usize] = true;
                        }
                    }
                }
            }

            if !token.is_self_closing {
                self.current = Some(NodeAccum {
                    ix,
                    tags: TagList::new(),
                });
            }
        }
    }
}
