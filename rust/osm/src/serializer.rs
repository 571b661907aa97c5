// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pruned-graph serializer.
//!
//! Streams a well-formed XML document containing only kept nodes, ways
//! and relations. When the destination equals the source, output goes to
//! a temporary path and is renamed into place on success.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use tactile_prep_markup::escape_attr;

use crate::closure::KeepSet;
use crate::error::Result;
use crate::geo::GeoBounds;
use crate::graph::OsmGraph;

/// Generator attribute written when the source document carried none.
const DEFAULT_GENERATOR: &str = "tactile-prep-prune";
/// API version attribute written when the source document carried none.
const DEFAULT_VERSION: &str = "0.6";

/// Root attributes to emit: the original ones, with `version` and
/// `generator` appended if missing.
fn effective_root_attrs(graph: &OsmGraph) -> Vec<(String, String)> {
    let mut attrs = graph.root_attrs.clone().unwrap_or_default();
    if !attrs.iter().any(|(k, _)| k == "version") {
        attrs.push(("version".to_string(), DEFAULT_VERSION.to_string()));
    }
    if !attrs.iter().any(|(k, _)| k == "generator") {
        attrs.push(("generator".to_string(), DEFAULT_GENERATOR.to_string()));
    }
    attrs
}

/// Write the pruned document to any sink.
pub fn write_pruned<W: Write>(
    graph: &OsmGraph,
    keep: &KeepSet,
    bounds: &GeoBounds,
    out: &mut W,
) -> Result<()> {
    out.write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;

    out.write_all(b"<osm")?;
    for (key, value) in effective_root_attrs(graph) {
        write!(out, " {}=\"{}\"", key, escape_attr(&value))?;
    }
    out.write_all(b">\n")?;

    writeln!(
        out,
        "  <bounds minlat=\"{}\" minlon=\"{}\" maxlat=\"{}\" maxlon=\"{}\"/>",
        bounds.lat_min, bounds.lon_min, bounds.lat_max, bounds.lon_max
    )?;

    for node_ix in 0..graph.node_count() {
        // Interned-but-coordinate-less nodes are never emitted.
        if !keep.keep_node[node_ix] || !graph.node_has_coord[node_ix] {
            continue;
        }
        write_node(graph, node_ix, out)?;
    }

    for way_ix in 0..graph.way_count() {
        if !keep.keep_way[way_ix] {
            continue;
        }
        write_way(graph, way_ix, out)?;
    }

    for rel_ix in 0..graph.relation_count() {
        if !keep.keep_relation.contains(&graph.relation_ids[rel_ix]) {
            continue;
        }
        write_relation(graph, rel_ix, out)?;
    }

    out.write_all(b"</osm>\n")?;
    Ok(())
}

fn write_tag<W: Write>(out: &mut W, indent: &str, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(
        out,
        "{}<tag k=\"{}\" v=\"{}\"/>",
        indent,
        escape_attr(key),
        escape_attr(value)
    )
}

fn write_node<W: Write>(graph: &OsmGraph, node_ix: usize, out: &mut W) -> std::io::Result<()> {
    let id = graph.node_ids[node_ix];
    let lat = graph.node_lat[node_ix];
    let lon = graph.node_lon[node_ix];
    let tags = &graph.node_tags[node_ix];

    if tags.is_empty() {
        return writeln!(out, "  <node id=\"{}\" lat=\"{}\" lon=\"{}\"/>", id, lat, lon);
    }
    writeln!(out, "  <node id=\"{}\" lat=\"{}\" lon=\"{}\">", id, lat, lon)?;
    for (key, value) in tags {
        write_tag(out, "    ", key, value)?;
    }
    writeln!(out, "  </node>")
}

fn write_way<W: Write>(graph: &OsmGraph, way_ix: usize, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "  <way id=\"{}\">", graph.way_ids[way_ix])?;
    for &node_ix in graph.way_refs(way_ix as u32) {
        writeln!(out, "    <nd ref=\"{}\"/>", graph.node_ids[node_ix as usize])?;
    }
    for (key, value) in &graph.way_tags[way_ix] {
        write_tag(out, "    ", key, value)?;
    }
    writeln!(out, "  </way>")
}

fn write_relation<W: Write>(graph: &OsmGraph, rel_ix: usize, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "  <relation id=\"{}\">", graph.relation_ids[rel_ix])?;
    for member in &graph.relation_members[rel_ix] {
        writeln!(
            out,
            "    <member type=\"{}\" ref=\"{}\" role=\"{}\"/>",
            member.member_type.as_str(),
            member.ref_id,
            escape_attr(&member.role)
        )?;
    }
    for (key, value) in &graph.relation_tags[rel_ix] {
        write_tag(out, "    ", key, value)?;
    }
    writeln!(out, "  </relation>")
}

/// Write the pruned document to `dest`. When `dest` equals `source`, the
/// document is staged at `<dest>.pruned.tmp` and atomically renamed.
pub fn write_pruned_to_path(
    graph: &OsmGraph,
    keep: &KeepSet,
    bounds: &GeoBounds,
    source: &Path,
    dest: &Path,
) -> Result<()> {
    let in_place = dest == source;
    let staged;
    let write_path: &Path = if in_place {
        let mut tmp = dest.as_os_str().to_owned();
        tmp.push(".pruned.tmp");
        staged = std::path::PathBuf::from(tmp);
        &staged
    } else {
        dest
    };

    let file = File::create(write_path)?;
    let mut out = BufWriter::new(file);
    write_pruned(graph, keep, bounds, &mut out)?;
    out.flush()?;
    drop(out);

    if in_place {
        fs::rename(write_path, dest)?;
    }
    info!(path = %dest.display(), "pruned document written");
    Ok(())
}
