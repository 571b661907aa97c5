// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangulated OBJ subset parser.
//!
//! Reads only `o`, `v` and `f` records. Vertices are projected onto the
//! 2D working plane as `(x, -z)`, matching the Blender export axis
//! convention (-Z forward, Y up). Faces with more than three corners are
//! fan-triangulated around their first vertex. Malformed records are
//! skipped, never fatal.

use std::path::Path;

use nalgebra::Point2;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::Result;

/// A triangle tied to the object record that was current when its face
/// was read.
#[derive(Debug, Clone, Copy)]
pub struct ObjTriangle {
    /// Index into [`ObjMesh::object_names`].
    pub object_ordinal: u32,
    /// Vertex indices into [`ObjMesh::vertices`].
    pub indices: [u32; 3],
}

/// Parsed 2D mesh: vertex plane positions plus triangles grouped by
/// source object.
#[derive(Debug, Default)]
pub struct ObjMesh {
    pub vertices: Vec<Point2<f64>>,
    pub triangles: Vec<ObjTriangle>,
    /// Object names by ordinal. Ordinal 0 is the implicit object active
    /// before any `o` record.
    pub object_names: Vec<String>,
}

impl ObjMesh {
    pub fn object_name(&self, ordinal: u32) -> &str {
        &self.object_names[ordinal as usize]
    }

    /// Parse OBJ text. Never fails: unusable records are dropped.
    pub fn parse(text: &str) -> ObjMesh {
        let mut mesh = ObjMesh {
            vertices: Vec::new(),
            triangles: Vec::new(),
            object_names: vec!["null".to_string()],
        };
        let mut current_ordinal = 0u32;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("o ") {
                let name = rest.trim();
                let name = if name.is_empty() { "unnamed" } else { name };
                mesh.object_names.push(name.to_string());
                current_ordinal = (mesh.object_names.len() - 1) as u32;
                continue;
            }

            if let Some(rest) = line.strip_prefix("v ") {
                if let Some(point) = parse_vertex(rest) {
                    mesh.vertices.push(point);
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("f ") {
                parse_face(rest, mesh.vertices.len(), |corners| {
                    for i in 1..corners.len() - 1 {
                        mesh.triangles.push(ObjTriangle {
                            object_ordinal: current_ordinal,
                            indices: [corners[0], corners[i], corners[i + 1]],
                        });
                    }
                });
            }
        }

        debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            objects = mesh.object_names.len() - 1,
            "obj parsed"
        );
        mesh
    }

    pub fn from_file(path: &Path) -> Result<ObjMesh> {
        let text = std::fs::read_to_string(path)?;
        Ok(ObjMesh::parse(&text))
    }
}

fn parse_vertex(rest: &str) -> Option<Point2<f64>> {
    let mut fields = rest.split_whitespace();
    let x: f64 = fast_float::parse(fields.next()?).ok()?;
    let y: f64 = fast_float::parse(fields.next()?).ok()?;
    let z: f64 = fast_float::parse(fields.next()?).ok()?;
    if !x.is_finite() || !y.is_finite() || !z.is_finite() {
        return None;
    }
    Some(Point2::new(x, -z))
}

/// Resolve the usable corner indices of a face record and hand them to
/// `emit` when at least three remain. Indices are 1-based; negative
/// values count back from the current vertex total.
fn parse_face<F: FnOnce(&[u32])>(rest: &str, vertex_count: usize, emit: F) {
    let mut corners: SmallVec<[u32; 8]> = SmallVec::new();

    for token in rest.split_whitespace() {
        // Only the position field of `v/vt/vn` tokens matters here.
        let first_field = token.split('/').next().unwrap_or("");
        let Ok(raw) = first_field.parse::<i64>() else {
            continue;
        };
        if raw == 0 {
            continue;
        }
        let idx = if raw > 0 {
            raw - 1
        } else {
            vertex_count as i64 + raw
        };
        if idx < 0 || idx >= vertex_count as i64 {
            continue;
        }
        corners.push(idx as u32);
    }

    if corners.len() >= 3 {
        emit(&corners);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertices_project_to_x_negz_plane() {
        let mesh = ObjMesh::parse("v 1.0 5.0 2.0\n");
        assert_eq!(mesh.vertices.len(), 1);
        assert_relative_eq!(mesh.vertices[0].x, 1.0);
        assert_relative_eq!(mesh.vertices[0].y, -2.0);
    }

    #[test]
    fn quad_fan_triangulates_around_first_corner() {
        let text = concat!(
            "o Building.001\n",
            "v 0 0 0\nv 1 0 0\nv 1 0 -1\nv 0 0 -1\n",
            "f 1 2 3 4\n"
        );
        let mesh = ObjMesh::parse(text);
        assert_eq!(mesh.triangles.len(), 2);
        assert_eq!(mesh.triangles[0].indices, [0, 1, 2]);
        assert_eq!(mesh.triangles[1].indices, [0, 2, 3]);
        assert_eq!(mesh.object_name(mesh.triangles[0].object_ordinal), "Building.001");
    }

    #[test]
    fn negative_and_slashed_indices_resolve() {
        let text = concat!(
            "v 0 0 0\nv 1 0 0\nv 0 0 -1\n",
            "f -3/1/1 -2/2/2 -1/3/3\n"
        );
        let mesh = ObjMesh::parse(text);
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(mesh.triangles[0].indices, [0, 1, 2]);
    }

    #[test]
    fn unusable_records_are_skipped() {
        let text = concat!(
            "v 0 0 0\nv 1 0 0\nv 0 0 -1\n",
            "v nan 0 0\n",        // non-finite
            "v 1 2\n",            // too few fields
            "f 1 2\n",            // too few corners
            "f 1 2 0\n",          // zero index dropped, 2 corners left
            "f 1 2 99\n",         // out of range dropped
            "f 1 2 3\n"
        );
        let mesh = ObjMesh::parse(text);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.triangles.len(), 1);
    }

    #[test]
    fn object_ordinals_increase_even_for_repeated_names() {
        let text = concat!(
            "v 0 0 0\nv 1 0 0\nv 0 0 -1\n",
            "o Water\nf 1 2 3\n",
            "o Water\nf 1 2 3\n"
        );
        let mesh = ObjMesh::parse(text);
        assert_eq!(mesh.triangles[0].object_ordinal, 1);
        assert_eq!(mesh.triangles[1].object_ordinal, 2);
        assert_eq!(mesh.object_name(1), "Water");
        assert_eq!(mesh.object_name(2), "Water");
    }

    #[test]
    fn face_before_any_object_belongs_to_null() {
        let mesh = ObjMesh::parse("v 0 0 0\nv 1 0 0\nv 0 0 -1\nf 1 2 3\n");
        assert_eq!(mesh.triangles[0].object_ordinal, 0);
        assert_eq!(mesh.object_name(0), "null");
    }
}
