// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-bucket vertex deduplication on a quantization grid.
//!
//! Vertex identity is scoped to one bucket: the same physical coordinate
//! in two buckets gets independent indices. The first occurrence of a
//! quantized key wins; its exact (unquantized) coordinates are the ones
//! written out.

use nalgebra::Point2;
use rustc_hash::FxHashMap;

/// Deduplicated bucket geometry ready for the binary writer.
#[derive(Debug, Default)]
pub struct DedupedBucket {
    pub vertices: Vec<Point2<f64>>,
    pub faces: Vec<[u32; 3]>,
    /// Triangles whose corners merged to fewer than three distinct
    /// vertices under quantization.
    pub dropped_collapsed: u64,
}

struct VertexInterner {
    quantization: f64,
    key_to_index: FxHashMap<(i64, i64), u32>,
    vertices: Vec<Point2<f64>>,
}

impl VertexInterner {
    fn new(quantization: f64) -> Self {
        VertexInterner {
            quantization,
            key_to_index: FxHashMap::default(),
            vertices: Vec::new(),
        }
    }

    fn intern(&mut self, p: Point2<f64>) -> u32 {
        let key = (
            (p.x * self.quantization).round() as i64,
            (p.y * self.quantization).round() as i64,
        );
        if let Some(&ix) = self.key_to_index.get(&key) {
            return ix;
        }
        let ix = self.vertices.len() as u32;
        self.key_to_index.insert(key, ix);
        self.vertices.push(p);
        ix
    }
}

/// Merge coincident vertices of a bucket's triangles and drop triangles
/// that collapse in the process.
pub fn dedupe_triangles(triangles: &[[Point2<f64>; 3]], quantization: f64) -> DedupedBucket {
    let mut interner = VertexInterner::new(quantization);
    let mut faces = Vec::with_capacity(triangles.len());
    let mut dropped_collapsed = 0u64;

    for tri in triangles {
        let a = interner.intern(tri[0]);
        let b = interner.intern(tri[1]);
        let c = interner.intern(tri[2]);
        if a == b || b == c || a == c {
            dropped_collapsed += 1;
            continue;
        }
        faces.push([a, b, c]);
    }

    DedupedBucket {
        vertices: interner.vertices,
        faces,
        dropped_collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sub_grid_vertices_collapse_to_one() {
        // At quantization 1e6 a 0.49 micro-unit offset rounds to the
        // same cell.
        let tris = [[
            Point2::new(0.000_000_49, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        ]];
        let out = dedupe_triangles(&tris, 1e6);
        assert_eq!(out.vertices.len(), 2);
        assert_eq!(out.faces.len(), 0);
        assert_eq!(out.dropped_collapsed, 1);
    }

    #[test]
    fn first_occurrence_coordinates_are_kept() {
        let tris = [
            [
                Point2::new(0.000_000_4, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 1.0),
            ],
            [
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
        ];
        let out = dedupe_triangles(&tris, 1e6);
        assert_eq!(out.vertices.len(), 4);
        assert_relative_eq!(out.vertices[0].x, 0.000_000_4);
        assert_eq!(out.faces, vec![[0, 1, 2], [0, 1, 3]]);
    }

    #[test]
    fn distinct_vertices_survive() {
        let tris = [[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]];
        let out = dedupe_triangles(&tris, 1e6);
        assert_eq!(out.vertices.len(), 3);
        assert_eq!(out.faces.len(), 1);
        assert_eq!(out.dropped_collapsed, 0);
    }
}
