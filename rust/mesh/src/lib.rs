// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tactile-Prep Mesh Preparation
//!
//! Turns a triangulated OBJ export into per-category binary PLY layers:
//!
//! 1. Parse ([`ObjMesh::parse`]): `o`/`v`/`f` records, projected onto
//!    the 2D `(x, -z)` working plane.
//! 2. Classify and clip ([`classify_and_clip`]): group by object-name
//!    prefix, clip against the print rectangle, restore winding.
//! 3. Deduplicate ([`dedupe_triangles`]): merge coincident vertices per
//!    bucket on a quantization grid.
//! 4. Write ([`write_binary_ply`]): compact binary little-endian PLY.

pub mod classify;
pub mod clip;
pub mod dedup;
pub mod error;
pub mod obj;
pub mod ply;
pub mod prepare;

pub use classify::{classify_object, Group, GROUP_ORDER};
pub use clip::{clip_triangle, signed_area2, ClipPolygon, ClipRect};
pub use dedup::{dedupe_triangles, DedupedBucket};
pub use error::{Error, Result};
pub use obj::{ObjMesh, ObjTriangle};
pub use ply::{write_binary_ply, write_binary_ply_to_path};
pub use prepare::{classify_and_clip, PrepareStats, TriangleBucket};
