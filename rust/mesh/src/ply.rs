// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary little-endian PLY writer.
//!
//! ASCII header, then fixed-size records: three f32 per vertex (z is
//! always 0) and one u8 arity marker plus three i32 indices per face.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point2;

use crate::error::Result;

pub fn write_binary_ply<W: Write>(
    out: &mut W,
    vertices: &[Point2<f64>],
    faces: &[[u32; 3]],
) -> Result<()> {
    write!(
        out,
        "ply\n\
         format binary_little_endian 1.0\n\
         element vertex {}\n\
         property float x\n\
         property float y\n\
         property float z\n\
         element face {}\n\
         property list uchar int vertex_indices\n\
         end_header\n",
        vertices.len(),
        faces.len()
    )?;

    for v in vertices {
        out.write_all(&(v.x as f32).to_le_bytes())?;
        out.write_all(&(v.y as f32).to_le_bytes())?;
        out.write_all(&0.0f32.to_le_bytes())?;
    }

    for f in faces {
        out.write_all(&[3u8])?;
        for &ix in f {
            out.write_all(&(ix as i32).to_le_bytes())?;
        }
    }
    Ok(())
}

pub fn write_binary_ply_to_path(
    path: &Path,
    vertices: &[Point2<f64>],
    faces: &[[u32; 3]],
) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_binary_ply(&mut out, vertices, faces)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_record_layout() {
        let vertices = vec![Point2::new(1.5, -2.0), Point2::new(0.0, 0.0)];
        let faces = vec![[0u32, 1, 0]];
        let mut out = Vec::new();
        write_binary_ply(&mut out, &vertices, &faces).unwrap();

        let header_end = b"end_header\n";
        let pos = out
            .windows(header_end.len())
            .position(|w| w == header_end)
            .unwrap()
            + header_end.len();
        let header = std::str::from_utf8(&out[..pos]).unwrap();
        assert!(header.starts_with("ply\nformat binary_little_endian 1.0\n"));
        assert!(header.contains("element vertex 2\n"));
        assert!(header.contains("element face 1\n"));
        assert!(header.contains("property list uchar int vertex_indices\n"));

        let body = &out[pos..];
        // 2 vertices * 12 bytes + 1 face * 13 bytes.
        assert_eq!(body.len(), 2 * 12 + 13);
        assert_eq!(&body[0..4], &1.5f32.to_le_bytes());
        assert_eq!(&body[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(&body[8..12], &0.0f32.to_le_bytes());
        assert_eq!(body[24], 3u8);
        assert_eq!(&body[25..29], &0i32.to_le_bytes());
        assert_eq!(&body[29..33], &1i32.to_le_bytes());
    }

    #[test]
    fn empty_bucket_still_writes_valid_header() {
        let mut out = Vec::new();
        write_binary_ply(&mut out, &[], &[]).unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        assert!(text.contains("element vertex 0\n"));
        assert!(text.contains("element face 0\n"));
        assert!(text.ends_with("end_header\n"));
    }
}
