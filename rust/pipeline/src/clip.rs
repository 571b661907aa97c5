// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh clip run driver.
//!
//! Output PLY files are ephemeral intermediates and land in a `tmp/`
//! subdirectory that is cleared at the start of every run. Files are
//! written in fixed group order; water-area files are numbered by write
//! order, not by source ordinal.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use tactile_prep_mesh::{
    classify_and_clip, dedupe_triangles, write_binary_ply_to_path, Group, ObjMesh,
};

use crate::error::Result;
use crate::options::ClipOptions;
use crate::report::{ClipReport, ClipTimings, FileEntry, ObjectStats, RectReport, TriangleStats};

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Clear and recreate the per-run staging directory.
fn prepare_tmp_dir(out_dir: &Path) -> Result<PathBuf> {
    let tmp_dir = out_dir.join("tmp");
    if tmp_dir.exists() {
        std::fs::remove_dir_all(&tmp_dir)?;
    }
    std::fs::create_dir_all(&tmp_dir)?;
    Ok(tmp_dir)
}

/// Run one clip pass: parse, classify, clip, per-bucket dedup and PLY
/// write, then the JSON report.
pub fn run_clip(options: &ClipOptions) -> Result<ClipReport> {
    options.validate()?;
    let started = Instant::now();

    std::fs::create_dir_all(&options.out_dir)?;
    let tmp_dir = prepare_tmp_dir(&options.out_dir)?;

    let parse_start = Instant::now();
    let mesh = ObjMesh::from_file(&options.input_obj)?;
    let parse_seconds = parse_start.elapsed().as_secs_f64();

    let clip_start = Instant::now();
    let (buckets, stats) = classify_and_clip(&mesh, &options.rect);
    let clip_seconds = clip_start.elapsed().as_secs_f64();

    let write_start = Instant::now();
    let mut files = Vec::with_capacity(buckets.len());
    let mut water_area_files = 0usize;

    for bucket in &buckets {
        let filename = if bucket.group == Group::WaterAreas {
            water_area_files += 1;
            format!(
                "{}-water-areas-{:04}.ply",
                options.basename, water_area_files
            )
        } else {
            format!("{}-{}.ply", options.basename, bucket.group.file_slug())
        };
        let out_path = tmp_dir.join(filename);

        let deduped = dedupe_triangles(&bucket.triangles, options.quantization);
        write_binary_ply_to_path(&out_path, &deduped.vertices, &deduped.faces)?;

        files.push(FileEntry {
            group: bucket.group.as_str().to_string(),
            path: absolute(&out_path).display().to_string(),
            input_triangles: bucket.input_triangles,
            clipped_triangles: bucket.clipped_triangles,
            dropped_degenerate: bucket.dropped_degenerate,
            dropped_collapsed: deduped.dropped_collapsed,
            vertices_before_dedupe: bucket.triangles.len() as u64 * 3,
            vertices_after_dedupe: deduped.vertices.len() as u64,
            written_faces: deduped.faces.len() as u64,
        });
    }
    let dedupe_write_seconds = write_start.elapsed().as_secs_f64();

    let extent = options.rect.extent();
    let report = ClipReport {
        input_obj_path: absolute(&options.input_obj).display().to_string(),
        out_dir: absolute(&options.out_dir).display().to_string(),
        tmp_out_dir: absolute(&tmp_dir).display().to_string(),
        bounds: RectReport {
            min_x: options.rect.min_x,
            min_y: options.rect.min_y,
            max_x: options.rect.max_x,
            max_y: options.rect.max_y,
        },
        quantization: options.quantization,
        eps: 1e-9 * extent,
        area_eps: 1e-12 * extent * extent,
        timings: ClipTimings {
            parse_seconds,
            clip_seconds,
            dedupe_write_seconds,
            total_seconds: started.elapsed().as_secs_f64(),
        },
        objects: ObjectStats {
            seen: stats.objects_seen,
            skipped: stats.objects_skipped,
        },
        triangles: TriangleStats {
            input: stats.input_triangles,
            clipped_output: stats.clipped_triangles,
            dropped: stats.dropped_triangles,
            dropped_degenerate: stats.dropped_degenerate,
        },
        files,
    };

    report.write_to_path(&options.report)?;
    info!(
        files = report.files.len(),
        triangles = report.triangles.clipped_output,
        report = %options.report.display(),
        "clip run complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DEFAULT_BASENAME, DEFAULT_QUANTIZATION};
    use tactile_prep_mesh::ClipRect;

    fn write_fixture(dir: &Path) -> PathBuf {
        let input = dir.join("in.obj");
        std::fs::write(
            &input,
            concat!(
                "o Road.1\n",
                "v 1 0 -1\nv 4 0 -1\nv 1 0 -4\n",
                "f 1 2 3\n",
                "o Water.001\n",
                "v 5 0 -5\nv 7 0 -5\nv 5 0 -7\n",
                "f 4 5 6\n",
                "o Water.002\n",
                "v 2 0 -6\nv 3 0 -6\nv 2 0 -7\n",
                "f 7 8 9\n"
            ),
        )
        .unwrap();
        input
    }

    #[test]
    fn clip_run_writes_ordered_files_and_report() {
        let dir = std::env::temp_dir().join("tactile-prep-clip-test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let input_obj = write_fixture(&dir);
        let out_dir = dir.join("out");
        let report_path = dir.join("report.json");

        let options = ClipOptions {
            input_obj,
            out_dir: out_dir.clone(),
            basename: DEFAULT_BASENAME.to_string(),
            report: report_path.clone(),
            rect: ClipRect::new(0.0, 0.0, 10.0, 10.0),
            quantization: DEFAULT_QUANTIZATION,
        };
        let report = run_clip(&options).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.files[0].group, "roads_car");
        assert_eq!(report.files[1].group, "water_areas");
        assert_eq!(report.files[2].group, "water_areas");
        assert!(report.files[1].path.ends_with("map-clip-water-areas-0001.ply"));
        assert!(report.files[2].path.ends_with("map-clip-water-areas-0002.ply"));

        for entry in &report.files {
            assert!(Path::new(&entry.path).exists());
            assert_eq!(entry.written_faces, 1);
        }
        assert!(report_path.exists());
        let text = std::fs::read_to_string(&report_path).unwrap();
        assert!(text.ends_with("\n"));
        assert!(text.contains("\"clippedOutput\": 3"));
    }

    #[test]
    fn stale_tmp_files_are_cleared_between_runs() {
        let dir = std::env::temp_dir().join("tactile-prep-clip-stale-test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let input_obj = write_fixture(&dir);
        let out_dir = dir.join("out");
        let tmp_dir = out_dir.join("tmp");
        std::fs::create_dir_all(&tmp_dir).unwrap();
        let stale = tmp_dir.join("leftover.ply");
        std::fs::write(&stale, b"stale").unwrap();

        let options = ClipOptions {
            input_obj,
            out_dir,
            basename: DEFAULT_BASENAME.to_string(),
            report: dir.join("report.json"),
            rect: ClipRect::new(0.0, 0.0, 10.0, 10.0),
            quantization: DEFAULT_QUANTIZATION,
        };
        run_clip(&options).unwrap();
        assert!(!stale.exists());
    }
}
