// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip a triangulated OBJ export into per-category binary PLY layers.
//!
//! ```text
//! clip-mesh --input-obj in.obj --out-dir out --report report.json \
//!     --min-x 0 --min-y 0 --max-x 200 --max-y 200 \
//!     [--basename map-clip] [--quantization 1000000]
//! ```

use anyhow::{bail, Context, Result};
use serde_json::json;

use tactile_prep_mesh::ClipRect;
use tactile_prep_pipeline::{run_clip, ClipOptions, DEFAULT_BASENAME, DEFAULT_QUANTIZATION};

struct Args {
    input_obj: String,
    out_dir: String,
    basename: String,
    report: String,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    quantization: f64,
}

fn parse_args(mut argv: std::env::Args) -> Result<Args> {
    let mut args = Args {
        input_obj: String::new(),
        out_dir: String::new(),
        basename: DEFAULT_BASENAME.to_string(),
        report: String::new(),
        min_x: f64::NAN,
        min_y: f64::NAN,
        max_x: f64::NAN,
        max_y: f64::NAN,
        quantization: DEFAULT_QUANTIZATION,
    };

    argv.next(); // program name
    while let Some(arg) = argv.next() {
        let mut value = || {
            argv.next()
                .with_context(|| format!("missing value for {}", arg))
        };
        match arg.as_str() {
            "--input-obj" => args.input_obj = value()?,
            "--out-dir" => args.out_dir = value()?,
            "--basename" => args.basename = value()?,
            "--report" => args.report = value()?,
            "--min-x" => args.min_x = value()?.parse()?,
            "--min-y" => args.min_y = value()?.parse()?,
            "--max-x" => args.max_x = value()?.parse()?,
            "--max-y" => args.max_y = value()?.parse()?,
            "--quantization" => args.quantization = value()?.parse()?,
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args(std::env::args())?;
    let report_path = std::path::PathBuf::from(&args.report);
    let options = ClipOptions {
        input_obj: args.input_obj.into(),
        out_dir: args.out_dir.into(),
        basename: args.basename,
        report: report_path.clone(),
        rect: ClipRect::new(args.min_x, args.min_y, args.max_x, args.max_y),
        quantization: args.quantization,
    };

    let report = run_clip(&options)?;
    let files: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
    println!(
        "{}",
        json!({
            "reportPath": report_path.canonicalize().unwrap_or(report_path).display().to_string(),
            "files": files,
        })
    );
    Ok(())
}
