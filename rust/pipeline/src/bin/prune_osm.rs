// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prune an OSM extract to a road-density budget.
//!
//! ```text
//! prune-osm --input in.osm --output out.osm \
//!     --min-lon 24.9 --min-lat 60.0 --max-lon 24.91 --max-lat 60.01 \
//!     [--density 120]
//! ```

use anyhow::{bail, Context, Result};

use tactile_prep_osm::GeoBounds;
use tactile_prep_pipeline::{run_prune, PruneOptions, DEFAULT_DENSITY_KM_PER_KM2};

struct Args {
    input: String,
    output: String,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
    density: f64,
}

fn parse_args(mut argv: std::env::Args) -> Result<Args> {
    let mut args = Args {
        input: String::new(),
        output: String::new(),
        min_lon: f64::NAN,
        min_lat: f64::NAN,
        max_lon: f64::NAN,
        max_lat: f64::NAN,
        density: DEFAULT_DENSITY_KM_PER_KM2,
    };

    argv.next(); // program name
    while let Some(arg) = argv.next() {
        let mut value = || {
            argv.next()
                .with_context(|| format!("missing value for {}", arg))
        };
        match arg.as_str() {
            "--input" => args.input = value()?,
            "--output" => args.output = value()?,
            "--min-lon" => args.min_lon = value()?.parse()?,
            "--min-lat" => args.min_lat = value()?.parse()?,
            "--max-lon" => args.max_lon = value()?.parse()?,
            "--max-lat" => args.max_lat = value()?.parse()?,
            "--density" => args.density = value()?.parse()?,
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
    let options = PruneOptions {
        input: args.input.into(),
        output: args.output.into(),
        bounds: GeoBounds::new(args.min_lon, args.min_lat, args.max_lon, args.max_lat),
        density_km_per_km2: args.density,
    };

    let report = run_prune(&options)?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
