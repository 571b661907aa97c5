// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run options with up-front validation.
//!
//! Every numeric option is checked before any file is opened; a bad
//! rectangle or density must never leave a half-written output behind.

use std::path::PathBuf;

use tactile_prep_mesh::ClipRect;
use tactile_prep_osm::GeoBounds;

use crate::error::{Error, Result};

/// Default road density budget in km of road per km².
pub const DEFAULT_DENSITY_KM_PER_KM2: f64 = 120.0;
/// Default output basename for clip runs.
pub const DEFAULT_BASENAME: &str = "map-clip";
/// Default vertex dedup grid: micro-unit resolution.
pub const DEFAULT_QUANTIZATION: f64 = 1e6;

/// Options for one OSM pruning run.
#[derive(Debug, Clone)]
pub struct PruneOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bounds: GeoBounds,
    pub density_km_per_km2: f64,
}

impl PruneOptions {
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(Error::Options("input path is required".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::Options("output path is required".into()));
        }
        if !self.bounds.is_valid() {
            return Err(Error::Options(
                "bounds must be finite with min < max on both axes".into(),
            ));
        }
        if !self.density_km_per_km2.is_finite() || self.density_km_per_km2 < 0.0 {
            return Err(Error::Options("density must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// Options for one mesh clip run.
#[derive(Debug, Clone)]
pub struct ClipOptions {
    pub input_obj: PathBuf,
    pub out_dir: PathBuf,
    pub basename: String,
    pub report: PathBuf,
    pub rect: ClipRect,
    pub quantization: f64,
}

impl ClipOptions {
    pub fn validate(&self) -> Result<()> {
        if self.input_obj.as_os_str().is_empty() {
            return Err(Error::Options("input OBJ path is required".into()));
        }
        if self.out_dir.as_os_str().is_empty() {
            return Err(Error::Options("output directory is required".into()));
        }
        if self.report.as_os_str().is_empty() {
            return Err(Error::Options("report path is required".into()));
        }
        if self.basename.is_empty() {
            return Err(Error::Options("basename must not be empty".into()));
        }
        if !self.rect.is_valid() {
            return Err(Error::Options(
                "clip rectangle must be finite with min < max on both axes".into(),
            ));
        }
        if !self.quantization.is_finite() || !(self.quantization > 0.0) {
            return Err(Error::Options("quantization must be finite and > 0".into()));
        }
        Ok(())
    }
}
