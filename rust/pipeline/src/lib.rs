// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tactile-Prep Pipeline
//!
//! Front-end for the two batch converters: OSM pruning ([`run_prune`])
//! and mesh clipping ([`run_clip`]). Validates options before any file
//! I/O and emits machine-readable run reports.

pub mod clip;
pub mod error;
pub mod options;
pub mod prune;
pub mod report;

pub use clip::run_clip;
pub use error::{Error, Result};
pub use options::{
    ClipOptions, PruneOptions, DEFAULT_BASENAME, DEFAULT_DENSITY_KM_PER_KM2, DEFAULT_QUANTIZATION,
};
pub use prune::run_prune;
pub use report::{ClipReport, PruneReport};
