// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline runs
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a converter run
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected before any file is touched.
    #[error("Invalid options: {0}")]
    Options(String),

    #[error("OSM pruning error: {0}")]
    Osm(#[from] tactile_prep_osm::Error),

    #[error("Mesh preparation error: {0}")]
    Mesh(#[from] tactile_prep_mesh::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}
