// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for OSM graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or serializing the graph
#[derive(Error, Debug)]
pub enum Error {
    #[error("markup error: {0}")]
    Markup(#[from] tactile_prep_markup::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
