// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tactile-Prep Markup Tokenizer
//!
//! Incremental, callback-based markup tokenizer used by the OSM pruning
//! pipeline. Tolerates comments, CDATA sections, processing instructions
//! and declarations (all recognized and discarded), and produces the same
//! token sequence no matter how the input is split into chunks.
//!
//! ## Quick Start
//!
//! ```rust
//! use tactile_prep_markup::{tokenize_chunks, MarkupToken};
//!
//! let mut names = Vec::new();
//! tokenize_chunks(&["<osm><node id=\"1\"/></osm>"], &mut |t: MarkupToken| {
//!     names.push(t.name);
//! })
//! .unwrap();
//! assert_eq!(names, ["osm", "node", "osm"]);
//! ```

pub mod entities;
pub mod error;
pub mod tokenizer;

pub use entities::{decode_entities, escape_attr};
pub use error::{Error, Result};
pub use tokenizer::{tokenize_chunks, tokenize_file, MarkupToken, Tokenizer};
