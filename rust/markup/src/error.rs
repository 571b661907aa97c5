// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for markup tokenization
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tokenizing a markup document
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed markup: unterminated comment")]
    UnterminatedComment,

    #[error("malformed markup: unterminated CDATA section")]
    UnterminatedCdata,

    #[error("malformed markup: unterminated processing instruction")]
    UnterminatedProcessingInstruction,

    #[error("malformed markup: unterminated declaration/doctype")]
    UnterminatedDeclaration,

    #[error("malformed markup: unterminated tag")]
    UnterminatedTag,

    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
