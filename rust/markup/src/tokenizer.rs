// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incremental markup tokenizer.
//!
//! Consumes text in arbitrary chunks and emits one callback per complete
//! tag token, in document order. Comments, CDATA sections, processing
//! instructions and declarations are recognized and discarded. A token
//! that spans a chunk boundary is held until more input arrives; the emitted
//! token sequence is identical regardless of how the input is split.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memchr::{memchr, memmem};

use crate::entities::decode_entities;
use crate::error::{Error, Result};

/// A parsed open/close/self-close tag.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupToken {
    /// Element name, e.g. `way`
    pub name: String,
    /// Attributes in source order, entity references decoded
    pub attrs: Vec<(String, String)>,
    /// `</name ...>`
    pub is_closing: bool,
    /// `<name ... />`
    pub is_self_closing: bool,
}

impl MarkupToken {
    /// Look up an attribute value by name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Span kinds a `<` byte can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Comment,
    Cdata,
    ProcessingInstruction,
    Declaration,
    Tag,
}

impl SpanKind {
    fn unterminated_error(self) -> Error {
        match self {
            SpanKind::Comment => Error::UnterminatedComment,
            SpanKind::Cdata => Error::UnterminatedCdata,
            SpanKind::ProcessingInstruction => Error::UnterminatedProcessingInstruction,
            SpanKind::Declaration => Error::UnterminatedDeclaration,
            SpanKind::Tag => Error::UnterminatedTag,
        }
    }
}

/// Locate the end of the markup span starting at `buf[0] == '<'`.
///
/// Returns the span kind and, when the span is complete within `buf`, the
/// index of its final `>` byte.
fn find_span_end(buf: &[u8]) -> (SpanKind, Option<usize>) {
    debug_assert_eq!(buf.first(), Some(&b'<'));

    if buf.starts_with(b"<!--") {
        let end = memmem::find(&buf[4..], b"-->").map(|i| 4 + i + 2);
        return (SpanKind::Comment, end);
    }
    if buf.starts_with(b"<![CDATA[") {
        let end = memmem::find(&buf[9..], b"]]>").map(|i| 9 + i + 2);
        return (SpanKind::Cdata, end);
    }
    if buf.starts_with(b"<?") {
        let end = memmem::find(&buf[2..], b"?>").map(|i| 2 + i + 1);
        return (SpanKind::ProcessingInstruction, end);
    }
    if buf.starts_with(b"<!") {
        // Declarations may carry an internal subset in [...] and quoted
        // literals; a '>' only terminates at bracket depth zero.
        let mut quote: Option<u8> = None;
        let mut depth = 0usize;
        for (i, &ch) in buf.iter().enumerate().skip(2) {
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                b'"' | b'\'' => quote = Some(ch),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return (SpanKind::Declaration, Some(i)),
                _ => {}
            }
        }
        return (SpanKind::Declaration, None);
    }

    // Plain tag: scan to the matching unquoted '>'. Quoted attribute values
    // may contain '>' or '<'.
    let mut quote: Option<u8> = None;
    for (i, &ch) in buf.iter().enumerate().skip(1) {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            b'"' | b'\'' => quote = Some(ch),
            b'>' => return (SpanKind::Tag, Some(i)),
            _ => {}
        }
    }
    (SpanKind::Tag, None)
}

/// Parse the text between `<` and `>` into a token.
///
/// Returns `None` for spans that are not plain tags (already filtered
/// upstream, but `?`/`!` leaders are re-checked here) and for empty names.
fn parse_tag_token(raw: &str) -> Option<MarkupToken> {
    let mut text = raw.trim();
    if text.is_empty() || text.starts_with('?') || text.starts_with('!') {
        return None;
    }

    let mut is_closing = false;
    if let Some(stripped) = text.strip_prefix('/') {
        is_closing = true;
        text = stripped.trim();
    }

    let mut is_self_closing = false;
    if !is_closing {
        if let Some(stripped) = text.strip_suffix('/') {
            is_self_closing = true;
            text = stripped.trim();
        }
    }

    if text.is_empty() {
        return None;
    }

    let (name, attrs_text) = match text.find(char::is_whitespace) {
        Some(ix) => (&text[..ix], &text[ix + 1..]),
        None => (text, ""),
    };

    let mut attrs = Vec::new();
    if !is_closing && !attrs_text.is_empty() {
        parse_attrs(attrs_text, &mut attrs);
    }

    Some(MarkupToken {
        name: name.to_string(),
        attrs,
        is_closing,
        is_self_closing,
    })
}

/// Parse `key="value"` / `key='value'` pairs with arbitrary spacing.
///
/// A key that is not followed by `=` and a quoted value is skipped whole,
/// never partially parsed. A repeated key overwrites the earlier value.
fn parse_attrs(text: &str, attrs: &mut Vec<(String, String)>) {
    let bytes = text.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        // Skip whitespace and stray separators before a key.
        while i < bytes.len()
            && (bytes[i].is_ascii_whitespace() || bytes[i] == b'=' || bytes[i] == b'/')
        {
            i += 1;
        }
        let key_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if i == key_start {
            continue;
        }
        let key = &text[key_start..i];

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] != b'=' {
            // Bare key without '=': ignore it entirely.
            continue;
        }
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() || (bytes[j] != b'"' && bytes[j] != b'\'') {
            // '=' without a quoted value: not an attribute match.
            i = j;
            continue;
        }
        let quote = bytes[j];
        let value_start = j + 1;
        let Some(rel) = memchr(quote, &bytes[value_start..]) else {
            // Unterminated quote inside an otherwise complete tag; the
            // remainder cannot contain further attributes.
            return;
        };
        let value = decode_entities(&text[value_start..value_start + rel]).into_owned();
        match attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => attrs.push((key.to_string(), value)),
        }
        i = value_start + rel + 1;
    }
}

/// Incremental tokenizer state.
///
/// Feed chunks with [`Tokenizer::push`]; call [`Tokenizer::finish`] at
/// end-of-input, where any held incomplete span becomes a hard error naming
/// the span kind. Callbacks fire synchronously, in document order; the
/// caller must not re-enter the tokenizer from within a callback.
#[derive(Default)]
pub struct Tokenizer {
    buffer: String,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk of input, emitting every token completed by it.
    /// Mid-stream, an incomplete trailing span just waits for more input.
    pub fn push<F>(&mut self, chunk: &str, sink: &mut F) -> Result<()>
    where
        F: FnMut(MarkupToken),
    {
        self.buffer.push_str(chunk);
        self.consume(false, sink)
    }

    /// Signal end-of-input. An incomplete held span is a parse failure.
    pub fn finish<F>(mut self, sink: &mut F) -> Result<()>
    where
        F: FnMut(MarkupToken),
    {
        self.consume(true, sink)
    }

    fn consume<F>(&mut self, at_end: bool, sink: &mut F) -> Result<()>
    where
        F: FnMut(MarkupToken),
    {
        loop {
            let Some(lt) = memchr(b'<', self.buffer.as_bytes()) else {
                self.buffer.clear();
                return Ok(());
            };
            if lt > 0 {
                self.buffer.drain(..lt);
            }

            let (kind, end) = find_span_end(self.buffer.as_bytes());
            let Some(end) = end else {
                if at_end {
                    return Err(kind.unterminated_error());
                }
                return Ok(());
            };

            if kind == SpanKind::Tag {
                if let Some(token) = parse_tag_token(&self.buffer[1..end]) {
                    sink(token);
                }
            }
            self.buffer.drain(..=end);
        }
    }
}

/// Tokenize a sequence of in-memory chunks.
pub fn tokenize_chunks<F>(chunks: &[&str], sink: &mut F) -> Result<()>
where
    F: FnMut(MarkupToken),
{
    let mut tokenizer = Tokenizer::new();
    for chunk in chunks {
        tokenizer.push(chunk, sink)?;
    }
    tokenizer.finish(sink)
}

/// Read buffer size for file tokenization.
const FILE_CHUNK_BYTES: usize = 64 * 1024;

/// Tokenize a file, reading it incrementally.
///
/// UTF-8 sequences split across read boundaries are carried over to the
/// next chunk.
pub fn tokenize_file<F>(path: &Path, sink: &mut F) -> Result<()>
where
    F: FnMut(MarkupToken),
{
    let mut file = File::open(path)?;
    let mut tokenizer = Tokenizer::new();
    let mut buf = vec![0u8; FILE_CHUNK_BYTES];
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let carry_len = carry.len();
        buf[..carry_len].copy_from_slice(&carry);
        let read = file.read(&mut buf[carry_len..])?;
        if read == 0 {
            if !carry.is_empty() {
                // Trailing bytes that never formed a complete code point.
                std::str::from_utf8(&carry)?;
            }
            return tokenizer.finish(sink);
        }

        let filled = carry_len + read;
        carry.clear();
        let chunk = match std::str::from_utf8(&buf[..filled]) {
            Ok(text) => text,
            Err(err) if filled - err.valid_up_to() < 4 && err.error_len().is_none() => {
                carry.extend_from_slice(&buf[err.valid_up_to()..filled]);
                // Safe split: valid_up_to is a UTF-8 boundary.
                std::str::from_utf8(&buf[..err.valid_up_to()])?
            }
            Err(err) => return Err(err.into()),
        };
        tokenizer.push(chunk, sink)?;
    }
}
