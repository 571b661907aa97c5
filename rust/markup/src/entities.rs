// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity reference decoding and attribute escaping.
//!
//! Only the five predefined references plus numeric character references
//! are handled; anything else passes through verbatim.

use std::borrow::Cow;

/// Decode entity references in an attribute value.
///
/// Handles `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and numeric
/// `&#NN;` / `&#xHH;` forms. Unrecognized or invalid references are left
/// untouched.
pub fn decode_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode a single reference starting at `&`; returns (char, bytes consumed).
fn decode_one(input: &str) -> Option<(char, usize)> {
    let semi = input.find(';')?;
    let body = &input[1..semi];
    let consumed = semi + 1;

    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            // Hex references use lowercase x only.
            let code = if let Some(hex) = body.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, consumed))
}

/// Escape a string for use inside a quoted attribute value.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_predefined_references() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;x&gt;"), "<x>");
        assert_eq!(decode_entities("&quot;q&apos;"), "\"q'");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&#x263A;"), "\u{263A}");
    }

    #[test]
    fn leaves_unknown_references_alone() {
        assert_eq!(decode_entities("&nbsp; &foo"), "&nbsp; &foo");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
        // Uppercase X is not a hex reference.
        assert_eq!(decode_entities("&#X41;"), "&#X41;");
    }

    #[test]
    fn double_escaped_ampersand_decodes_one_level() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn escape_round_trips() {
        let raw = "a & \"b\" < 'c' > d";
        assert_eq!(decode_entities(&escape_attr(raw)), raw);
    }

    #[test]
    fn escape_borrows_when_clean() {
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }
}
