// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag storage and tag-value parsing.
//!
//! Tags live as ordered `(key, value)` pairs to preserve output fidelity;
//! [`TagView`] is the derived read-only lookup built once per entity when
//! repeated lookups are needed.

use rustc_hash::FxHashMap;

/// Ordered tag pairs as they appeared in the source document.
pub type TagList = Vec<(String, String)>;

/// Read-only keyed view over a [`TagList`]. A repeated key keeps the
/// later value, matching last-wins map semantics.
pub struct TagView<'a> {
    map: FxHashMap<&'a str, &'a str>,
}

impl<'a> TagView<'a> {
    pub fn new(tags: &'a [(String, String)]) -> Self {
        let mut map = FxHashMap::default();
        for (k, v) in tags {
            map.insert(k.as_str(), v.as_str());
        }
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).copied()
    }

    /// Tagged as a water area: `natural=water`, a non-empty `water` tag,
    /// `landuse=reservoir`, or `waterway=riverbank`.
    pub fn is_water_area(&self) -> bool {
        self.get("natural") == Some("water")
            || self.get("water").is_some_and(|v| !v.is_empty())
            || self.get("landuse") == Some("reservoir")
            || self.get("waterway") == Some("riverbank")
    }

    /// Tagged as a linear waterway: a non-empty `waterway` value whose
    /// normalized form is not `riverbank`.
    pub fn is_linear_waterway(&self) -> bool {
        match self.get("waterway") {
            Some(raw) => {
                let normalized = raw.trim().to_ascii_lowercase();
                !normalized.is_empty() && normalized != "riverbank"
            }
            None => false,
        }
    }

    /// Leading integer of the `lanes` tag, e.g. `2; 3` parses as 2.
    pub fn lanes(&self) -> Option<u32> {
        let raw = self.get("lanes")?.trim_start();
        let digits: &str = {
            let end = raw
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or(raw.len());
            &raw[..end]
        };
        digits.parse().ok()
    }

    /// Parsed `maxspeed` in km/h. Only the first `;`/`,`/`|`-delimited
    /// token is considered; the number is digits with an optional
    /// fractional part (a dot must be followed by at least one digit);
    /// `mph`/`mi/h` convert at 1.60934, a bare number is km/h; anything
    /// else is unparseable.
    pub fn maxspeed_kmh(&self) -> Option<f64> {
        let raw = self.get("maxspeed")?.trim().to_ascii_lowercase();
        if raw.is_empty() {
            return None;
        }
        let primary = raw
            .split([';', ',', '|'])
            .next()
            .unwrap_or("")
            .trim();

        let bytes = primary.as_bytes();
        let mut number_end = 0;
        while number_end < bytes.len() && bytes[number_end].is_ascii_digit() {
            number_end += 1;
        }
        if number_end == 0 {
            return None;
        }
        if number_end < bytes.len() && bytes[number_end] == b'.' {
            let mut frac_end = number_end + 1;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            // A bare trailing dot is not part of the number; the leftover
            // dot then fails the unit match below.
            if frac_end > number_end + 1 {
                number_end = frac_end;
            }
        }
        let value: f64 = primary[..number_end].parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        match primary[number_end..].trim() {
            "" | "km/h" | "kmh" | "kph" => Some(value),
            "mph" | "mi/h" => Some(value * 1.60934),
            _ => None,
        }
    }

    /// OSM-style truthy value: `yes`, `true` or `1`, case-insensitive.
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.get(key) {
            Some(raw) => {
                let normalized = raw.trim().to_ascii_lowercase();
                normalized == "yes" || normalized == "true" || normalized == "1"
            }
            None => false,
        }
    }
}
