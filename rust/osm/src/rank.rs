// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Road importance ranking.
//!
//! Every road way gets an integer rank 0..=10 from a fixed base table on
//! its `highway` value plus tag-driven adjustments. The rank decides
//! pruning order: lower ranks are removed first.

use crate::tags::TagView;

/// Number of rank buckets (ranks 0..=10).
pub const RANK_BUCKETS: usize = 11;

/// Base rank for a normalized `highway` value. Unknown or absent values
/// default to 5.
fn base_road_rank(highway: &str) -> i32 {
    match highway {
        "service" => 0,
        "track" => 1,
        "path" | "footway" | "cycleway" | "bridleway" | "steps" | "corridor" => 2,
        "pedestrian" | "living_street" => 3,
        "residential" => 4,
        "unclassified" => 5,
        "tertiary" | "tertiary_link" => 6,
        "secondary" | "secondary_link" => 7,
        "primary" | "primary_link" => 8,
        "trunk" | "trunk_link" => 9,
        "motorway" | "motorway_link" => 10,
        _ => 5,
    }
}

/// Compute the adjusted rank for a road way's tags, clamped to [0, 10].
///
/// Adjustments, in order: lanes >= 2 (+1), truthy oneway (+1), maxspeed
/// >= 70 km/h (+1), motorway/trunk/primary with lanes >= 3 or maxspeed
/// >= 90 (+2), access=private (-1), service driveway/parking_aisle (-2),
/// track grade4/grade5 (-1).
pub fn adjusted_road_rank(tags: &TagView<'_>) -> u8 {
    let highway = tags
        .get("highway")
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let mut rank = base_road_rank(&highway);

    let lanes = tags.lanes();
    let maxspeed = tags.maxspeed_kmh();

    if lanes.is_some_and(|n| n >= 2) {
        rank += 1;
    }
    if tags.is_truthy("oneway") {
        rank += 1;
    }
    if maxspeed.is_some_and(|v| v >= 70.0) {
        rank += 1;
    }
    if matches!(highway.as_str(), "motorway" | "trunk" | "primary")
        && (lanes.is_some_and(|n| n >= 3) || maxspeed.is_some_and(|v| v >= 90.0))
    {
        rank += 2;
    }

    if tags
        .get("access")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("private"))
    {
        rank -= 1;
    }
    if highway == "service" {
        let service = tags.get("service").unwrap_or("").trim().to_ascii_lowercase();
        if service == "driveway" || service == "parking_aisle" {
            rank -= 2;
        }
    }
    if highway == "track" {
        let tracktype = tags
            .get("tracktype")
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if tracktype == "grade4" || tracktype == "grade5" {
            rank -= 1;
        }
    }

    rank.clamp(0, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagList;

    fn rank_of(pairs: &[(&str, &str)]) -> u8 {
        let tags: TagList = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        adjusted_road_rank(&TagView::new(&tags))
    }

    #[test]
    fn motorway_caps_at_ten() {
        assert_eq!(rank_of(&[("highway", "motorway"), ("lanes", "3")]), 10);
    }

    #[test]
    fn driveway_clamps_at_zero() {
        assert_eq!(
            rank_of(&[("highway", "service"), ("service", "driveway")]),
            0
        );
    }

    #[test]
    fn unknown_highway_defaults_to_five() {
        assert_eq!(rank_of(&[("highway", "busway")]), 5);
    }

    #[test]
    fn lanes_oneway_and_speed_add_up() {
        // residential 4 + lanes 1 + oneway 1 + speed 1 = 7
        assert_eq!(
            rank_of(&[
                ("highway", "residential"),
                ("lanes", "2"),
                ("oneway", "yes"),
                ("maxspeed", "70"),
            ]),
            7
        );
    }

    #[test]
    fn major_road_bonus_applies_from_speed() {
        // primary 8 + speed>=70 1 + major bonus 2 = 11, clamped to 10
        assert_eq!(rank_of(&[("highway", "primary"), ("maxspeed", "90")]), 10);
        // trunk 9 via mph conversion: 60 mph = 96.56 km/h
        assert_eq!(rank_of(&[("highway", "trunk"), ("maxspeed", "60 mph")]), 10);
    }

    #[test]
    fn malformed_maxspeed_gives_no_speed_bonus() {
        // "95." is not a valid number, so neither the >=70 bonus nor the
        // major-road >=90 bonus applies.
        assert_eq!(rank_of(&[("highway", "primary"), ("maxspeed", "95.")]), 8);
        assert_eq!(rank_of(&[("highway", "primary"), ("maxspeed", "95")]), 10);
    }

    #[test]
    fn penalties_subtract() {
        // residential 4 - private 1 = 3
        assert_eq!(
            rank_of(&[("highway", "residential"), ("access", "private")]),
            3
        );
        // track 1 - grade5 1 = 0
        assert_eq!(
            rank_of(&[("highway", "track"), ("tracktype", "grade5")]),
            0
        );
    }
}
