// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object-name classification into semantic output groups.

/// Semantic output group for clipped triangles, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    RoadsCar,
    RoadsPed,
    RoadAreasCar,
    RoadAreasPed,
    Rails,
    Buildings,
    Waterways,
    WaterAreas,
    Other,
}

/// Fixed emission order for output files and report entries.
pub const GROUP_ORDER: [Group; 9] = [
    Group::RoadsCar,
    Group::RoadsPed,
    Group::RoadAreasCar,
    Group::RoadAreasPed,
    Group::Rails,
    Group::Buildings,
    Group::Waterways,
    Group::WaterAreas,
    Group::Other,
];

impl Group {
    /// Report identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::RoadsCar => "roads_car",
            Group::RoadsPed => "roads_ped",
            Group::RoadAreasCar => "road_areas_car",
            Group::RoadAreasPed => "road_areas_ped",
            Group::Rails => "rails",
            Group::Buildings => "buildings",
            Group::Waterways => "waterways",
            Group::WaterAreas => "water_areas",
            Group::Other => "other",
        }
    }

    /// Filename fragment (underscores become dashes).
    pub fn file_slug(&self) -> &'static str {
        match self {
            Group::RoadsCar => "roads-car",
            Group::RoadsPed => "roads-ped",
            Group::RoadAreasCar => "road-areas-car",
            Group::RoadAreasPed => "road-areas-ped",
            Group::Rails => "rails",
            Group::Buildings => "buildings",
            Group::Waterways => "waterways",
            Group::WaterAreas => "water-areas",
            Group::Other => "other",
        }
    }

    /// Position in [`GROUP_ORDER`].
    pub fn order_index(&self) -> usize {
        GROUP_ORDER.iter().position(|g| g == self).unwrap_or(GROUP_ORDER.len())
    }
}

fn is_pedestrian(name: &str) -> bool {
    name.ends_with("::pedestrian")
}

/// Map an object name to its group. `None` means the object is dropped
/// entirely (building entrances carry no tactile geometry).
pub fn classify_object(name: &str) -> Option<Group> {
    if name.starts_with("BuildingEntrance") {
        return None;
    }
    if name.starts_with("Building") {
        return Some(Group::Buildings);
    }
    if name.starts_with("RoadArea") {
        return Some(if is_pedestrian(name) {
            Group::RoadAreasPed
        } else {
            Group::RoadAreasCar
        });
    }
    if name.starts_with("Road") {
        return Some(if is_pedestrian(name) {
            Group::RoadsPed
        } else {
            Group::RoadsCar
        });
    }
    if name.starts_with("Rail") {
        return Some(Group::Rails);
    }
    if name.starts_with("Waterway") || name.starts_with("River") {
        return Some(Group::Waterways);
    }
    if name.starts_with("Water") || name.starts_with("AreaFountain") {
        return Some(Group::WaterAreas);
    }
    Some(Group::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_order_matters() {
        // BuildingEntrance must win over the Building prefix, RoadArea
        // over Road, Waterway over Water.
        assert_eq!(classify_object("BuildingEntrance.003"), None);
        assert_eq!(classify_object("Building.003"), Some(Group::Buildings));
        assert_eq!(classify_object("RoadArea.1"), Some(Group::RoadAreasCar));
        assert_eq!(classify_object("Road.1"), Some(Group::RoadsCar));
        assert_eq!(classify_object("Waterway.2"), Some(Group::Waterways));
        assert_eq!(classify_object("Water.2"), Some(Group::WaterAreas));
    }

    #[test]
    fn pedestrian_suffix_splits_roads() {
        assert_eq!(classify_object("Road.5::pedestrian"), Some(Group::RoadsPed));
        assert_eq!(
            classify_object("RoadArea.5::pedestrian"),
            Some(Group::RoadAreasPed)
        );
        assert_eq!(classify_object("Rail.1::pedestrian"), Some(Group::Rails));
    }

    #[test]
    fn unknown_names_fall_through_to_other() {
        assert_eq!(classify_object("Terrain"), Some(Group::Other));
        assert_eq!(classify_object("null"), Some(Group::Other));
        assert_eq!(classify_object("River.1"), Some(Group::Waterways));
        assert_eq!(classify_object("AreaFountain.2"), Some(Group::WaterAreas));
    }

    #[test]
    fn slugs_match_order() {
        assert_eq!(GROUP_ORDER[0].as_str(), "roads_car");
        assert_eq!(GROUP_ORDER[7].file_slug(), "water-areas");
        assert_eq!(Group::WaterAreas.order_index(), 7);
        assert_eq!(Group::Other.order_index(), 8);
    }
}
