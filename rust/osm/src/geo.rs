// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geodesic helpers for the pruning budget.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Lon/lat rectangle selecting the mapped area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        }
    }

    /// All coordinates finite and min strictly below max on both axes.
    pub fn is_valid(&self) -> bool {
        self.lon_min.is_finite()
            && self.lat_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_max.is_finite()
            && self.lon_min < self.lon_max
            && self.lat_min < self.lat_max
    }
}

/// Haversine great-circle distance in meters.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Area of the bounded rectangle in square meters: the north-south edge
/// times the east-west edge measured at mid-latitude. Returns 0 for
/// non-finite input.
pub fn effective_area_m2(bounds: &GeoBounds) -> f64 {
    if !(bounds.lat_min.is_finite()
        && bounds.lat_max.is_finite()
        && bounds.lon_min.is_finite()
        && bounds.lon_max.is_finite())
    {
        return 0.0;
    }

    let ns_m = haversine_m(bounds.lat_min, bounds.lon_min, bounds.lat_max, bounds.lon_min);
    let lat_mid = (bounds.lat_min + bounds.lat_max) / 2.0;
    let ew_m = haversine_m(lat_mid, bounds.lon_min, lat_mid, bounds.lon_max);
    let area = (ns_m * ew_m).abs();
    if area.is_finite() {
        area
    } else {
        0.0
    }
}
