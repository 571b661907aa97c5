// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangular Sutherland–Hodgman clipping.
//!
//! A triangle is clipped against the four half-planes of an axis-aligned
//! rectangle in a fixed order. Intersection points that land within an
//! epsilon of the perpendicular bounds are snapped exactly onto them so
//! that later quantization does not keep near-miss slivers alive.

use nalgebra::Point2;
use smallvec::SmallVec;

/// Axis-aligned clip rectangle in plane coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ClipRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ClipRect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        ClipRect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Largest rectangle dimension, floored at 1, used to scale epsilons.
    pub fn extent(&self) -> f64 {
        (self.max_x - self.min_x).max(self.max_y - self.min_y).max(1.0)
    }
}

/// Twice the signed area of triangle `abc`. Positive for counter-clockwise
/// winding in the working plane.
pub fn signed_area2(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// A clipped convex polygon: at most 7 vertices for a triangle against
/// four half-planes.
pub type ClipPolygon = SmallVec<[Point2<f64>; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane {
    XMin,
    XMax,
    YMin,
    YMax,
}

const PLANES: [Plane; 4] = [Plane::XMin, Plane::XMax, Plane::YMin, Plane::YMax];

fn inside(v: Point2<f64>, plane: Plane, rect: &ClipRect, eps: f64) -> bool {
    match plane {
        Plane::XMin => v.x >= rect.min_x - eps,
        Plane::XMax => v.x <= rect.max_x + eps,
        Plane::YMin => v.y >= rect.min_y - eps,
        Plane::YMax => v.y <= rect.max_y + eps,
    }
}

/// Intersection of segment `ab` with a half-plane boundary. Returns
/// `None` when the segment runs parallel within epsilon; the clipping
/// loop then drops the crossing rather than inventing a point.
fn intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    plane: Plane,
    rect: &ClipRect,
    eps: f64,
) -> Option<Point2<f64>> {
    match plane {
        Plane::XMin | Plane::XMax => {
            let k = if plane == Plane::XMin { rect.min_x } else { rect.max_x };
            let den = b.x - a.x;
            if den.abs() < eps {
                return None;
            }
            let t = ((k - a.x) / den).clamp(0.0, 1.0);
            let mut y = a.y + t * (b.y - a.y);
            if (y - rect.min_y).abs() <= eps {
                y = rect.min_y;
            } else if (y - rect.max_y).abs() <= eps {
                y = rect.max_y;
            }
            Some(Point2::new(k, y))
        }
        Plane::YMin | Plane::YMax => {
            let k = if plane == Plane::YMin { rect.min_y } else { rect.max_y };
            let den = b.y - a.y;
            if den.abs() < eps {
                return None;
            }
            let t = ((k - a.y) / den).clamp(0.0, 1.0);
            let mut x = a.x + t * (b.x - a.x);
            if (x - rect.min_x).abs() <= eps {
                x = rect.min_x;
            } else if (x - rect.max_x).abs() <= eps {
                x = rect.max_x;
            }
            Some(Point2::new(x, k))
        }
    }
}

fn clip_against_plane(poly: &ClipPolygon, plane: Plane, rect: &ClipRect, eps: f64) -> ClipPolygon {
    let mut out = ClipPolygon::new();
    if poly.is_empty() {
        return out;
    }

    let mut prev = poly[poly.len() - 1];
    let mut prev_inside = inside(prev, plane, rect, eps);

    for &curr in poly.iter() {
        let curr_inside = inside(curr, plane, rect, eps);
        if curr_inside {
            if !prev_inside {
                if let Some(p) = intersection(prev, curr, plane, rect, eps) {
                    out.push(p);
                }
            }
            out.push(curr);
        } else if prev_inside {
            if let Some(p) = intersection(prev, curr, plane, rect, eps) {
                out.push(p);
            }
        }
        prev = curr;
        prev_inside = curr_inside;
    }
    out
}

/// Clip a triangle against the rectangle. The result is a convex polygon
/// with zero or at least three vertices.
pub fn clip_triangle(tri: [Point2<f64>; 3], rect: &ClipRect, eps: f64) -> ClipPolygon {
    let mut poly: ClipPolygon = tri.iter().copied().collect();
    for plane in PLANES {
        poly = clip_against_plane(&poly, plane, rect, eps);
        if poly.is_empty() {
            break;
        }
    }
    poly
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect() -> ClipRect {
        ClipRect::new(0.0, 0.0, 10.0, 10.0)
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn fully_inside_triangle_is_unchanged() {
        let tri = [
            Point2::new(1.0, 1.0),
            Point2::new(4.0, 1.0),
            Point2::new(1.0, 4.0),
        ];
        let poly = clip_triangle(tri, &rect(), EPS);
        assert_eq!(poly.len(), 3);
        assert_relative_eq!(poly[0].x, 1.0);
        assert_relative_eq!(poly[2].y, 4.0);
    }

    #[test]
    fn fully_outside_triangle_clips_to_empty() {
        let tri = [
            Point2::new(20.0, 1.0),
            Point2::new(24.0, 1.0),
            Point2::new(20.0, 4.0),
        ];
        assert!(clip_triangle(tri, &rect(), EPS).is_empty());
    }

    #[test]
    fn edge_straddling_triangle_gets_one_point_per_crossing() {
        // Crosses max_x only; two edges intersect x=10.
        let tri = [
            Point2::new(8.0, 2.0),
            Point2::new(12.0, 2.0),
            Point2::new(8.0, 6.0),
        ];
        let poly = clip_triangle(tri, &rect(), EPS);
        assert_eq!(poly.len(), 4);
        let on_bound = poly.iter().filter(|p| p.x == 10.0).count();
        assert_eq!(on_bound, 2);

        // Winding sign must survive the clip.
        let orig = signed_area2(tri[0], tri[1], tri[2]);
        let clipped = signed_area2(poly[0], poly[1], poly[2]);
        assert!(orig * clipped > 0.0);
    }

    #[test]
    fn corner_overlap_produces_quad_on_rect_corner() {
        let tri = [
            Point2::new(8.0, 8.0),
            Point2::new(14.0, 8.0),
            Point2::new(8.0, 14.0),
        ];
        let poly = clip_triangle(tri, &rect(), EPS);
        assert!(poly.len() >= 4);
        for p in &poly {
            assert!(p.x <= 10.0 + EPS && p.y <= 10.0 + EPS);
        }
    }

    #[test]
    fn near_bound_intersections_snap_exactly() {
        // The crossing of x=10 lands within eps of y=0 and must snap to 0.
        let eps = 1e-6;
        let tri = [
            Point2::new(9.0, eps / 2.0),
            Point2::new(11.0, eps / 2.0),
            Point2::new(9.0, 5.0),
        ];
        let poly = clip_triangle(tri, &rect(), eps);
        assert!(poly.iter().any(|p| p.x == 10.0 && p.y == 0.0));
    }
}
