//! Geometry kernel for straight segments and circles
//!
//! Pure functions, no state. Degenerate input (parallel lines, zero-length
//! segments) is reported as "no hit" rather than as an error.

use glam::DVec2;

use crate::consts::{ON_SEGMENT_TOLERANCE, SEGMENT_EPSILON};

/// Intersection of segment `p1`-`p2` with segment `p3`-`p4`
///
/// Both segment parameters must lie strictly inside `(ε, 1 - ε)`, so touching
/// an endpoint does not count. This keeps a ray that starts on an edge (or
/// passes exactly through a shared vertex) from being hit twice.
pub fn segment_intersect(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return None; // Parallel or collinear
    }

    let u_a = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let u_b = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;

    // NaN fails every comparison, so undefined parameters fall through as a miss
    let inside = |u: f64| u > SEGMENT_EPSILON && u < 1.0 - SEGMENT_EPSILON;
    if inside(u_a) && inside(u_b) {
        Some(p1 + u_a * (p2 - p1))
    } else {
        None
    }
}

/// Whether `q` lies on segment `p1`-`p2`
///
/// Triangle inequality check: |q - p1| + |q - p2| equals the segment length
/// only for points between the endpoints.
#[inline]
pub fn point_on_segment(p1: DVec2, p2: DVec2, q: DVec2) -> bool {
    let len = p1.distance(p2);
    let sum = q.distance(p1) + q.distance(p2);
    sum >= len - ON_SEGMENT_TOLERANCE && sum <= len + ON_SEGMENT_TOLERANCE
}

/// First point where segment `p1`-`p2` enters the circle
///
/// The circle centre is projected onto the line through the segment. The
/// segment counts as a hit only when that closest point lies on the finite
/// segment and within `radius` of the centre. The returned point is where
/// the segment crosses the circle on its way in, or `p1` when the segment
/// already starts inside (`p1` is then not on the circle).
pub fn segment_circle_intersect(p1: DVec2, p2: DVec2, center: DVec2, radius: f64) -> Option<DVec2> {
    let seg = p2 - p1;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return None; // Degenerate segment
    }

    let t = (center - p1).dot(seg) / len_sq;
    let closest = p1 + seg * t;

    if !point_on_segment(p1, p2, closest) {
        return None;
    }

    let dist_sq = closest.distance_squared(center);
    if dist_sq > radius * radius {
        return None;
    }

    // Back off from the closest point to the entry crossing
    let half_chord = (radius * radius - dist_sq).sqrt();
    let len = len_sq.sqrt();
    let t_entry = (t - half_chord / len).max(0.0);
    Some(p1 + seg * t_entry)
}

/// Unit normal of an edge: the edge vector rotated a quarter turn, `(ey, -ex)`
#[inline]
pub fn edge_normal(edge: DVec2) -> DVec2 {
    DVec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Reflect a direction off an edge
///
/// Standard reflection: d' = d - 2(d·n)n
#[inline]
pub fn reflect(direction: DVec2, edge: DVec2) -> DVec2 {
    let normal = edge_normal(edge);
    direction - 2.0 * direction.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_segment_intersect_cross() {
        let hit = segment_intersect(v(0.0, 0.0), v(10.0, 10.0), v(0.0, 10.0), v(10.0, 0.0));
        let hit = hit.expect("diagonals should cross");
        assert!((hit - v(5.0, 5.0)).length() < 1e-9);
    }

    #[test]
    fn test_segment_intersect_parallel() {
        assert!(segment_intersect(v(0.0, 0.0), v(10.0, 0.0), v(0.0, 1.0), v(10.0, 1.0)).is_none());
        // Collinear overlap is also a miss
        assert!(segment_intersect(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 0.0), v(15.0, 0.0)).is_none());
    }

    #[test]
    fn test_segment_intersect_endpoint_touch_excluded() {
        // Second segment starts exactly on the first
        assert!(segment_intersect(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 0.0), v(5.0, 10.0)).is_none());
        // Shared vertex
        assert!(segment_intersect(v(0.0, 0.0), v(10.0, 0.0), v(10.0, 0.0), v(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_segment_intersect_zero_length() {
        assert!(segment_intersect(v(3.0, 3.0), v(3.0, 3.0), v(0.0, 0.0), v(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_segment_intersect_short_of_edge() {
        assert!(segment_intersect(v(0.0, 0.0), v(4.0, 0.0), v(5.0, -5.0), v(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_point_on_segment() {
        assert!(point_on_segment(v(0.0, 0.0), v(10.0, 0.0), v(4.0, 0.0)));
        assert!(point_on_segment(v(0.0, 0.0), v(10.0, 0.0), v(0.0, 0.0)));
        assert!(!point_on_segment(v(0.0, 0.0), v(10.0, 0.0), v(11.0, 0.0)));
        assert!(!point_on_segment(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 1.0)));
    }

    #[test]
    fn test_segment_circle_entry_point() {
        let hit = segment_circle_intersect(v(100.0, 300.0), v(100.0, -400.0), v(100.0, 100.0), 15.0);
        let hit = hit.expect("segment passes through the circle");
        assert!((hit - v(100.0, 115.0)).length() < 1e-9);
    }

    #[test]
    fn test_segment_circle_grazing() {
        // Tangent line at distance exactly r
        let hit = segment_circle_intersect(v(0.0, 10.0), v(20.0, 10.0), v(10.0, 0.0), 10.0);
        let hit = hit.expect("tangent counts as a hit");
        assert!((hit - v(10.0, 10.0)).length() < 1e-9);

        assert!(segment_circle_intersect(v(0.0, 11.0), v(20.0, 11.0), v(10.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_segment_circle_closest_point_off_segment() {
        // Segment stops before reaching the circle centre's projection
        assert!(segment_circle_intersect(v(0.0, 0.0), v(5.0, 0.0), v(20.0, 0.0), 3.0).is_none());
    }

    #[test]
    fn test_segment_circle_starts_inside() {
        let hit = segment_circle_intersect(v(9.0, 0.0), v(30.0, 0.0), v(10.0, 0.0), 5.0);
        assert_eq!(hit, Some(v(9.0, 0.0)));
    }

    #[test]
    fn test_segment_circle_degenerate() {
        assert!(segment_circle_intersect(v(1.0, 1.0), v(1.0, 1.0), v(1.0, 1.0), 5.0).is_none());
    }

    #[test]
    fn test_reflect_off_horizontal_edge() {
        let reflected = reflect(v(0.0, -10.0), v(100.0, 0.0));
        assert!((reflected - v(0.0, 10.0)).length() < 1e-12);
    }

    #[test]
    fn test_reflect_is_independent_of_edge_direction() {
        let d = v(3.0, -4.0);
        let a = reflect(d, v(1.0, 1.0));
        let b = reflect(d, v(-1.0, -1.0));
        assert!((a - b).length() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_reflection_law(
            dx in -100.0f64..100.0, dy in -100.0f64..100.0,
            ex in -100.0f64..100.0, ey in -100.0f64..100.0,
        ) {
            let d = v(dx, dy);
            let e = v(ex, ey);
            prop_assume!(e.length() > 1e-3);
            let n = edge_normal(e);
            let r = reflect(d, e);

            // Equal angle to the normal, mirrored side
            prop_assert!((r.dot(n) + d.dot(n)).abs() < 1e-9);
            // Tangential component unchanged
            let t = e.normalize();
            prop_assert!((r.dot(t) - d.dot(t)).abs() < 1e-9);
            // Length preserved
            prop_assert!((r.length() - d.length()).abs() < 1e-9);
        }

        #[test]
        fn prop_intersection_lies_on_both_segments(
            x1 in 0.0f64..100.0, y1 in 0.0f64..100.0,
            x2 in 0.0f64..100.0, y2 in 0.0f64..100.0,
            x3 in 0.0f64..100.0, y3 in 0.0f64..100.0,
            x4 in 0.0f64..100.0, y4 in 0.0f64..100.0,
        ) {
            let (p1, p2, p3, p4) = (v(x1, y1), v(x2, y2), v(x3, y3), v(x4, y4));
            if let Some(hit) = segment_intersect(p1, p2, p3, p4) {
                prop_assert!(point_on_segment(p1, p2, hit));
                prop_assert!(point_on_segment(p3, p4, hit));
            }
        }
    }
}
