// File: crates/series-reduce/src/geometry.rs
// Summary: Lightweight 2D geometry helpers for polyline simplification.

use crate::types::Sample;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<&Sample> for Coordinate {
    fn from(s: &Sample) -> Self { Self::new(s.timestamp as f64, s.value) }
}

/// Distance from `p` to the segment `a`-`b` (not the infinite line).
pub fn distance_point_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b { return p.distance(a); }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    // projection factor of p onto ab
    let r = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2;
    if r <= 0.0 { return p.distance(a); }
    if r >= 1.0 { return p.distance(b); }
    let s = ((a.y - p.y) * dx - (a.x - p.x) * dy) / len2;
    s.abs() * len2.sqrt()
}

/// Douglas–Peucker: returns a keep-mask; every dropped vertex lies within
/// `tolerance` of the simplified polyline. Endpoints are always kept.
pub fn douglas_peucker(pts: &[Coordinate], tolerance: f64) -> Vec<bool> {
    let n = pts.len();
    let mut keep = vec![true; n];
    if n < 3 { return keep; }

    // explicit stack: series can have millions of vertices
    let mut sections = vec![(0usize, n - 1)];
    while let Some((i, j)) = sections.pop() {
        if i + 1 >= j { continue; }
        let mut max_dist = -1.0f64;
        let mut max_idx = i;
        for k in (i + 1)..j {
            let d = distance_point_segment(&pts[k], &pts[i], &pts[j]);
            if d > max_dist {
                max_dist = d;
                max_idx = k;
            }
        }
        if max_dist <= tolerance {
            for flag in &mut keep[(i + 1)..j] { *flag = false; }
        } else {
            sections.push((max_idx, j));
            sections.push((i, max_idx));
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_collapses_to_endpoints() {
        let pts: Vec<_> = (0..5).map(|i| Coordinate::new(i as f64, i as f64)).collect();
        let keep = douglas_peucker(&pts, 10.0);
        assert_eq!(keep, vec![true, false, false, false, true]);
    }

    #[test]
    fn two_points_untouched() {
        let pts = [Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        assert_eq!(douglas_peucker(&pts, 10.0), vec![true, true]);
    }

    #[test]
    fn peak_survives_small_tolerance() {
        let pts = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 5.0),
            Coordinate::new(2.0, 0.0),
        ];
        assert_eq!(douglas_peucker(&pts, 1.0), vec![true, true, true]);
        assert_eq!(douglas_peucker(&pts, 6.0), vec![true, false, true]);
    }

    #[test]
    fn distance_clamps_to_segment_ends() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(2.0, 0.0);
        assert!((distance_point_segment(&Coordinate::new(1.0, 3.0), &a, &b) - 3.0).abs() < 1e-12);
        assert!((distance_point_segment(&Coordinate::new(5.0, 4.0), &a, &b) - 5.0).abs() < 1e-12);
        assert!((distance_point_segment(&Coordinate::new(-3.0, 4.0), &a, &a) - 5.0).abs() < 1e-12);
    }
}
