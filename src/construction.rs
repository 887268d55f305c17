// src/construction.rs

//! Auxiliary geometry for visualizing an addition: the chord between two
//! picked points is drawn as the great circle arc through them.

use crate::vector::Point3;

/// |p x q| below this means p and q span no plane.
const MIN_PLANE_NORMAL: f64 = 1.0e-8;

/// Polyline along the great circle from `p` towards `q`, with segments no
/// longer than `step` (measured at the radius of `p`).
///
/// Returns `None` when `p` and `q` are parallel or `step` is not positive.
pub fn great_circle_arc(p: Point3, q: Point3, step: f64) -> Option<Vec<Point3>> {
    let norm = p.cross(q);
    let sin = norm.length();
    if sin < MIN_PLANE_NORMAL || !(step > 0.0) {
        return None;
    }

    let angle = sin.atan2(p.dot(q));
    let p2 = (norm / sin).cross(p);

    let n = ((angle * p.length()) / step).ceil().max(1.0) as usize;
    Some(
        (0..=n)
            .map(|i| {
                let a = angle * i as f64 / n as f64;
                p * a.cos() + p2 * a.sin()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_circle() {
        let arc = great_circle_arc(Point3::X, Point3::Y, 0.1).unwrap();
        // pi/2 / 0.1 rounds up to 16 segments
        assert_eq!(arc.len(), 17);
        assert_abs_diff_eq!((arc[0] - Point3::X).length(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!((arc[16] - Point3::Y).length(), 0.0, epsilon = 1e-15);
        for v in &arc {
            assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-14);
            assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-15);
        }
        for w in arc.windows(2) {
            assert!((w[1] - w[0]).length() <= 0.1);
        }
    }

    #[test]
    fn test_arc_ends_on_direction_of_q() {
        let p = Point3::new(0.6, 0.0, 0.8);
        let q = Point3::new(0.0, 3.0, 0.0);
        let arc = great_circle_arc(p, q, 0.01).unwrap();
        let last = *arc.last().unwrap();
        assert_abs_diff_eq!((last - q.normalize()).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_points_have_no_arc() {
        assert!(great_circle_arc(Point3::X, -2.0 * Point3::X, 0.1).is_none());
        assert!(great_circle_arc(Point3::X, Point3::Y, 0.0).is_none());
    }
}
