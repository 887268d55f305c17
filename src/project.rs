// src/project.rs

use crate::curve::Curve;
use crate::vector::{multadd, normalize, Point3};

/// Newton iteration cap used by `Curve::project`.
pub const MAX_PROJECTION_ITERATIONS: usize = 20;

/// Residual a picked point must reach to count as on the curve.
pub const PICK_TOLERANCE: f64 = 1.0e-14;

/// Picked points may sit this far below Z=0 and still snap to infinity.
const PICK_MIN_Z: f64 = -0.01;

/// Picks farther than this from the origin miss the sphere.
const PICK_MAX_RADIUS: f64 = 1.01;

/// Outcome of a Newton projection. `point` is unit length, except for a
/// zero or non-finite input, which has no projection and is returned as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Point3,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl Curve {
    /// Pull `point` onto the curve until |distance| < tolerance.
    ///
    /// Never fails: after the iteration cap the best effort is returned
    /// with `converged == false` and a warning is logged.
    pub fn project(&self, point: Point3, tolerance: f64) -> Projection {
        let proj = self.project_with(point, tolerance, MAX_PROJECTION_ITERATIONS);
        if !proj.converged {
            log::warn!(
                "cannot project point {} onto curve in {} iterations, residual {:e}",
                point,
                MAX_PROJECTION_ITERATIONS,
                proj.residual
            );
        }
        proj
    }

    pub(crate) fn project_with(
        &self,
        point: Point3,
        tolerance: f64,
        max_iterations: usize,
    ) -> Projection {
        if !point.is_finite() || point == Point3::ZERO {
            return Projection {
                point,
                residual: f64::NAN,
                iterations: 0,
                converged: false,
            };
        }

        let mut p = point;
        for i in 0..max_iterations {
            // Tolerance is judged on the unit representative that is returned.
            let mut candidate = p;
            normalize(&mut candidate);
            let residual = self.distance(candidate);
            if residual.abs() < tolerance {
                return Projection {
                    point: candidate,
                    residual,
                    iterations: i,
                    converged: true,
                };
            }

            let d = self.distance(p);
            let g = self.gradient(p);
            multadd(&mut p, -d / g.length_squared(), g);
        }

        normalize(&mut p);
        Projection {
            point: p,
            residual: self.distance(p),
            iterations: max_iterations,
            converged: false,
        }
    }

    /// Snap a picked location near the unit sphere onto the curve.
    ///
    /// Returns `None` when the projection does not reach `PICK_TOLERANCE`
    /// or lands clearly on the lower hemisphere. Hits at or below Z=0 are
    /// the point at infinity (0, ±1, 0).
    pub fn pick(&self, point: Point3) -> Option<Point3> {
        let proj = self.project_with(point, PICK_TOLERANCE, MAX_PROJECTION_ITERATIONS);
        let p = proj.point;

        if p.z < PICK_MIN_Z || !(proj.residual.abs() < PICK_TOLERANCE) {
            log::debug!("pick at {} missed the curve (residual {:e})", point, proj.residual);
            return None;
        }
        if p.z <= 0.0 {
            return Some(Point3::new(0.0, p.y.signum(), 0.0));
        }
        Some(p)
    }
}

/// Where a view ray touches the unit sphere, for picking.
///
/// If the ray passes within `[1, 1.01)` of the origin its closest point is
/// used; inside the sphere the intersection on the Z >= 0 side wins.
pub fn sphere_pick_point(origin: Point3, direction: Point3) -> Option<Point3> {
    let dir = direction.try_normalize()?;
    let closest = origin - origin.dot(dir) * dir;
    let dist = closest.length();

    if dist >= PICK_MAX_RADIUS {
        return None;
    }
    if dist >= 1.0 {
        return Some(closest);
    }

    let half_chord = (1.0 - dist * dist).sqrt();
    let near = closest - half_chord * dir;
    let far = closest + half_chord * dir;
    Some(if near.z >= 0.0 { near } else { far })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_projection_reaches_tolerance() {
        let curve = Curve::weierstrass(-1.0, 0.0).unwrap();
        for start in [
            Point3::new(1.2, 0.3, 1.0),
            Point3::new(-0.4, 0.35, 1.0),
            Point3::new(2.0, 2.5, 1.0),
        ] {
            let proj = curve.project(start, 1e-12);
            assert!(proj.converged, "{}", start);
            assert!(curve.distance(proj.point).abs() < 1e-12);
            assert_abs_diff_eq!(proj.point.length(), 1.0, epsilon = 1e-14);
            assert_eq!(proj.residual, curve.distance(proj.point));
        }
    }

    #[test]
    fn test_reprojection_is_idempotent() {
        let curve = Curve::edwards(-1.0).unwrap();
        let first = curve.project(Point3::new(0.8, 0.5, 1.0), 1e-10);
        let second = curve.project(first.point, 1e-10);
        assert!(second.converged);
        assert_eq!(second.iterations, 0);
        assert!((second.point - first.point).length() < 1e-10);
    }

    #[test]
    fn test_exhausted_iterations_return_best_effort() {
        let curve = Curve::weierstrass(-1.0, 1.0).unwrap();
        let proj = curve.project_with(Point3::new(5.0, 1.0, 1.0), 1e-12, 1);
        assert!(!proj.converged);
        assert_eq!(proj.iterations, 1);
        assert_abs_diff_eq!(proj.point.length(), 1.0, epsilon = 1e-14);
        assert!(proj.residual.is_finite());
    }

    #[test]
    fn test_zero_vector_has_no_projection() {
        let curve = Curve::weierstrass(-1.0, 1.0).unwrap();
        let proj = curve.project(Point3::ZERO, 1e-12);
        assert!(!proj.converged);
        assert_eq!(proj.point, Point3::ZERO);
        assert!(proj.residual.is_nan());
        assert_eq!(curve.pick(Point3::ZERO), None);

        let nan = curve.project(Point3::new(f64::NAN, 0.0, 1.0), 1e-12);
        assert!(!nan.converged);
    }

    #[test]
    fn test_pick_near_curve() {
        // (1, 1) lies on y^2 = x^3 - x + 1
        let curve = Curve::weierstrass(-1.0, 1.0).unwrap();
        let target = Point3::new(1.0, 1.0, 1.0).normalize();
        let hit = curve.pick(target + Point3::new(0.003, -0.002, 0.001)).unwrap();
        assert!(curve.distance(hit).abs() < PICK_TOLERANCE);
        assert!((hit - target).length() < 0.01);
    }

    #[test]
    fn test_pick_snaps_to_infinity() {
        let curve = Curve::weierstrass(-1.0, 1.0).unwrap();
        let hit = curve.pick(Point3::new(0.0, 1.0, -0.001)).unwrap();
        assert_abs_diff_eq!(hit.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hit.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_pick_point() {
        // ray along -Z through (0.6, 0, *) hits the upper hemisphere at z = 0.8
        let hit = sphere_pick_point(Point3::new(0.6, 0.0, 5.0), Point3::new(0.0, 0.0, -1.0)).unwrap();
        assert_abs_diff_eq!(hit.z, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.length(), 1.0, epsilon = 1e-12);

        // grazing ray just outside the sphere
        let hit = sphere_pick_point(Point3::new(1.005, 0.0, 5.0), Point3::new(0.0, 0.0, -2.0)).unwrap();
        assert_abs_diff_eq!(hit.x, 1.005, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.z, 0.0, epsilon = 1e-12);

        assert!(sphere_pick_point(Point3::new(1.5, 0.0, 5.0), Point3::new(0.0, 0.0, -1.0)).is_none());
        assert!(sphere_pick_point(Point3::ZERO, Point3::ZERO).is_none());
    }
}
