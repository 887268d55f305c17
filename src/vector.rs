// src/vector.rs

use glam::DVec3;

/// Homogeneous coordinate triple (X, Y, Z).
///
/// No scale is fixed; points are normalized to unit length only where the
/// kernel says so (after projection, after an addition, seeds).
pub type Point3 = DVec3;

pub const THIRD: f64 = 1.0 / 3.0;

#[inline]
pub fn sqr(x: f64) -> f64 {
    x * x
}

#[inline]
pub fn cube(x: f64) -> f64 {
    x * x * x
}

/// Scale `p` to unit length in place and return the length it had.
///
/// A zero vector is left untouched.
pub fn normalize(p: &mut Point3) -> f64 {
    let len = p.length();
    if len > 0.0 {
        *p *= 1.0 / len;
    }
    len
}

/// p += fac * d
#[inline]
pub fn multadd(p: &mut Point3, fac: f64, d: Point3) {
    *p += fac * d;
}

/// Flip the whole triple when Z is negative. Same projective point.
#[inline]
pub fn with_nonnegative_z(p: Point3) -> Point3 {
    if p.z < 0.0 {
        -p
    } else {
        p
    }
}

/// Flatten a polyline into xyz triples for the JS side.
pub fn flatten(points: &[Point3]) -> Vec<f64> {
    points.iter().flat_map(|p| p.to_array()).collect()
}
