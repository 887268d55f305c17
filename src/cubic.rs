// src/cubic.rs

use core::f64::consts::PI;

use crate::error::CurveError;
use crate::vector::{cube, sqr, THIRD};

/// Below this |p| the trigonometric form divides by (almost) zero.
const DEGENERATE_P: f64 = 1e-12;

/// Distinct real roots of x^3 + p x + q = 0, ascending (Cardano).
///
/// Three cases on delta = (q/2)^2 + (p/3)^3:
///   - delta == 0: triple root 0, or a simple and a double root
///   - delta > 0:  one real root
///   - delta < 0:  three real roots, trigonometric form
pub fn solve_depressed_cubic(p: f64, q: f64) -> Result<Vec<f64>, CurveError> {
    if !p.is_finite() || !q.is_finite() {
        return Err(CurveError::InvalidParameter);
    }

    let delta = sqr(0.5 * q) + cube(THIRD * p);

    if delta == 0.0 {
        if q == 0.0 {
            return Ok(vec![0.0]);
        }
        let x1 = (-4.0 * q).cbrt();
        return Ok(sorted(vec![x1, -0.5 * x1]));
    }

    if delta > 0.0 {
        let sqrtd = delta.sqrt();
        let u = (-0.5 * q + sqrtd).cbrt();
        let v = (-0.5 * q - sqrtd).cbrt();
        return Ok(vec![u + v]);
    }

    // delta < 0 forces p < 0; a vanishing p here is a numeric fault.
    if p.abs() < DEGENERATE_P {
        return Err(CurveError::DegenerateCubic);
    }

    let f = (-4.0 * THIRD * p).sqrt();
    let cos_arg = (-0.5 * q * cube(-3.0 / p).sqrt()).clamp(-1.0, 1.0);
    let alpha = THIRD * cos_arg.acos();

    let roots = vec![
        f * alpha.cos(),
        -f * (alpha + THIRD * PI).cos(),
        -f * (alpha - THIRD * PI).cos(),
    ];
    if roots.iter().any(|r| !r.is_finite()) {
        return Err(CurveError::DegenerateCubic);
    }
    Ok(sorted(roots))
}

fn sorted(mut roots: Vec<f64>) -> Vec<f64> {
    roots.sort_by(f64::total_cmp);
    roots
}
