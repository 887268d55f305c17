// src/curve.rs

use core::fmt;

use crate::cubic::solve_depressed_cubic;
use crate::error::CurveError;
use crate::vector::{cube, normalize, sqr, with_nonnegative_z, Point3};

/// |normal.y| above this selects the Z=1 chart in Weierstrass addition.
/// A numerical stability heuristic, see `Curve::add_with_threshold`.
pub const DEFAULT_CHART_THRESHOLD: f64 = 0.1;

/// Neutral element of the Weierstrass group, the point at infinity.
pub const WEIERSTRASS_NEUTRAL: Point3 = Point3::new(0.0, 1.0, 0.0);

/// Relative squared length of p x q under which p and q are the same
/// projective point.
const SAME_POINT_EPS: f64 = 1e-24;

/// A seed whose unit-length gradient is shorter than this is singular.
const SINGULAR_GRADIENT: f64 = 1e-10;

/// A unit-length sum with a larger residual is checked against the
/// alternative formula, and the one closer to the curve is kept.
const SUM_RESIDUAL: f64 = 1e-10;

/// Parameters of one of the two supported curve families.
///
/// - Weierstrass: Z*Y^2 = X^3 + a*X*Z^2 + b*Z^3
/// - Edwards:     (X^2 + Y^2)*Z^2 = Z^4 + d*X^2*Y^2
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveParameters {
    Weierstrass { a: f64, b: f64 },
    Edwards { d: f64 },
}

impl CurveParameters {
    pub fn is_finite(&self) -> bool {
        match *self {
            CurveParameters::Weierstrass { a, b } => a.is_finite() && b.is_finite(),
            CurveParameters::Edwards { d } => d.is_finite(),
        }
    }
}

/// Sum of two points, plus the chord/tangent the sum was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditionResult {
    pub point: Point3,
    /// Homogeneous line (u, v, w) through both summands. Weierstrass only.
    pub normal: Option<Point3>,
}

impl AdditionResult {
    /// Third intersection of the chord with the curve, i.e. the sum
    /// mirrored at Y=0. Only meaningful where a chord exists.
    pub fn third_intersection(&self) -> Option<Point3> {
        self.normal
            .map(|_| Point3::new(self.point.x, -self.point.y, self.point.z))
    }
}

/// An elliptic curve in the projective plane.
///
/// Immutable once built: parameters are validated and the seed points
/// every branch is traced from are derived in `Curve::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    params: CurveParameters,

    // Derived
    seeds: Vec<Point3>,
}

impl Curve {
    /// Validate parameters and derive seed points.
    pub fn new(params: CurveParameters) -> Result<Self, CurveError> {
        if !params.is_finite() {
            return Err(CurveError::InvalidParameter);
        }

        let seeds = match params {
            // Weierstrass branches all cross Y=0 at the real roots of x^3 + a x + b.
            CurveParameters::Weierstrass { a, b } => solve_depressed_cubic(a, b)?
                .into_iter()
                .map(|x| Point3::new(x, 0.0, 1.0))
                .collect(),
            CurveParameters::Edwards { d } => {
                let mut seeds = vec![Point3::new(-1.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0)];
                if d >= 1.0 {
                    seeds.push(Point3::new(0.0, -1.0, 1.0));
                    seeds.push(Point3::new(0.0, 1.0, 1.0));
                }
                seeds
            }
        };

        let curve = Self { params, seeds };
        for seed in &curve.seeds {
            let mut unit = *seed;
            normalize(&mut unit);
            if curve.gradient(unit).length() < SINGULAR_GRADIENT {
                return Err(CurveError::InvalidParameter);
            }
        }
        Ok(curve)
    }

    pub fn weierstrass(a: f64, b: f64) -> Result<Self, CurveError> {
        Self::new(CurveParameters::Weierstrass { a, b })
    }

    pub fn edwards(d: f64) -> Result<Self, CurveError> {
        Self::new(CurveParameters::Edwards { d })
    }

    /// Same curve traced from a different seed set.
    #[cfg(test)]
    pub(crate) fn with_seeds(&self, seeds: Vec<Point3>) -> Self {
        Self {
            params: self.params,
            seeds,
        }
    }

    #[inline]
    pub fn params(&self) -> CurveParameters {
        self.params
    }

    /// Seed points, one per place a branch crosses Y=0 (not normalized).
    #[inline]
    pub fn initial_points(&self) -> &[Point3] {
        &self.seeds
    }

    /// Cardano discriminant (b/2)^2 + (a/3)^3 of a Weierstrass curve.
    /// Negative means three real roots, i.e. the curve has an oval.
    pub fn discriminant(&self) -> Option<f64> {
        match self.params {
            CurveParameters::Weierstrass { a, b } => Some(sqr(0.5 * b) + cube(a / 3.0)),
            CurveParameters::Edwards { .. } => None,
        }
    }

    /// The implicit curve equation; zero exactly on the curve.
    pub fn distance(&self, p: Point3) -> f64 {
        match self.params {
            CurveParameters::Weierstrass { a, b } => {
                cube(p.x) + a * p.x * sqr(p.z) + b * cube(p.z) - p.z * sqr(p.y)
            }
            CurveParameters::Edwards { d } => {
                (sqr(p.x) + sqr(p.y)) * sqr(p.z) - sqr(sqr(p.z)) - d * sqr(p.x) * sqr(p.y)
            }
        }
    }

    /// Gradient of `distance`.
    pub fn gradient(&self, p: Point3) -> Point3 {
        match self.params {
            CurveParameters::Weierstrass { a, b } => weierstrass_gradient(a, b, p),
            CurveParameters::Edwards { d } => Point3::new(
                2.0 * p.x * sqr(p.z) - 2.0 * d * p.x * sqr(p.y),
                2.0 * p.y * sqr(p.z) - 2.0 * d * sqr(p.x) * p.y,
                2.0 * (sqr(p.x) + sqr(p.y)) * p.z - 4.0 * cube(p.z),
            ),
        }
    }

    /// Group law: p + q, normalized.
    pub fn add(&self, p: Point3, q: Point3) -> AdditionResult {
        self.add_with_threshold(p, q, DEFAULT_CHART_THRESHOLD)
    }

    /// Group law with an explicit chart-switch threshold.
    ///
    /// Weierstrass sums are solved in the chart Z=1 when |normal.y| exceeds
    /// `threshold`, otherwise in the chart Y=1. The threshold only trades
    /// numerical conditioning between the two; both charts give the same
    /// sum in exact arithmetic.
    ///
    /// If the preferred chart fails or lands off the curve, the other chart
    /// is tried as well. Edwards sums fall back to the unified formula the
    /// same way, which covers the pairs where the dedicated one is 0/0.
    pub fn add_with_threshold(&self, p: Point3, q: Point3, threshold: f64) -> AdditionResult {
        match self.params {
            CurveParameters::Weierstrass { a, b } => self.weierstrass_add(a, b, p, q, threshold),
            CurveParameters::Edwards { d } => AdditionResult {
                point: self.edwards_add(d, p, q),
                normal: None,
            },
        }
    }

    fn weierstrass_add(
        &self,
        a: f64,
        b: f64,
        p: Point3,
        q: Point3,
        threshold: f64,
    ) -> AdditionResult {
        // Tangent for doubling, chord otherwise.
        let normal = if same_point(p, q) {
            weierstrass_gradient(a, b, p)
        } else {
            p.cross(q)
        };

        let point = if is_weierstrass_neutral(p) {
            unit(q)
        } else if is_weierstrass_neutral(q) {
            unit(p)
        } else {
            let z_chart = normal.y.abs() > threshold;
            let preferred = sum_in_chart(a, b, p, q, normal, z_chart);
            self.closer_sum(preferred, || sum_in_chart(a, b, p, q, normal, !z_chart))
                // Vertical tangent at a 2-torsion point, or O + O.
                .unwrap_or(WEIERSTRASS_NEUTRAL)
        };

        AdditionResult {
            point,
            normal: Some(normal),
        }
    }

    fn edwards_add(&self, d: f64, p: Point3, q: Point3) -> Point3 {
        let sum = self
            .closer_sum(edwards_dedicated_sum(p, q), || edwards_unified_sum(d, p, q))
            // Only a singular point at infinity has no sum; it absorbs the other.
            .unwrap_or_else(|| if p.z.abs() < q.z.abs() { unit(p) } else { unit(q) });
        with_nonnegative_z(sum)
    }

    /// `first` if it is on the curve, else whichever of the two is closer.
    fn closer_sum(
        &self,
        first: Option<Point3>,
        second: impl FnOnce() -> Option<Point3>,
    ) -> Option<Point3> {
        match first {
            Some(r) if self.distance(r).abs() < SUM_RESIDUAL => Some(r),
            Some(r) => match second() {
                Some(s) if self.distance(s).abs() < self.distance(r).abs() => Some(s),
                _ => Some(r),
            },
            None => second(),
        }
    }

    /// Equation title as HTML, for the page subtitle.
    pub fn label_html(&self) -> String {
        match self.params {
            CurveParameters::Weierstrass { a, b } => {
                let mut s =
                    String::from("Weierstrass Curve Z&middot;Y<sup>2</sup> = X<sup>3</sup>");
                push_term(&mut s, a, "X&middot;Z<sup>2</sup>", "&middot;");
                push_term(&mut s, b, "Z<sup>3</sup>", "&middot;");
                s
            }
            CurveParameters::Edwards { d } => {
                let mut s = String::from(
                    "Edwards Curve (X<sup>2</sup> + Y<sup>2</sup>)&middot;Z<sup>2</sup> = Z<sup>4</sup>",
                );
                push_term(&mut s, d, "X<sup>2</sup>&middot;Y<sup>2</sup>", "&middot;");
                s
            }
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        match self.params {
            CurveParameters::Weierstrass { a, b } => {
                s.push_str("Z*Y^2 = X^3");
                push_term(&mut s, a, "X*Z^2", "*");
                push_term(&mut s, b, "Z^3", "*");
            }
            CurveParameters::Edwards { d } => {
                s.push_str("(X^2 + Y^2)*Z^2 = Z^4");
                push_term(&mut s, d, "X^2*Y^2", "*");
            }
        }
        f.write_str(&s)
    }
}

/// Append " + fac·term" to an equation, dropping zero terms and unit factors.
fn push_term(s: &mut String, fac: f64, term: &str, times: &str) {
    if fac == 0.0 {
        return;
    }
    let sign = if fac < 0.0 { " - " } else { " + " };
    s.push_str(sign);
    if fac.abs() != 1.0 {
        s.push_str(&fac.abs().to_string());
        s.push_str(times);
    }
    s.push_str(term);
}

fn weierstrass_gradient(a: f64, b: f64, p: Point3) -> Point3 {
    Point3::new(
        3.0 * sqr(p.x) + a * sqr(p.z),
        -2.0 * p.y * p.z,
        2.0 * a * p.x * p.z + 3.0 * b * sqr(p.z) - sqr(p.y),
    )
}

/// Same projective point, also when scaled differently.
fn same_point(p: Point3, q: Point3) -> bool {
    p == q || p.cross(q).length_squared() <= SAME_POINT_EPS * p.length_squared() * q.length_squared()
}

fn is_weierstrass_neutral(p: Point3) -> bool {
    p.z.abs() <= SAME_POINT_EPS.sqrt() * p.length()
}

fn sum_in_chart(
    a: f64,
    b: f64,
    p: Point3,
    q: Point3,
    n: Point3,
    z_chart: bool,
) -> Option<Point3> {
    let r = if z_chart {
        sum_in_z_chart(p, q, n)
    } else {
        sum_in_y_chart(a, b, p, q, n)
    };
    proper_point(r)
}

/// Unit representative, or `None` for a zero or non-finite result.
fn proper_point(r: Point3) -> Option<Point3> {
    if !r.is_finite() {
        return None;
    }
    r.try_normalize()
}

/// Chart (x, y, 1): the chord y = m x + c meets the cubic in three points
/// whose x sum to m^2. The sum is the third point mirrored at y=0.
fn sum_in_z_chart(p: Point3, q: Point3, n: Point3) -> Point3 {
    let s = n.x / n.y;
    let x1 = p.x / p.z;
    let x2 = q.x / q.z;
    let x3 = sqr(s) - x1 - x2;
    Point3::new(x3, (n.z + n.x * x3) / n.y, 1.0)
}

/// Chart (x, 1, z): substitute x = -(u1 + s z) into the curve, the three z
/// roots sum to (3 s^2 + a) u1 / (b - s^3 - a s).
fn sum_in_y_chart(a: f64, b: f64, p: Point3, q: Point3, n: Point3) -> Point3 {
    let s = n.z / n.x;
    let u1 = n.y / n.x;
    let z1 = p.z / p.y;
    let z2 = q.z / q.y;
    let z3 = (3.0 * sqr(s) + a) * u1 / (b - cube(s) - a * s) - z1 - z2;

    // Negate Y, then keep Z >= 0.
    if z3 < 0.0 {
        Point3::new((n.y + n.z * z3) / n.x, 1.0, -z3)
    } else {
        Point3::new(-(n.y + n.z * z3) / n.x, -1.0, z3)
    }
}

/// Dedicated addition and doubling, independent of d. Addition is 0/0 when
/// q is p rotated by a quarter turn, (X, Y, Z) -> (-Y, X, Z).
fn edwards_dedicated_sum(p: Point3, q: Point3) -> Option<Point3> {
    let r = if same_point(p, q) {
        let b = sqr(p.x + p.y);
        let c = sqr(p.x);
        let d = sqr(p.y);
        let e = c + d;
        let h = sqr(p.z);
        let j = e - 2.0 * h;
        Point3::new((b - e) * j, e * (c - d), e * j)
    } else {
        let a = p.x * q.z;
        let b = p.y * q.z;
        let c = p.z * q.x;
        let d = p.z * q.y;
        let e = a * b;
        let f = c * d;
        let g = e + f;
        let h = e - f;
        let j = (a - c) * (b + d) - h;
        let k = (a + d) * (b + c) - g;
        Point3::new(g * j, h * k, j * k)
    };
    proper_point(r)
}

/// x3 = (x1 y2 + y1 x2) / (1 + d x1 x2 y1 y2),
/// y3 = (y1 y2 - x1 x2) / (1 - d x1 x2 y1 y2), in homogeneous form.
/// Fails only when a summand is a singular point at infinity.
fn edwards_unified_sum(d: f64, p: Point3, q: Point3) -> Option<Point3> {
    let a = p.z * q.z;
    let b = sqr(a);
    let c = p.x * q.x;
    let e = p.y * q.y;
    let t = d * c * e;
    let f = b - t;
    let g = b + t;
    proper_point(Point3::new(
        a * (p.x * q.y + p.y * q.x) * f,
        a * (e - c) * g,
        f * g,
    ))
}

fn unit(mut p: Point3) -> Point3 {
    normalize(&mut p);
    p
}
