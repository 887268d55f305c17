//! End-to-end checks: curve parameters in, drawable branches out.

use approx::assert_abs_diff_eq;
use ecproj::{Curve, CurveError, Embedding, Point3, TraceConfig};

fn assert_on_curve(curve: &Curve, branch: &[Point3], tol: f64) {
    for v in branch.iter().filter(|v| v.z != 0.0) {
        assert!(
            curve.distance(*v).abs() < tol,
            "{} off curve at {}: {:e}",
            curve,
            v,
            curve.distance(*v)
        );
    }
}

#[test]
fn test_weierstrass_with_oval_projective() {
    // y^2 = x^3 - x: oval over [-1, 0] and an open branch from x = 1
    let curve = Curve::weierstrass(-1.0, 0.0).unwrap();
    let t = curve.tessellate(Embedding::Projective);

    assert_eq!(t.branches.len(), 2);
    assert!(t.diagnostics.is_empty(), "{:?}", t.diagnostics);

    let oval = &t.branches[0];
    assert!(oval.closed);
    assert_eq!(oval.vertices.first(), oval.vertices.last());
    for v in &oval.vertices {
        let x = v.x / v.z;
        assert!((-1.0 - 1e-9..=1e-9).contains(&x), "x = {}", x);
    }

    let open = &t.branches[1];
    assert!(!open.closed);
    let first = open.vertices[0];
    let last = *open.vertices.last().unwrap();
    assert_eq!((first.z, last.z), (0.0, 0.0));
    assert_eq!(first.y * last.y, -1.0);

    for branch in &t.branches {
        assert_on_curve(&curve, &branch.vertices, 1e-8);
    }
}

#[test]
fn test_projective_vertices_are_unit_length() {
    let curve = Curve::weierstrass(-1.0, 1.0).unwrap();
    let t = curve.tessellate(Embedding::Projective);
    assert_eq!(t.branches.len(), 1);
    for v in &t.branches[0].vertices {
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
    }
    assert_on_curve(&curve, &t.branches[0].vertices, 1e-8);
}

#[test]
fn test_affine_window_clips_branches() {
    let boundary = 3.0;
    let window = Embedding::affine(boundary).unwrap();
    let curves = [
        Curve::weierstrass(-1.0, 0.0).unwrap(),
        Curve::weierstrass(-1.0, 1.0).unwrap(),
        Curve::edwards(2.0).unwrap(),
        Curve::edwards(-1.0).unwrap(),
    ];

    for curve in &curves {
        let t = curve.tessellate(window);
        assert!(!t.branches.is_empty(), "{}", curve);
        assert!(t.diagnostics.is_empty(), "{}: {:?}", curve, t.diagnostics);

        for branch in &t.branches {
            let v = &branch.vertices;
            assert!(v.iter().all(|p| p.z == 1.0));

            // Only the vertex that crossed the border may lie outside,
            // and only by about one step.
            let inner = if branch.closed { &v[..] } else { &v[1..v.len() - 1] };
            for p in inner {
                assert!(p.x.abs() < boundary && p.y.abs() < boundary, "{}: {}", curve, p);
            }
            for p in [v[0], v[v.len() - 1]] {
                assert!(p.x.abs() < boundary + 1.0 && p.y.abs() < boundary + 1.0);
            }
        }
    }
}

#[test]
fn test_affine_oval_matches_projective_oval() {
    let curve = Curve::weierstrass(-1.0, 0.0).unwrap();
    let projective = curve.tessellate(Embedding::Projective);
    let affine = curve.tessellate(Embedding::affine(5.0).unwrap());

    assert_eq!(affine.branches.len(), 2);
    let oval_p = &projective.branches[0].vertices;
    let oval_a = &affine.branches[0].vertices;
    assert_eq!(oval_p.len(), oval_a.len());
    for (p, a) in oval_p.iter().zip(oval_a) {
        assert_abs_diff_eq!(p.x / p.z, a.x, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y / p.z, a.y, epsilon = 1e-12);
    }
}

#[test]
fn test_seed_outside_window_is_skipped() {
    // x^3 - 25x has roots -5, 0 and 5; a window of 4 only admits x = 0.
    // The oval through x = 0 leaves the window, so it is drawn as an arc.
    let curve = Curve::weierstrass(-25.0, 0.0).unwrap();
    let t = curve.tessellate(Embedding::affine(4.0).unwrap());
    assert_eq!(t.branches.len(), 1);
    assert!(!t.branches[0].closed);
    assert!(t.diagnostics.is_empty());
}

#[test]
fn test_edwards_with_four_branches() {
    let curve = Curve::edwards(2.0).unwrap();
    let t = curve.tessellate(Embedding::Projective);
    assert_eq!(t.branches.len(), 4);
    for branch in &t.branches {
        assert!(!branch.closed);
        assert_on_curve(&curve, &branch.vertices, 1e-8);
    }
}

#[test]
fn test_edwards_oval_for_several_d() {
    for d in [-30.0, -1.0, 0.0, 0.5] {
        let curve = Curve::edwards(d).unwrap();
        let t = curve.tessellate(Embedding::Projective);
        assert_eq!(t.branches.len(), 1, "d = {}", d);
        assert!(t.branches[0].closed);
        assert_on_curve(&curve, &t.branches[0].vertices, 1e-8);
    }
}

#[test]
fn test_boundary_must_be_positive() {
    assert_eq!(Embedding::affine(0.0), Err(CurveError::InvalidBoundary));
    assert_eq!(
        Embedding::from_boundary(Some(f64::INFINITY)),
        Err(CurveError::InvalidBoundary)
    );
}

#[test]
fn test_tessellation_is_deterministic() {
    let curve = Curve::weierstrass(-2.0, 1.0).unwrap();
    let a = curve.tessellate(Embedding::Projective);
    let b = curve
        .tessellate_with(Embedding::Projective, TraceConfig::default())
        .unwrap();
    assert_eq!(a, b);
}
