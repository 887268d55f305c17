// src/wasm.rs

use wasm_bindgen::prelude::*;

use crate::curve::{AdditionResult, Curve};
use crate::tessellate::Tessellation;
use crate::trace::Embedding;
use crate::vector::{flatten, Point3};

fn js_err(e: crate::error::CurveError) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmCurve {
    inner: Curve,
}

#[wasm_bindgen]
impl WasmCurve {
    /// Z*Y^2 = X^3 + a*X*Z^2 + b*Z^3
    pub fn weierstrass(a: f64, b: f64) -> Result<WasmCurve, JsError> {
        let inner = Curve::weierstrass(a, b).map_err(js_err)?;
        Ok(WasmCurve { inner })
    }

    /// (X^2 + Y^2)*Z^2 = Z^4 + d*X^2*Y^2
    pub fn edwards(d: f64) -> Result<WasmCurve, JsError> {
        let inner = Curve::edwards(d).map_err(js_err)?;
        Ok(WasmCurve { inner })
    }

    #[wasm_bindgen(js_name = labelHtml)]
    pub fn label_html(&self) -> String {
        self.inner.label_html()
    }

    /// Branches on the unit sphere, or in the plane Z=1 clipped to
    /// `boundary` when one is given.
    pub fn tessellate(&self, boundary: Option<f64>) -> Result<WasmTessellation, JsError> {
        let embedding = Embedding::from_boundary(boundary).map_err(js_err)?;
        Ok(WasmTessellation {
            inner: self.inner.tessellate(embedding),
        })
    }

    pub fn distance(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.distance(Point3::new(x, y, z))
    }

    /// Projected point as [x, y, z].
    pub fn project(&self, x: f64, y: f64, z: f64, tolerance: f64) -> Vec<f64> {
        self.inner
            .project(Point3::new(x, y, z), tolerance)
            .point
            .to_array()
            .to_vec()
    }

    /// Curve point for a click near the unit sphere, if it hit the curve.
    pub fn pick(&self, x: f64, y: f64, z: f64) -> Option<Vec<f64>> {
        self.inner
            .pick(Point3::new(x, y, z))
            .map(|p| p.to_array().to_vec())
    }

    pub fn add(&self, px: f64, py: f64, pz: f64, qx: f64, qy: f64, qz: f64) -> WasmAddition {
        WasmAddition {
            inner: self
                .inner
                .add(Point3::new(px, py, pz), Point3::new(qx, qy, qz)),
        }
    }
}

#[wasm_bindgen]
pub struct WasmTessellation {
    inner: Tessellation,
}

#[wasm_bindgen]
impl WasmTessellation {
    #[wasm_bindgen(js_name = branchCount)]
    pub fn branch_count(&self) -> usize {
        self.inner.branches.len()
    }

    /// Vertices of branch `i` as flat xyz triples; empty past the end.
    pub fn branch(&self, i: usize) -> Vec<f64> {
        self.inner
            .branches
            .get(i)
            .map(|b| flatten(&b.vertices))
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isClosed)]
    pub fn is_closed(&self, i: usize) -> bool {
        self.inner.branches.get(i).is_some_and(|b| b.closed)
    }

    #[wasm_bindgen(js_name = warningCount)]
    pub fn warning_count(&self) -> usize {
        self.inner.diagnostics.len()
    }
}

#[wasm_bindgen]
pub struct WasmAddition {
    inner: AdditionResult,
}

#[wasm_bindgen]
impl WasmAddition {
    pub fn point(&self) -> Vec<f64> {
        self.inner.point.to_array().to_vec()
    }

    /// Chord/tangent plane normal, Weierstrass curves only.
    pub fn normal(&self) -> Option<Vec<f64>> {
        self.inner.normal.map(|n| n.to_array().to_vec())
    }

    #[wasm_bindgen(js_name = thirdIntersection)]
    pub fn third_intersection(&self) -> Option<Vec<f64>> {
        self.inner
            .third_intersection()
            .map(|p| p.to_array().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_branches() {
        let curve = WasmCurve::edwards(-1.0).ok().unwrap();
        let t = curve.tessellate(None).ok().unwrap();
        assert_eq!(t.branch_count(), 1);
        assert!(t.is_closed(0));
        assert!(!t.is_closed(1));
        let flat = t.branch(0);
        assert_eq!(flat.len() % 3, 0);
        assert_eq!(flat.len(), 3 * t.inner.branches[0].vertices.len());
        assert!(t.branch(7).is_empty());
        assert_eq!(t.warning_count(), 0);
    }

    #[test]
    fn test_addition_exposes_chord() {
        let curve = WasmCurve::weierstrass(-1.0, 1.0).ok().unwrap();
        let s = 1.0 / 3.0_f64.sqrt();
        let r = curve.add(s, s, s, 0.0, 0.5_f64.sqrt(), 0.5_f64.sqrt());
        assert_eq!(r.point().len(), 3);
        assert_eq!(r.normal().map(|n| n.len()), Some(3));
        let third = r.third_intersection().unwrap();
        assert_eq!(third[1], -r.point()[1]);
    }
}
