// src/trace.rs

use crate::config::TraceConfig;
use crate::curve::Curve;
use crate::diagnostics::Diagnostic;
use crate::error::CurveError;
use crate::vector::{multadd, Point3};

/// How traced vertices are laid out for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Embedding {
    /// Unit-sphere representatives of the projective plane, unbounded.
    Projective,
    /// The chart Z=1, clipped to |x| < boundary and |y| < boundary.
    Affine { boundary: f64 },
}

impl Embedding {
    pub fn affine(boundary: f64) -> Result<Self, CurveError> {
        if !boundary.is_finite() || boundary <= 0.0 {
            return Err(CurveError::InvalidBoundary);
        }
        Ok(Embedding::Affine { boundary })
    }

    /// `None` means the projective embedding.
    pub fn from_boundary(boundary: Option<f64>) -> Result<Self, CurveError> {
        match boundary {
            Some(b) => Self::affine(b),
            None => Ok(Embedding::Projective),
        }
    }

    /// Append `p` in this embedding's coordinates.
    ///
    /// Returns false once the trace should stop: `p` is too close to Z=0
    /// for the affine chart (not appended), or it lies on or beyond the
    /// window border (appended).
    pub(crate) fn push_vertex(&self, vertices: &mut Vec<Point3>, p: Point3, min_z: f64) -> bool {
        match *self {
            Embedding::Projective => {
                vertices.push(p);
                true
            }
            Embedding::Affine { boundary } => {
                if p.z < min_z {
                    return false;
                }
                let x = p.x / p.z;
                let y = p.y / p.z;
                vertices.push(Point3::new(x, y, 1.0));
                x.abs() < boundary && y.abs() < boundary
            }
        }
    }
}

/// How a traced direction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Ran into infinity, left the window or hit the step cap.
    Escaped,
    /// Came back across Y=0; the other half of an oval is still missing.
    HalfLoop,
}

/// Walks a curve branch in fixed arc steps, re-projecting every vertex.
pub struct BranchTracer<'a> {
    curve: &'a Curve,
    embedding: Embedding,
    config: TraceConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BranchTracer<'a> {
    pub fn new(
        curve: &'a Curve,
        embedding: Embedding,
        config: TraceConfig,
    ) -> Result<Self, CurveError> {
        config.validate()?;
        Ok(Self::unchecked(curve, embedding, config))
    }

    pub(crate) fn unchecked(curve: &'a Curve, embedding: Embedding, config: TraceConfig) -> Self {
        Self {
            curve,
            embedding,
            config,
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn curve(&self) -> &'a Curve {
        self.curve
    }

    #[inline]
    pub fn embedding(&self) -> Embedding {
        self.embedding
    }

    #[inline]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Trace from `seed` with signed step `delta` into a fresh vertex list.
    /// The seed itself is not part of the list.
    pub fn trace(&mut self, seed: Point3, delta: f64) -> (Vec<Point3>, TraceOutcome) {
        let mut vertices = Vec::new();
        let outcome = self.trace_into(&mut vertices, seed, delta);
        (vertices, outcome)
    }

    /// Trace from `seed`, appending to `vertices`.
    pub fn trace_into(
        &mut self,
        vertices: &mut Vec<Point3>,
        seed: Point3,
        delta: f64,
    ) -> TraceOutcome {
        let mut p = seed;
        let mut y_last: Option<f64> = None;

        for _ in 0..self.config.max_steps {
            // Tangent of the curve inside the sphere: normal to both p and grad.
            let grad = self.curve.gradient(p);
            let tangent = p.cross(grad);
            let fac = delta / tangent.length();
            if !fac.is_finite() {
                self.report(Diagnostic::DegenerateTangent { point: p });
                return TraceOutcome::Escaped;
            }
            multadd(&mut p, fac, tangent);

            if p.z < 0.0 {
                // Singularity reached, i.e. the point at infinity.
                if self.embedding == Embedding::Projective {
                    vertices.push(infinity_marker(p));
                }
                return TraceOutcome::Escaped;
            }

            if let Some(y) = y_last {
                if y * p.y <= 0.0 {
                    return TraceOutcome::HalfLoop;
                }
            }

            p = self.project_vertex(p);

            if !self
                .embedding
                .push_vertex(vertices, p, self.config.min_affine_z)
            {
                return TraceOutcome::Escaped;
            }

            y_last = Some(p.y);
        }

        log::debug!(
            "branch from {} still open after {} steps",
            seed,
            self.config.max_steps
        );
        TraceOutcome::Escaped
    }

    /// Everything reported so far; leaves the tracer empty.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    fn project_vertex(&mut self, p: Point3) -> Point3 {
        let proj = self.curve.project_with(
            p,
            self.config.vertex_tolerance,
            self.config.max_iterations,
        );
        if !proj.converged {
            self.report(Diagnostic::ProjectionStalled {
                start: p,
                result: proj.point,
                residual: proj.residual,
            });
        }
        proj.point
    }
}

/// Axis direction the branch left through, as a vertex at infinity.
fn infinity_marker(p: Point3) -> Point3 {
    if p.x.abs() > p.y.abs() {
        Point3::new(p.x.signum(), 0.0, 0.0)
    } else {
        Point3::new(0.0, p.y.signum(), 0.0)
    }
}
