// src/tessellate.rs

use crate::config::TraceConfig;
use crate::curve::Curve;
use crate::diagnostics::Diagnostic;
use crate::error::CurveError;
use crate::trace::{BranchTracer, Embedding, TraceOutcome};
use crate::vector::{normalize, Point3};

/// One continuous arc of the curve, ready to be drawn as a line strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub vertices: Vec<Point3>,
    /// Oval: the last vertex repeats the first.
    pub closed: bool,
}

/// All branches of one curve in one embedding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tessellation {
    pub branches: Vec<Branch>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Tessellation {
    pub fn vertex_count(&self) -> usize {
        self.branches.iter().map(|b| b.vertices.len()).sum()
    }
}

impl Curve {
    /// Tessellate with the default tracing configuration.
    pub fn tessellate(&self, embedding: Embedding) -> Tessellation {
        tessellate_branches(BranchTracer::unchecked(self, embedding, TraceConfig::default()))
    }

    pub fn tessellate_with(
        &self,
        embedding: Embedding,
        config: TraceConfig,
    ) -> Result<Tessellation, CurveError> {
        Ok(tessellate_branches(BranchTracer::new(self, embedding, config)?))
    }
}

/// Trace every seed in both directions and stitch half-loops into ovals.
///
/// An open branch is traced forward, reversed, then continued backward from
/// the seed, so its vertices run end to end. Two half-loops in a row make
/// one oval; at most one half-loop waits for its sibling at any time.
fn tessellate_branches(mut tracer: BranchTracer<'_>) -> Tessellation {
    let curve = tracer.curve();
    let embedding = tracer.embedding();
    let step = tracer.config().step;
    let min_z = tracer.config().min_affine_z;

    let mut branches = Vec::new();
    let mut pending: Option<(Point3, Vec<Point3>)> = None;

    for &seed in curve.initial_points() {
        let mut p = seed;
        normalize(&mut p);
        log::debug!("seed {}: distance {:e}, gradient {}", p, curve.distance(p), curve.gradient(p));

        let mut vertices = Vec::new();
        if !embedding.push_vertex(&mut vertices, p, min_z) {
            continue;
        }

        match tracer.trace_into(&mut vertices, p, step) {
            TraceOutcome::Escaped => {
                vertices.reverse();
                tracer.trace_into(&mut vertices, p, -step);
                branches.push(Branch {
                    vertices,
                    closed: false,
                });
            }
            TraceOutcome::HalfLoop => match pending.take() {
                Some((_, mut half)) => {
                    half.append(&mut vertices);
                    // close the loop visually
                    half.push(half[0]);
                    branches.push(Branch {
                        vertices: half,
                        closed: true,
                    });
                }
                None => pending = Some((p, vertices)),
            },
        }
    }

    if let Some((seed, vertices)) = pending {
        tracer.report(Diagnostic::UnmatchedHalfLoop {
            seed,
            vertices: vertices.len(),
        });
        branches.push(Branch {
            vertices,
            closed: false,
        });
    }

    log::debug!("tessellated {} into {} branches", curve, branches.len());

    Tessellation {
        branches,
        diagnostics: tracer.take_diagnostics(),
    }
}
