// src/diagnostics.rs

use crate::vector::Point3;

/// Non-fatal anomalies met while tessellating. Geometry is still produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// Newton projection hit its iteration cap; `result` is best effort.
    ProjectionStalled {
        start: Point3,
        result: Point3,
        residual: f64,
    },
    /// A half-loop found no sibling and was emitted as an open polyline.
    UnmatchedHalfLoop { seed: Point3, vertices: usize },
    /// Tangent vanished mid-trace; the branch was cut there.
    DegenerateTangent { point: Point3 },
}

impl Diagnostic {
    pub(crate) fn log(&self) {
        match self {
            Diagnostic::ProjectionStalled {
                start,
                result,
                residual,
            } => log::warn!(
                "cannot project point {} onto curve, best effort {} (residual {:e})",
                start,
                result,
                residual
            ),
            Diagnostic::UnmatchedHalfLoop { seed, vertices } => log::warn!(
                "half-loop from seed {} ({} vertices) has no counterpart",
                seed,
                vertices
            ),
            Diagnostic::DegenerateTangent { point } => {
                log::warn!("tangent vanishes at {}, branch cut", point)
            }
        }
    }
}
