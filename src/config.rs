// src/config.rs

use crate::error::CurveError;

/// Tracing knobs. Defaults match what the visualization was tuned with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    pub step: f64,             // arc step on the unit sphere
    pub max_steps: usize,      // per traced direction
    pub vertex_tolerance: f64, // projection tolerance for emitted vertices
    pub max_iterations: usize, // Newton iterations per projection
    pub min_affine_z: f64,     // below this Z a vertex cannot be drawn in the Z=1 chart
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            step: 0.01,
            max_steps: 1000,
            vertex_tolerance: 1.0e-8,
            max_iterations: 20,
            min_affine_z: 0.001,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<(), CurveError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.step)
            || !positive(self.vertex_tolerance)
            || !positive(self.min_affine_z)
            || self.max_steps == 0
            || self.max_iterations == 0
        {
            return Err(CurveError::InvalidConfig);
        }
        Ok(())
    }
}
