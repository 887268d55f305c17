// src/error.rs

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Non-finite parameters, or a singular curve whose gradient vanishes
    /// at a seed point (a node or a cusp).
    #[error("curve parameters must be finite and give a non-singular curve")]
    InvalidParameter,
    #[error("cubic is degenerate: p is too close to zero for the trigonometric solution")]
    DegenerateCubic,
    #[error("affine boundary must be a positive finite number")]
    InvalidBoundary,
    #[error("invalid tracing configuration")]
    InvalidConfig,
}
