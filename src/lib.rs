// src/lib.rs

// Curve kernel (no wasm, pure Rust).
mod config;
mod construction;
mod cubic;
mod curve;
mod diagnostics;
mod error;
mod project;
mod tessellate;
mod trace;
mod vector;

// JS boundary.
mod wasm;

pub use crate::config::TraceConfig;
pub use crate::construction::great_circle_arc;
pub use crate::cubic::solve_depressed_cubic;
pub use crate::curve::{
    AdditionResult, Curve, CurveParameters, DEFAULT_CHART_THRESHOLD, WEIERSTRASS_NEUTRAL,
};
pub use crate::diagnostics::Diagnostic;
pub use crate::error::CurveError;
pub use crate::project::{sphere_pick_point, Projection, MAX_PROJECTION_ITERATIONS, PICK_TOLERANCE};
pub use crate::tessellate::{Branch, Tessellation};
pub use crate::trace::{BranchTracer, Embedding, TraceOutcome};
pub use crate::vector::{cube, multadd, normalize, sqr, Point3};
pub use crate::wasm::{WasmAddition, WasmCurve, WasmTessellation};
