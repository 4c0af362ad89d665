pub mod constants;
pub mod coordinates;
pub mod evaluator;
pub mod magline_errors;
pub mod model;
pub mod time;
pub mod tracer;

pub use crate::coordinates::CoordinateSystem;
pub use crate::evaluator::{evaluate, evaluate_in, evaluate_many, FieldEvaluator};
pub use crate::magline_errors::MaglineError;
pub use crate::model::{GeomagneticModel, PiecewiseLinearModel, SecularVariationModel};
pub use crate::tracer::params::{IntegrationScheme, StepPolicy, TraceDirection, TraceParams};
pub use crate::tracer::termination::TraceTermination;
pub use crate::tracer::{trace_field_line, trace_field_lines, FieldLine};
