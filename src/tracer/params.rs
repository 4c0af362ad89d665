//! # Field-line tracing parameters
//!
//! [`TraceParams`] gathers the tunable parameters of
//! [`trace_field_line`](crate::tracer::trace_field_line): step-size policy, step and
//! arc-length budgets, radius bounds, direction, integration scheme and numerical thresholds.
//! Custom parameters are built through [`TraceParamsBuilder`], which validates them.

use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Kilometer, NanoTesla, DEFAULT_BOUNDARY_TOLERANCE, DEFAULT_MAX_RADIUS, DEFAULT_MAX_STEPS,
    DEFAULT_MIN_FIELD_MAGNITUDE, DEFAULT_MIN_RADIUS, DEFAULT_STEP_FACTOR,
};
use crate::magline_errors::MaglineError;

// ---- Numeric helpers for PartialOrd (handle NaN as invalid) ----

/// Return true iff x > 0.0 and comparable (i.e., not NaN).
#[inline]
fn gt0(x: f64) -> bool {
    x.partial_cmp(&0.0) == Some(Greater)
}

/// Return true iff x >= 0.0 and comparable (i.e., not NaN).
#[inline]
fn ge0(x: f64) -> bool {
    matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
}

/// Return true iff a < b and comparable (i.e., not NaN).
#[inline]
fn lt(a: f64, b: f64) -> bool {
    a.partial_cmp(&b) == Some(Less)
}

/// Length of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepPolicy {
    /// Constant step length in km.
    Fixed(Kilometer),
    /// Step length proportional to the geocentric radius of the current point
    /// (`factor · r`), i.e. a constant angular resolution around the Earth.
    RadiusScaled(f64),
}

impl StepPolicy {
    /// Step length in km at the given geocentric radius.
    #[inline]
    pub fn length_at(&self, radius: Kilometer) -> Kilometer {
        match *self {
            StepPolicy::Fixed(length) => length,
            StepPolicy::RadiusScaled(factor) => factor * radius,
        }
    }
}

impl fmt::Display for StepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPolicy::Fixed(length) => write!(f, "{length:.3} km"),
            StepPolicy::RadiusScaled(factor) => write!(f, "{factor:.5} × r"),
        }
    }
}

/// Explicit scheme advancing the position along the unit field tangent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationScheme {
    /// Classical fourth-order Runge–Kutta.
    #[default]
    RungeKutta4,
    /// Straight step along the tangent at the current point.
    Euler,
}

impl fmt::Display for IntegrationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationScheme::RungeKutta4 => write!(f, "rk4"),
            IntegrationScheme::Euler => write!(f, "euler"),
        }
    }
}

/// Sense of integration relative to the field vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceDirection {
    /// Follow `B`.
    Forward,
    /// Follow `-B`.
    Backward,
    /// Trace both ways from the seed; the backward branch is placed in front of the seed.
    Both,
}

impl TraceDirection {
    /// Sign applied to the unit tangent `B/|B|` of a single-sense branch.
    #[inline]
    pub(crate) fn sign(self) -> f64 {
        match self {
            TraceDirection::Backward => -1.0,
            TraceDirection::Forward | TraceDirection::Both => 1.0,
        }
    }
}

impl fmt::Display for TraceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceDirection::Forward => write!(f, "forward"),
            TraceDirection::Backward => write!(f, "backward"),
            TraceDirection::Both => write!(f, "both"),
        }
    }
}

/// Configuration of a field-line trace.
///
/// Fields
/// -----------------
/// * `step` – integration step length, fixed or proportional to the radius.
/// * `max_steps` – maximum number of integration steps per branch.
/// * `min_radius`, `max_radius` – geocentric radius shell (km) the trace is confined to;
///   leaving it stops the branch exactly on the bound.
/// * `max_arc_length` – maximum traced length (km) per branch, `+∞` for no limit.
/// * `direction` – forward (along `B`), backward (against `B`) or both.
/// * `scheme` – integration scheme of a step.
/// * `min_field_magnitude` – field magnitude (nT) below which the field direction is
///   undefined and the branch stops.
/// * `boundary_tolerance` – radius tolerance (km) of the boundary-crossing refinement.
///
/// Defaults
/// -----------------
/// * `step`: `RadiusScaled(100 / 6371.2)` (100 km at the reference radius)
/// * `max_steps`: 500
/// * `min_radius`: 6356.752 km (WGS84 polar radius)
/// * `max_radius`: 637 120 km (100 Earth radii)
/// * `max_arc_length`: `+∞`
/// * `direction`: `Forward`
/// * `scheme`: `RungeKutta4`
/// * `min_field_magnitude`: 1e-9 nT
/// * `boundary_tolerance`: 1e-9 km
///
/// See also
/// -----------------
/// * [`crate::tracer::trace_field_line`] – consumes these parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceParams {
    pub step: StepPolicy,
    pub max_steps: usize,
    pub min_radius: Kilometer,
    pub max_radius: Kilometer,
    pub max_arc_length: Kilometer,
    pub direction: TraceDirection,
    pub scheme: IntegrationScheme,
    pub min_field_magnitude: NanoTesla,
    pub boundary_tolerance: Kilometer,
}

impl TraceParams {
    /// Equivalent to [`TraceParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`TraceParamsBuilder`] initialised with the default values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use magline::tracer::params::{StepPolicy, TraceDirection, TraceParams};
    ///
    /// let params = TraceParams::builder()
    ///     .step(StepPolicy::Fixed(50.0))
    ///     .max_steps(2000)
    ///     .direction(TraceDirection::Both)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.max_steps, 2000);
    /// ```
    pub fn builder() -> TraceParamsBuilder {
        TraceParamsBuilder::new()
    }

    /// Whether `radius` lies inside the closed tracing shell.
    #[inline]
    pub fn contains_radius(&self, radius: Kilometer) -> bool {
        self.min_radius <= radius && radius <= self.max_radius
    }

    /// Check the validation rules of [`TraceParamsBuilder::build`].
    ///
    /// The fields are public, so the tracer re-checks parameters that did not go through
    /// the builder.
    pub fn validate(&self) -> Result<(), MaglineError> {
        let step = match self.step {
            StepPolicy::Fixed(v) | StepPolicy::RadiusScaled(v) => v,
        };
        if !(gt0(step) && step.is_finite()) {
            return Err(MaglineError::InvalidTraceParams(
                "step must be finite and > 0".into(),
            ));
        }

        if self.max_steps == 0 {
            return Err(MaglineError::InvalidTraceParams(
                "max_steps must be >= 1".into(),
            ));
        }

        if !(ge0(self.min_radius)
            && lt(self.min_radius, self.max_radius)
            && self.max_radius.is_finite())
        {
            return Err(MaglineError::InvalidTraceParams(
                "require 0 <= min_radius < max_radius < inf".into(),
            ));
        }

        if !gt0(self.max_arc_length) {
            return Err(MaglineError::InvalidTraceParams(
                "max_arc_length must be > 0".into(),
            ));
        }

        if !(ge0(self.min_field_magnitude) && self.min_field_magnitude.is_finite()) {
            return Err(MaglineError::InvalidTraceParams(
                "min_field_magnitude must be finite and >= 0".into(),
            ));
        }

        if !(gt0(self.boundary_tolerance) && self.boundary_tolerance.is_finite()) {
            return Err(MaglineError::InvalidTraceParams(
                "boundary_tolerance must be finite and > 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for TraceParams {
    fn default() -> Self {
        TraceParams {
            step: StepPolicy::RadiusScaled(DEFAULT_STEP_FACTOR),
            max_steps: DEFAULT_MAX_STEPS,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            max_arc_length: f64::INFINITY,
            direction: TraceDirection::Forward,
            scheme: IntegrationScheme::default(),
            min_field_magnitude: DEFAULT_MIN_FIELD_MAGNITUDE,
            boundary_tolerance: DEFAULT_BOUNDARY_TOLERANCE,
        }
    }
}

/// Builder for [`TraceParams`], with validation.
#[derive(Debug, Clone)]
pub struct TraceParamsBuilder {
    params: TraceParams,
}

impl Default for TraceParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: TraceParams::default(),
        }
    }

    pub fn step(mut self, v: StepPolicy) -> Self {
        self.params.step = v;
        self
    }
    pub fn max_steps(mut self, v: usize) -> Self {
        self.params.max_steps = v;
        self
    }
    pub fn min_radius(mut self, v: Kilometer) -> Self {
        self.params.min_radius = v;
        self
    }
    pub fn max_radius(mut self, v: Kilometer) -> Self {
        self.params.max_radius = v;
        self
    }
    pub fn max_arc_length(mut self, v: Kilometer) -> Self {
        self.params.max_arc_length = v;
        self
    }
    pub fn direction(mut self, v: TraceDirection) -> Self {
        self.params.direction = v;
        self
    }
    pub fn scheme(mut self, v: IntegrationScheme) -> Self {
        self.params.scheme = v;
        self
    }
    pub fn min_field_magnitude(mut self, v: NanoTesla) -> Self {
        self.params.min_field_magnitude = v;
        self
    }
    pub fn boundary_tolerance(mut self, v: Kilometer) -> Self {
        self.params.boundary_tolerance = v;
        self
    }

    /// Finalize the builder and produce a [`TraceParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * the step length (or factor) is finite and `> 0`;
    /// * `max_steps ≥ 1`;
    /// * `0 ≤ min_radius < max_radius`, `max_radius` finite;
    /// * `max_arc_length > 0` (`+∞` allowed);
    /// * `min_field_magnitude ≥ 0`, finite;
    /// * `boundary_tolerance > 0`, finite.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(TraceParams)` if all values are valid.
    /// * `Err(MaglineError::InvalidTraceParams)` naming the first failing rule otherwise.
    pub fn build(self) -> Result<TraceParams, MaglineError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for TraceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Field Line Tracing Parameters")?;
            writeln!(f, "-----------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.chars().count() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.chars().count())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            line!("step                = {}", self.step, "Integration step length")?;
            line!("max_steps           = {}", self.max_steps, "Step budget per branch")?;
            line!("min_radius          = {:.3} km", self.min_radius, "Lower radius bound")?;
            line!("max_radius          = {:.3} km", self.max_radius, "Upper radius bound")?;
            line!(
                "max_arc_length      = {:.3} km",
                self.max_arc_length,
                "Arc-length budget per branch"
            )?;
            line!("direction           = {}", self.direction, "Sense of integration")?;
            line!("scheme              = {}", self.scheme, "Integration scheme")?;
            line!(
                "min_field_magnitude = {:.1e} nT",
                self.min_field_magnitude,
                "Degenerate field threshold"
            )?;
            line!(
                "boundary_tolerance  = {:.1e} km",
                self.boundary_tolerance,
                "Boundary refinement tolerance"
            )?;

            Ok(())
        } else {
            write!(
                f,
                "TraceParams(step={}, max_steps={}, r∈[{:.3},{:.3}]km, \
                 max_arc_length={:.1}km, direction={}, scheme={})",
                self.step,
                self.max_steps,
                self.min_radius,
                self.max_radius,
                self.max_arc_length,
                self.direction,
                self.scheme,
            )
        }
    }
}
