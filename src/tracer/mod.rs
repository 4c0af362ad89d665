//! # Magnetic field-line tracing
//!
//! [`trace_field_line`] follows the direction of the model field from a seed point and
//! returns the ordered points of the field line together with the field vector sampled at
//! each of them.
//!
//! ## Pipeline
//!
//! 1. **Validation** – parameters and seed are checked before any field evaluation:
//!    the seed must be finite and inside the `[min_radius, max_radius]` shell.
//! 2. **Integration** – each branch is integrated in geocentric Cartesian coordinates on the
//!    unit tangent `±B/|B|`, with the
//!    [`IntegrationScheme`](crate::tracer::params::IntegrationScheme) of the parameters
//!    (classical RK4 by default). The step length follows
//!    [`StepPolicy`](crate::tracer::params::StepPolicy).
//! 3. **Termination** – budgets first, then radius bounds (the last point is refined onto the
//!    crossed bound), then field degeneracy; see [`termination`].
//! 4. **Output** – points and vectors are converted once to the requested coordinate system.
//!
//! For [`TraceDirection::Both`] the backward branch is reversed and placed in front of the
//! seed, whose position in the output is [`FieldLine::seed_index`].
//!
//! When the output system is the input system, the seed sample is the caller's `start`
//! unchanged. Every other geodetic or spherical sample carries a longitude in `(-180°, 180°]`,
//! so a seed given at 225° is followed by samples near -135°.
//!
//! ## Example
//!
//! ```rust
//! use magline::coordinates::CoordinateSystem;
//! use magline::model::{Coefficients, PiecewiseLinearModel};
//! use magline::tracer::{params::TraceParams, trace_field_line};
//! use nalgebra::Vector3;
//!
//! let dipole = Coefficients::from_terms(1, [(1, 0, -29442.0, 0.0)]).unwrap();
//! let model = PiecewiseLinearModel::new([(0.0, dipole)]).unwrap();
//!
//! let line = trace_field_line(
//!     &model,
//!     0.0,
//!     &Vector3::new(45.0, 30.0, 400.0),
//!     CoordinateSystem::GeodeticWgs84,
//!     CoordinateSystem::GeodeticWgs84,
//!     &TraceParams::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(line.points.len(), line.vectors.len());
//! ```

pub mod integrator;
pub mod params;
pub mod termination;

use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{Kilometer, Mjd2000, NanoTesla};
use crate::coordinates::{convert_point, convert_points, convert_vectors, CoordinateSystem};
use crate::evaluator::FieldEvaluator;
use crate::magline_errors::MaglineError;
use crate::model::GeomagneticModel;

use self::integrator::FieldLineIntegrator;
use self::params::{TraceDirection, TraceParams};
use self::termination::{refine_crossing, TraceTermination};

/// A traced field line.
///
/// `points[i]` and `vectors[i]` are expressed in `coordinate_system`, and `vectors[i]` is the
/// model field evaluated at `points[i]`. Points are ordered along the traversal, from the end
/// of the backward branch (if any) to the end of the forward branch.
///
/// `points[seed_index]` is the seed exactly as given when the line is returned in its input
/// system; computed samples have longitudes in `(-180°, 180°]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLine {
    pub points: Vec<Vector3<f64>>,
    pub vectors: Vec<Vector3<NanoTesla>>,
    pub coordinate_system: CoordinateSystem,
    /// Index of the seed point, 0 unless the line was traced in both directions.
    pub seed_index: usize,
    /// Termination of the branch in front of the seed, only for bidirectional traces.
    pub start_termination: Option<TraceTermination>,
    /// Termination of the branch after the seed.
    pub end_termination: TraceTermination,
    /// Number of integration steps, all branches included; every step adds one point.
    pub steps: usize,
    /// Integrated arc length in km, all branches included.
    pub arc_length: Kilometer,
}

impl FieldLine {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The seed point and the field vector at the seed.
    pub fn seed(&self) -> (&Vector3<f64>, &Vector3<NanoTesla>) {
        (&self.points[self.seed_index], &self.vectors[self.seed_index])
    }

    /// Iterate over `(point, vector)` samples.
    pub fn samples(&self) -> impl Iterator<Item = (&Vector3<f64>, &Vector3<NanoTesla>)> {
        self.points.iter().zip(&self.vectors)
    }
}

/// One integrated branch, in geocentric Cartesian coordinates. The seed is sample 0.
struct Branch {
    points: Vec<Vector3<f64>>,
    fields: Vec<Vector3<NanoTesla>>,
    termination: TraceTermination,
    steps: usize,
    arc_length: Kilometer,
}

/// Trace the field line of `model` at `time` passing through `start`.
///
/// Arguments
/// ---------
/// * `model`: geomagnetic model, only read.
/// * `time`: evaluation time (MJD2000). A time outside the model validity is extrapolated.
/// * `start`: seed point, in the `input` system.
/// * `input`: coordinate system of `start`.
/// * `output`: coordinate system of the returned points and vectors.
/// * `params`: tracing parameters.
///
/// Return
/// ------
/// * The traced [`FieldLine`]. Running out of budget, reaching a bound or meeting a
///   degenerate field are normal terminations reported in the field line, not errors.
///
/// Errors
/// ------
/// * [`MaglineError::InvalidTraceParams`] if `params` do not pass validation.
/// * [`MaglineError::InvalidStartPoint`] if `start` is not finite, or if its radius is not
///   strictly positive or lies outside the tracing shell.
/// * [`MaglineError::InvalidTime`] if `time` is not finite.
///
/// See also
/// ------------
/// * [`trace_field_lines`] – parallel batch over many seeds.
/// * [`crate::evaluator::evaluate_in`] – the field vector of every sample.
pub fn trace_field_line<M>(
    model: &M,
    time: Mjd2000,
    start: &Vector3<f64>,
    input: CoordinateSystem,
    output: CoordinateSystem,
    params: &TraceParams,
) -> Result<FieldLine, MaglineError>
where
    M: GeomagneticModel + ?Sized,
{
    params.validate()?;
    let seed = validate_start(start, input, params)?;
    let mut evaluator = FieldEvaluator::new(model, time)?;
    let mut line = trace_from_seed(&mut evaluator, &seed, output, params)?;
    keep_seed(&mut line, start, input);
    Ok(line)
}

/// Trace one field line per seed, in parallel.
///
/// The model coefficients at `time` are computed once and shared; every trace owns a copy of
/// the evaluator workspace.
///
/// Return
/// ------
/// * One result per seed, in the order of `starts`: a seed failing validation does not
///   abort the others.
///
/// Errors
/// ------
/// * [`MaglineError::InvalidTraceParams`] or [`MaglineError::InvalidTime`], which affect
///   every seed.
pub fn trace_field_lines<M>(
    model: &M,
    time: Mjd2000,
    starts: &[Vector3<f64>],
    input: CoordinateSystem,
    output: CoordinateSystem,
    params: &TraceParams,
) -> Result<Vec<Result<FieldLine, MaglineError>>, MaglineError>
where
    M: GeomagneticModel + ?Sized,
{
    params.validate()?;
    let template = FieldEvaluator::new(model, time)?;

    debug!(seeds = starts.len(), "tracing field lines in parallel");

    Ok(starts
        .par_iter()
        .map(|start| {
            let seed = validate_start(start, input, params)?;
            let mut evaluator = template.clone();
            let mut line = trace_from_seed(&mut evaluator, &seed, output, params)?;
            keep_seed(&mut line, start, input);
            Ok(line)
        })
        .collect())
}

/// Check the seed and return it in geocentric Cartesian coordinates.
fn validate_start(
    start: &Vector3<f64>,
    input: CoordinateSystem,
    params: &TraceParams,
) -> Result<Vector3<f64>, MaglineError> {
    if !start.iter().all(|c| c.is_finite()) {
        return Err(MaglineError::InvalidStartPoint(format!(
            "non-finite coordinates ({}, {}, {}) in {input}",
            start.x, start.y, start.z
        )));
    }

    let seed = convert_point(start, input, CoordinateSystem::GeocentricCartesian);
    let radius = seed.norm();

    if !(radius > 0.0 && radius.is_finite()) {
        return Err(MaglineError::InvalidStartPoint(format!(
            "seed radius must be strictly positive, got {radius} km"
        )));
    }

    if !params.contains_radius(radius) {
        return Err(MaglineError::InvalidStartPoint(format!(
            "seed radius {radius} km outside of the tracing shell [{}, {}] km",
            params.min_radius, params.max_radius
        )));
    }

    Ok(seed)
}

fn trace_from_seed(
    evaluator: &mut FieldEvaluator,
    seed: &Vector3<f64>,
    output: CoordinateSystem,
    params: &TraceParams,
) -> Result<FieldLine, MaglineError> {
    let seed_field = evaluator.field_in(
        seed,
        CoordinateSystem::GeocentricCartesian,
        CoordinateSystem::GeocentricCartesian,
    )?;

    debug!(
        x = seed.x,
        y = seed.y,
        z = seed.z,
        direction = %params.direction,
        "starting field line trace"
    );

    let (points, fields, seed_index, start_termination, end_termination, steps, arc_length) =
        match params.direction {
            TraceDirection::Forward | TraceDirection::Backward => {
                let branch = trace_branch(
                    evaluator,
                    seed,
                    &seed_field,
                    params.direction.sign(),
                    params,
                );
                (
                    branch.points,
                    branch.fields,
                    0,
                    None,
                    branch.termination,
                    branch.steps,
                    branch.arc_length,
                )
            }
            TraceDirection::Both => {
                let backward = trace_branch(evaluator, seed, &seed_field, -1.0, params);
                let forward = trace_branch(evaluator, seed, &seed_field, 1.0, params);
                let seed_index = backward.points.len() - 1;

                // the backward branch without its seed, reversed, then the forward branch
                let points = backward.points[1..]
                    .iter()
                    .rev()
                    .chain(&forward.points)
                    .copied()
                    .collect();
                let fields = backward.fields[1..]
                    .iter()
                    .rev()
                    .chain(&forward.fields)
                    .copied()
                    .collect();

                (
                    points,
                    fields,
                    seed_index,
                    Some(backward.termination),
                    forward.termination,
                    backward.steps + forward.steps,
                    backward.arc_length + forward.arc_length,
                )
            }
        };

    let (points, vectors) = to_output_system(&points, &fields, output)?;

    Ok(FieldLine {
        points,
        vectors,
        coordinate_system: output,
        seed_index,
        start_termination,
        end_termination,
        steps,
        arc_length,
    })
}

/// Integrate one branch from the seed, following `sign · B`.
fn trace_branch(
    evaluator: &mut FieldEvaluator,
    seed: &Vector3<f64>,
    seed_field: &Vector3<NanoTesla>,
    sign: f64,
    params: &TraceParams,
) -> Branch {
    let mut integrator =
        FieldLineIntegrator::new(evaluator, sign, params.scheme, params.min_field_magnitude);

    let mut points = vec![*seed];
    let mut fields = vec![*seed_field];
    let mut steps = 0;
    let mut arc_length = 0.0;

    let termination = loop {
        if steps >= params.max_steps {
            break TraceTermination::StepBudgetExhausted;
        }
        if arc_length >= params.max_arc_length {
            break TraceTermination::ArcLengthExhausted;
        }

        let (point, field) = match (points.last(), fields.last()) {
            (Some(point), Some(field)) => (*point, *field),
            _ => break TraceTermination::DegenerateField,
        };

        let Ok(k1) = integrator.tangent(&field) else {
            break TraceTermination::DegenerateField;
        };

        let remaining = params.max_arc_length - arc_length;
        let nominal = params.step.length_at(point.norm());
        let (length, truncated) = if nominal >= remaining {
            (remaining, true)
        } else {
            (nominal, false)
        };

        let Ok(next) = integrator.step(&point, &k1, length) else {
            break TraceTermination::DegenerateField;
        };

        let radius = next.norm();
        if !params.contains_radius(radius) {
            let (bound, reached) = if radius < params.min_radius {
                (params.min_radius, TraceTermination::MinRadiusReached)
            } else {
                (params.max_radius, TraceTermination::MaxRadiusReached)
            };

            let (crossing, fraction) = refine_crossing(
                &point,
                &next,
                bound,
                params.boundary_tolerance,
                |s| integrator.step(&point, &k1, s * length),
            );

            if fraction <= 0.0 {
                // the previous sample already lies on the bound
                break reached;
            }

            match integrator.field(&crossing) {
                Ok(crossing_field) => {
                    points.push(crossing);
                    fields.push(crossing_field);
                    steps += 1;
                    arc_length += fraction * length;
                    break reached;
                }
                Err(_) => break TraceTermination::DegenerateField,
            }
        }

        let next_field = match integrator.field(&next) {
            Ok(next_field) if integrator.tangent(&next_field).is_ok() => next_field,
            _ => break TraceTermination::DegenerateField,
        };

        points.push(next);
        fields.push(next_field);
        steps += 1;
        arc_length = if truncated {
            params.max_arc_length
        } else {
            arc_length + length
        };

        trace!(step = steps, radius, arc_length, "field line step");
    };

    debug!(
        sign,
        steps,
        arc_length,
        samples = points.len(),
        %termination,
        "field line branch finished"
    );

    Branch {
        points,
        fields,
        termination,
        steps,
        arc_length,
    }
}

/// Convert the Cartesian samples to the output system.
fn to_output_system(
    points: &[Vector3<f64>],
    fields: &[Vector3<NanoTesla>],
    output: CoordinateSystem,
) -> Result<(Vec<Vector3<f64>>, Vec<Vector3<NanoTesla>>), MaglineError> {
    let vectors = convert_vectors(points, fields, CoordinateSystem::GeocentricCartesian, output)?;
    let points = convert_points(points, CoordinateSystem::GeocentricCartesian, output);
    Ok((points, vectors))
}

/// Put the caller's seed back in place of its round-tripped conversion.
///
/// The field vector is left as computed: the local basis of the seed does not depend on how
/// its longitude is written.
fn keep_seed(line: &mut FieldLine, start: &Vector3<f64>, input: CoordinateSystem) {
    if line.coordinate_system == input {
        line.points[line.seed_index] = *start;
    }
}
