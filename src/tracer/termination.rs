//! # Trace termination and boundary refinement
//!
//! A trace branch stops for exactly one [`TraceTermination`] reason. The conditions are
//! checked in a fixed priority order at every iteration:
//!
//! 1. budgets ([`TraceTermination::StepBudgetExhausted`],
//!    [`TraceTermination::ArcLengthExhausted`]),
//! 2. radius bounds ([`TraceTermination::MinRadiusReached`],
//!    [`TraceTermination::MaxRadiusReached`]),
//! 3. field degeneracy ([`TraceTermination::DegenerateField`]).
//!
//! When a step leaves the radius shell, [`refine_crossing`] locates the crossing on the step
//! and the branch ends on the bound itself.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::Kilometer;
use crate::magline_errors::MaglineError;

/// Maximum number of regula falsi iterations of the boundary refinement.
const MAX_REFINEMENT_ITERATIONS: usize = 64;

/// Reason why a trace branch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceTermination {
    /// The branch used all of its integration steps.
    StepBudgetExhausted,
    /// The branch reached its arc-length budget.
    ArcLengthExhausted,
    /// The branch crossed the lower radius bound; its last point lies on the bound.
    MinRadiusReached,
    /// The branch crossed the upper radius bound; its last point lies on the bound.
    MaxRadiusReached,
    /// The field vanished or could not be evaluated; the branch ends at its last
    /// well-defined point.
    DegenerateField,
}

impl TraceTermination {
    /// Whether the branch ended on one of the radius bounds.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            TraceTermination::MinRadiusReached | TraceTermination::MaxRadiusReached
        )
    }

    /// Whether the branch ran out of steps or arc length.
    pub fn is_budget(&self) -> bool {
        matches!(
            self,
            TraceTermination::StepBudgetExhausted | TraceTermination::ArcLengthExhausted
        )
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, TraceTermination::DegenerateField)
    }
}

impl fmt::Display for TraceTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TraceTermination::StepBudgetExhausted => "step budget exhausted",
            TraceTermination::ArcLengthExhausted => "arc-length budget exhausted",
            TraceTermination::MinRadiusReached => "lower radius bound reached",
            TraceTermination::MaxRadiusReached => "upper radius bound reached",
            TraceTermination::DegenerateField => "degenerate field",
        };
        write!(f, "{reason}")
    }
}

/// Locate where a step crosses the sphere of radius `bound`.
///
/// The step starts at `inside` (within the tracing shell) and ends at `outside` (beyond
/// `bound`). `partial(s)` must return the end point of the same step shortened to the
/// fraction `s ∈ [0, 1]` of its length.
///
/// The crossing fraction is found by the Illinois variant of regula falsi on
/// `|partial(s)| - bound`, starting from the linear interpolation of the radius along the
/// step. The located point is then projected radially onto the bound.
///
/// Arguments
/// ---------
/// * `inside`, `outside`: end points of the overshooting step (geocentric Cartesian, km).
/// * `bound`: radius of the crossed bound (km).
/// * `tolerance`: radius tolerance (km) at which the iteration stops.
/// * `partial`: partial-step evaluator.
///
/// Return
/// ------
/// * The crossing point, exactly at radius `bound` up to rounding, and the step fraction
///   at which it was found. If `partial` fails, the last successful estimate is used
///   (the linear interpolation of the chord for a failure on the first call).
pub(crate) fn refine_crossing<F>(
    inside: &Vector3<f64>,
    outside: &Vector3<f64>,
    bound: Kilometer,
    tolerance: Kilometer,
    mut partial: F,
) -> (Vector3<f64>, f64)
where
    F: FnMut(f64) -> Result<Vector3<f64>, MaglineError>,
{
    let residual = |p: &Vector3<f64>| p.norm() - bound;

    let (mut a, mut fa) = (0.0, residual(inside));
    let (mut b, mut fb) = (1.0, residual(outside));

    let chord = (a * fb - b * fa) / (fb - fa);
    let mut best = (inside + chord * (outside - inside), chord);
    let mut retained = 0;

    for _ in 0..MAX_REFINEMENT_ITERATIONS {
        let s = ((a * fb - b * fa) / (fb - fa)).clamp(0.0, 1.0);
        let Ok(point) = partial(s) else {
            break;
        };
        let fs = residual(&point);
        best = (point, s);

        if fs.abs() <= tolerance || (b - a).abs() <= f64::EPSILON {
            break;
        }

        if fs * fb > 0.0 {
            // s replaces the outside end
            b = s;
            fb = fs;
            if retained == -1 {
                fa *= 0.5;
            }
            retained = -1;
        } else {
            a = s;
            fa = fs;
            if retained == 1 {
                fb *= 0.5;
            }
            retained = 1;
        }
    }

    let (point, fraction) = best;
    (point * (bound / point.norm()), fraction)
}
