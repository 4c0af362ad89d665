//! # Spherical harmonic field evaluation
//!
//! Evaluation of the internal geomagnetic field `B = -∇V` of a spherical harmonic model,
//! with the potential
//!
//! ```text
//! V(r, θ, φ) = a Σₙ (a/r)^(n+1) Σₘ (g(n,m) cos mφ + h(n,m) sin mφ) P(n,m)(cos θ)
//! ```
//!
//! where `a` is the reference radius, `θ` the colatitude and `φ` the longitude. The field is
//! returned as (north, east, up) components in the geocentric spherical frame:
//!
//! ```text
//! north =  Σₙ (a/r)^(n+2) Σₘ (g cos mφ + h sin mφ) dP(n,m)/dθ
//! east  =  Σₙ (a/r)^(n+2) Σₘ m (g sin mφ - h cos mφ) P(n,m) / sin θ
//! up    =  Σₙ (n+1) (a/r)^(n+2) Σₘ (g cos mφ + h sin mφ) P(n,m)
//! ```
//!
//! ## Pole handling
//!
//! Close to the poles `P(n,m) / sin θ` is replaced by its limit: `dP(n,1)/dθ / cos θ` for
//! `m = 1`, zero for `m ≥ 2`. The east component therefore stays finite and continuous.
//!
//! ## Caching
//!
//! A [`FieldEvaluator`] keeps the Legendre, azimuthal and radial tables of the last evaluated
//! latitude, longitude and radius, and only recomputes the tables whose input changed. The
//! output only depends on the input point: evaluating the same point twice is bit-identical.
//!
//! ## See also
//! ------------
//! * [`crate::model::GeomagneticModel`] – Source of the Gauss coefficients.
//! * [`crate::coordinates`] – Conversions applied by [`evaluate_in`].

pub(crate) mod harmonics;
pub(crate) mod legendre;

use nalgebra::Vector3;
use tracing::warn;

use crate::constants::{Kilometer, Mjd2000, NanoTesla};
use crate::coordinates::{convert_point, convert_vector, CoordinateSystem};
use crate::magline_errors::MaglineError;
use crate::model::coefficients::term_index;
use crate::model::{Coefficients, GeomagneticModel};

use self::harmonics::{AzimuthTable, RadialTable};
use self::legendre::LegendreTable;

/// `|sin θ|` below which a point is handled as lying on the polar axis.
pub const POLE_THRESHOLD: f64 = 1e-10;

/// Reusable evaluator of one model at one time.
///
/// The evaluator copies the Gauss coefficients at construction time and owns its
/// workspace, so it does not borrow the model and can be moved to another thread.
#[derive(Debug, Clone)]
pub struct FieldEvaluator {
    time: Mjd2000,
    coefficients: Coefficients,
    min_degree: usize,
    max_degree: usize,
    reference_radius: Kilometer,
    legendre: LegendreTable,
    azimuth: AzimuthTable,
    radial: RadialTable,
    last_latitude: Option<f64>,
    last_longitude: Option<f64>,
    last_radius: Option<f64>,
}

impl FieldEvaluator {
    /// Prepare the evaluation of `model` at `time`.
    ///
    /// A time outside of the model validity range is accepted (the coefficients are
    /// extrapolated) and logged as a warning.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidTime`] if `time` is not finite.
    /// * [`MaglineError::InvalidModel`] if the model reference radius is not strictly positive.
    pub fn new<M>(model: &M, time: Mjd2000) -> Result<Self, MaglineError>
    where
        M: GeomagneticModel + ?Sized,
    {
        if !time.is_finite() {
            return Err(MaglineError::InvalidTime(format!(
                "evaluation time must be finite, got {time}"
            )));
        }

        let reference_radius = model.reference_radius();
        if !(reference_radius.is_finite() && reference_radius > 0.0) {
            return Err(MaglineError::InvalidModel(format!(
                "reference radius must be strictly positive, got {reference_radius}"
            )));
        }

        let validity = model.validity();
        if !validity.contains(time) {
            warn!(
                time,
                valid_from = validity.start,
                valid_to = validity.end,
                "model evaluated outside of its validity range, coefficients are extrapolated"
            );
        }

        let coefficients = model.evaluate_coefficients(time);
        let max_degree = model.max_degree().min(coefficients.degree());

        Ok(FieldEvaluator {
            time,
            coefficients,
            min_degree: model.min_degree().max(1),
            max_degree,
            reference_radius,
            legendre: LegendreTable::new(max_degree),
            azimuth: AzimuthTable::new(max_degree),
            radial: RadialTable::new(max_degree),
            last_latitude: None,
            last_longitude: None,
            last_radius: None,
        })
    }

    pub fn time(&self) -> Mjd2000 {
        self.time
    }

    /// Coefficients the evaluator sums, i.e. the model coefficients at [`FieldEvaluator::time`].
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Field vector (north, east, up) in nT at a geocentric spherical point
    /// (latitude °, longitude °, radius km).
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`] if a coordinate is not finite or the radius
    ///   is not strictly positive.
    pub fn field(&mut self, point: &Vector3<f64>) -> Result<Vector3<NanoTesla>, MaglineError> {
        self.potential_and_field(point).map(|(_, field)| field)
    }

    /// Magnetic scalar potential in nT·km at a geocentric spherical point.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`], as [`FieldEvaluator::field`].
    pub fn potential(&mut self, point: &Vector3<f64>) -> Result<f64, MaglineError> {
        self.potential_and_field(point).map(|(potential, _)| potential)
    }

    /// Potential and field at a geocentric spherical point, sharing one pass over the
    /// coefficients.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`], as [`FieldEvaluator::field`].
    pub fn potential_and_field(
        &mut self,
        point: &Vector3<f64>,
    ) -> Result<(f64, Vector3<NanoTesla>), MaglineError> {
        let (cos_theta, sin_theta) = self.prepare(point)?;
        let (potential, field) = self.accumulate(cos_theta, sin_theta);
        Ok((point.z * potential, field))
    }

    /// Field at `point` given in the `input` system, returned in the local basis of the
    /// `output` system at the same physical point.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`], as [`FieldEvaluator::field`].
    pub fn field_in(
        &mut self,
        point: &Vector3<f64>,
        input: CoordinateSystem,
        output: CoordinateSystem,
    ) -> Result<Vector3<NanoTesla>, MaglineError> {
        let spherical = convert_point(point, input, CoordinateSystem::GeocentricSpherical);
        let field = self.field(&spherical)?;
        Ok(convert_vector(
            &spherical,
            &field,
            CoordinateSystem::GeocentricSpherical,
            output,
        ))
    }

    /// Validate the point, refresh the tables whose input changed and return
    /// `(cos θ, sin θ)` of the colatitude.
    fn prepare(&mut self, point: &Vector3<f64>) -> Result<(f64, f64), MaglineError> {
        let (latitude, longitude, radius) = (point.x, point.y, point.z);

        if !(latitude.is_finite() && longitude.is_finite() && radius.is_finite()) {
            return Err(MaglineError::DegenerateEvaluation(format!(
                "non-finite evaluation point ({latitude}, {longitude}, {radius})"
            )));
        }
        if radius <= 0.0 {
            return Err(MaglineError::DegenerateEvaluation(format!(
                "evaluation radius must be strictly positive, got {radius} km"
            )));
        }

        // the colatitude θ is the complement of the latitude
        let (cos_theta, sin_theta) = latitude.to_radians().sin_cos();

        if self.last_latitude != Some(latitude) {
            self.legendre.update(cos_theta, sin_theta);
            self.last_latitude = Some(latitude);
        }
        if self.last_longitude != Some(longitude) {
            self.azimuth.update(longitude.to_radians());
            self.last_longitude = Some(longitude);
        }
        if self.last_radius != Some(radius) {
            self.radial.update(self.reference_radius, radius);
            self.last_radius = Some(radius);
        }

        Ok((cos_theta, sin_theta))
    }

    /// Sum the series with the current tables. The returned potential still has to be
    /// multiplied by the radius.
    fn accumulate(&self, cos_theta: f64, sin_theta: f64) -> (f64, Vector3<f64>) {
        let g = self.coefficients.g();
        let h = self.coefficients.h();
        let p = self.legendre.p();
        let dp = self.legendre.dp();
        let at_pole = sin_theta.abs() < POLE_THRESHOLD;

        let (mut potential, mut north, mut east, mut up) = (0.0, 0.0, 0.0, 0.0);

        for n in self.min_degree..=self.max_degree {
            let rr = self.radial.get(n);
            let (mut sum_p, mut sum_dp, mut sum_phi) = (0.0, 0.0, 0.0);

            for m in 0..=n {
                let i = term_index(n, m);
                let (cos_m, sin_m) = self.azimuth.get(m);
                let gh = g[i] * cos_m + h[i] * sin_m;

                sum_p += gh * p[i];
                sum_dp += gh * dp[i];

                if m > 0 {
                    let p_over_sin = if !at_pole {
                        p[i] / sin_theta
                    } else if m == 1 {
                        dp[i] / cos_theta
                    } else {
                        0.0
                    };
                    sum_phi += m as f64 * (g[i] * sin_m - h[i] * cos_m) * p_over_sin;
                }
            }

            potential += rr * sum_p;
            north += rr * sum_dp;
            east += rr * sum_phi;
            up += (n + 1) as f64 * rr * sum_p;
        }

        (potential, Vector3::new(north, east, up))
    }
}

/// Field (north, east, up) in nT of `model` at `time` at a geocentric spherical point.
///
/// One-shot form of [`FieldEvaluator::field`]; use a [`FieldEvaluator`] to evaluate many
/// points at the same time.
///
/// Errors
/// ------
/// * [`MaglineError::InvalidTime`] if `time` is not finite.
/// * [`MaglineError::DegenerateEvaluation`] for a non-finite point or a non-positive radius.
pub fn evaluate<M>(
    model: &M,
    time: Mjd2000,
    point: &Vector3<f64>,
) -> Result<Vector3<NanoTesla>, MaglineError>
where
    M: GeomagneticModel + ?Sized,
{
    FieldEvaluator::new(model, time)?.field(point)
}

/// Field of `model` at `time` at a point given in `input`, expressed in the local basis of
/// `output`.
///
/// Errors
/// ------
/// * As [`evaluate`].
pub fn evaluate_in<M>(
    model: &M,
    time: Mjd2000,
    point: &Vector3<f64>,
    input: CoordinateSystem,
    output: CoordinateSystem,
) -> Result<Vector3<NanoTesla>, MaglineError>
where
    M: GeomagneticModel + ?Sized,
{
    FieldEvaluator::new(model, time)?.field_in(point, input, output)
}

/// Batch form of [`evaluate_in`], sharing one evaluator over all points.
///
/// Errors
/// ------
/// * As [`evaluate`]; the first failing point aborts the batch.
pub fn evaluate_many<M>(
    model: &M,
    time: Mjd2000,
    points: &[Vector3<f64>],
    input: CoordinateSystem,
    output: CoordinateSystem,
) -> Result<Vec<Vector3<NanoTesla>>, MaglineError>
where
    M: GeomagneticModel + ?Sized,
{
    let mut evaluator = FieldEvaluator::new(model, time)?;
    points
        .iter()
        .map(|point| evaluator.field_in(point, input, output))
        .collect()
}
