use nalgebra::Vector3;

use crate::constants::{Kilometer, NanoTesla};
use crate::coordinates::CoordinateSystem::GeocentricCartesian;
use crate::evaluator::FieldEvaluator;
use crate::magline_errors::MaglineError;
use crate::tracer::params::IntegrationScheme;

/// Explicit integrator of `dx/ds = ±B(x)/|B(x)|`, where `s` is the arc length along the
/// field line.
///
/// Positions and field vectors are geocentric Cartesian; the field itself is evaluated in
/// geocentric spherical form by the wrapped [`FieldEvaluator`].
pub(crate) struct FieldLineIntegrator<'a> {
    evaluator: &'a mut FieldEvaluator,
    sign: f64,
    scheme: IntegrationScheme,
    min_field_magnitude: NanoTesla,
}

impl<'a> FieldLineIntegrator<'a> {
    /// `sign` is `+1` to follow `B` and `-1` to follow `-B`.
    pub(crate) fn new(
        evaluator: &'a mut FieldEvaluator,
        sign: f64,
        scheme: IntegrationScheme,
        min_field_magnitude: NanoTesla,
    ) -> Self {
        FieldLineIntegrator {
            evaluator,
            sign,
            scheme,
            min_field_magnitude,
        }
    }

    /// Field (x, y, z) in nT at a geocentric Cartesian point.
    pub(crate) fn field(
        &mut self,
        point: &Vector3<f64>,
    ) -> Result<Vector3<NanoTesla>, MaglineError> {
        self.evaluator
            .field_in(point, GeocentricCartesian, GeocentricCartesian)
    }

    /// Signed unit tangent of a field vector.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`] if the field magnitude does not exceed the
    ///   degenerate-field threshold.
    pub(crate) fn tangent(
        &self,
        field: &Vector3<NanoTesla>,
    ) -> Result<Vector3<f64>, MaglineError> {
        let magnitude = field.norm();
        // also rejects NaN magnitudes and exactly vanishing fields
        if !(magnitude > self.min_field_magnitude) {
            return Err(MaglineError::DegenerateEvaluation(format!(
                "field magnitude {magnitude} nT below the {} nT threshold",
                self.min_field_magnitude
            )));
        }
        Ok(field * (self.sign / magnitude))
    }

    fn tangent_at(&mut self, point: &Vector3<f64>) -> Result<Vector3<f64>, MaglineError> {
        let field = self.field(point)?;
        self.tangent(&field)
    }

    /// One step of arc length `length` from `point`, whose tangent `k1` is already known.
    ///
    /// ```text
    /// Euler:  x' = x + h k1
    /// RK4:    k2 = t(x + h/2 k1)
    ///         k3 = t(x + h/2 k2)
    ///         k4 = t(x + h k3)
    ///         x' = x + h/6 (k1 + 2 k2 + 2 k3 + k4)
    /// ```
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::DegenerateEvaluation`] if the field is degenerate at a stage.
    pub(crate) fn step(
        &mut self,
        point: &Vector3<f64>,
        k1: &Vector3<f64>,
        length: Kilometer,
    ) -> Result<Vector3<f64>, MaglineError> {
        match self.scheme {
            IntegrationScheme::Euler => Ok(point + length * k1),
            IntegrationScheme::RungeKutta4 => self.runge_kutta4(point, k1, length),
        }
    }

    fn runge_kutta4(
        &mut self,
        point: &Vector3<f64>,
        k1: &Vector3<f64>,
        length: Kilometer,
    ) -> Result<Vector3<f64>, MaglineError> {
        let half = 0.5 * length;

        let k2 = self.tangent_at(&(point + half * k1))?;
        let k3 = self.tangent_at(&(point + half * k2))?;
        let k4 = self.tangent_at(&(point + length * k3))?;

        Ok(point + (length / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4))
    }
}
