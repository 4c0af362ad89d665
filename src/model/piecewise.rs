use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, Mjd2000, EARTH_RADIUS};
use crate::magline_errors::MaglineError;
use crate::model::{Coefficients, GeomagneticModel, ValidityRange};

/// Spherical harmonic model given as coefficient snapshots at time nodes.
///
/// Between two nodes the coefficients are linearly interpolated; before the first node and
/// after the last one they are linearly extrapolated from the closest pair of nodes. A model
/// with a single node is static.
///
/// The validity range defaults to the span of the nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseLinearModel {
    times: Vec<Mjd2000>,
    snapshots: Vec<Coefficients>,
    min_degree: usize,
    reference_radius: Kilometer,
    validity: ValidityRange,
}

impl PiecewiseLinearModel {
    /// Build a model from `(time, coefficients)` nodes.
    ///
    /// Arguments
    /// ---------
    /// * `nodes`: time nodes (MJD2000) with their coefficient snapshots, in any order.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::EmptyModel`] if `nodes` is empty.
    /// * [`MaglineError::InvalidModel`] if a time is not finite, if two nodes share the same
    ///   time, or if the snapshots do not all have the same degree.
    pub fn new<I>(nodes: I) -> Result<Self, MaglineError>
    where
        I: IntoIterator<Item = (Mjd2000, Coefficients)>,
    {
        let mut nodes: Vec<(Mjd2000, Coefficients)> = nodes.into_iter().collect();
        if nodes.is_empty() {
            return Err(MaglineError::EmptyModel);
        }

        if nodes.iter().any(|(t, _)| !t.is_finite()) {
            return Err(MaglineError::InvalidModel(
                "time nodes must be finite".into(),
            ));
        }

        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));

        if nodes.iter().tuple_windows().any(|(a, b)| a.0 == b.0) {
            return Err(MaglineError::InvalidModel(
                "time nodes must be distinct".into(),
            ));
        }

        let degree = nodes[0].1.degree();
        if nodes.iter().any(|(_, c)| c.degree() != degree) {
            return Err(MaglineError::InvalidModel(
                "all snapshots must share the same degree".into(),
            ));
        }

        let (times, snapshots): (Vec<_>, Vec<_>) = nodes.into_iter().unzip();
        let validity = ValidityRange {
            start: times[0],
            end: times[times.len() - 1],
        };

        Ok(PiecewiseLinearModel {
            times,
            snapshots,
            min_degree: 1,
            reference_radius: EARTH_RADIUS,
            validity,
        })
    }

    /// Override the reference radius of the expansion (defaults to 6371.2 km).
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidModel`] if the radius is not strictly positive.
    pub fn with_reference_radius(mut self, radius: Kilometer) -> Result<Self, MaglineError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MaglineError::InvalidModel(format!(
                "reference radius must be strictly positive, got {radius}"
            )));
        }
        self.reference_radius = radius;
        Ok(self)
    }

    /// Restrict the field sum to degrees `min_degree..=max_degree`.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidModel`] if `min_degree` is 0 or above the model degree.
    pub fn with_min_degree(mut self, min_degree: usize) -> Result<Self, MaglineError> {
        if min_degree == 0 || min_degree > self.max_degree() {
            return Err(MaglineError::InvalidModel(format!(
                "min degree must be within 1..={}, got {min_degree}",
                self.max_degree()
            )));
        }
        self.min_degree = min_degree;
        Ok(self)
    }

    /// Override the validity range (defaults to the span of the nodes).
    pub fn with_validity(mut self, validity: ValidityRange) -> Self {
        self.validity = validity;
        self
    }

    pub fn times(&self) -> &[Mjd2000] {
        &self.times
    }

    /// Index `i` of the interval `[times[i], times[i + 1]]` used for `time`, clamped to the
    /// first and last interval for extrapolation.
    fn interval(&self, time: Mjd2000) -> usize {
        let last = self.times.len() - 2;
        self.times.partition_point(|&t| t <= time).saturating_sub(1).min(last)
    }
}

impl GeomagneticModel for PiecewiseLinearModel {
    fn evaluate_coefficients(&self, time: Mjd2000) -> Coefficients {
        if self.times.len() == 1 {
            return self.snapshots[0].clone();
        }

        let i = self.interval(time);
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let weight = (time - t0) / (t1 - t0);

        self.snapshots[i].lerp(&self.snapshots[i + 1], weight)
    }

    fn min_degree(&self) -> usize {
        self.min_degree
    }

    fn max_degree(&self) -> usize {
        self.snapshots[0].degree()
    }

    fn reference_radius(&self) -> Kilometer {
        self.reference_radius
    }

    fn validity(&self) -> ValidityRange {
        self.validity
    }
}
