use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, Mjd2000, DAYS_PER_JULIAN_YEAR, EARTH_RADIUS};
use crate::magline_errors::MaglineError;
use crate::model::{Coefficients, GeomagneticModel, ValidityRange};

/// Spherical harmonic model given as a main field at a reference epoch plus a linear
/// secular variation, in nT and nT/year respectively.
///
/// ```text
/// g(t) = g(t₀) + ġ · (t - t₀) / 365.25
/// ```
///
/// The secular variation may have a lower degree than the main field; missing terms are
/// zero. The default validity range is five years from the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecularVariationModel {
    epoch: Mjd2000,
    main_field: Coefficients,
    secular_variation: Coefficients,
    reference_radius: Kilometer,
    validity: ValidityRange,
}

impl SecularVariationModel {
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidModel`] if `epoch` is not finite or if the secular variation
    ///   degree exceeds the main field degree.
    pub fn new(
        epoch: Mjd2000,
        main_field: Coefficients,
        secular_variation: Coefficients,
    ) -> Result<Self, MaglineError> {
        if !epoch.is_finite() {
            return Err(MaglineError::InvalidModel("epoch must be finite".into()));
        }

        let degree = main_field.degree();
        if secular_variation.degree() > degree {
            return Err(MaglineError::InvalidModel(format!(
                "secular variation degree {} exceeds main field degree {degree}",
                secular_variation.degree()
            )));
        }

        let sv = &secular_variation;
        let secular_variation = Coefficients::from_terms(
            degree,
            (1..=sv.degree()).flat_map(move |n| {
                (0..=n).filter_map(move |m| sv.get(n, m).map(|(g, h)| (n, m, g, h)))
            }),
        )?;

        Ok(SecularVariationModel {
            epoch,
            main_field,
            secular_variation,
            reference_radius: EARTH_RADIUS,
            validity: ValidityRange {
                start: epoch,
                end: epoch + 5.0 * DAYS_PER_JULIAN_YEAR,
            },
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

    pub fn with_validity(mut self, validity: ValidityRange) -> Self {
        self.validity = validity;
        self
    }

    pub fn epoch(&self) -> Mjd2000 {
        self.epoch
    }
}

impl GeomagneticModel for SecularVariationModel {
    fn evaluate_coefficients(&self, time: Mjd2000) -> Coefficients {
        let years = (time - self.epoch) / DAYS_PER_JULIAN_YEAR;
        self.main_field.add_scaled(&self.secular_variation, years)
    }

    fn min_degree(&self) -> usize {
        1
    }

    fn max_degree(&self) -> usize {
        self.main_field.degree()
    }

    fn reference_radius(&self) -> Kilometer {
        self.reference_radius
    }

    fn validity(&self) -> ValidityRange {
        self.validity
    }
}
