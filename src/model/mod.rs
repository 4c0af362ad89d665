//! # Spherical harmonic geomagnetic models
//!
//! This module defines the read-only interface through which the field evaluator consumes a
//! geomagnetic model, and two concrete model families:
//!
//! - [`PiecewiseLinearModel`](crate::model::piecewise::PiecewiseLinearModel) – coefficient
//!   snapshots at time nodes, linearly interpolated in between (the layout of SHC-style models
//!   such as IGRF or CHAOS core fields).
//! - [`SecularVariationModel`](crate::model::secular::SecularVariationModel) – main field at a
//!   reference epoch plus a linear secular variation (the layout of WMM-style models).
//!
//! ## Design & invariants
//!
//! - Models are immutable after construction and `Send + Sync`: one model can be shared by
//!   any number of concurrent traces.
//! - Coefficients are stored in flat arrays indexed by `n(n+1)/2 + m`
//!   ([`term_index`](crate::model::coefficients::term_index)).
//! - Times are MJD2000 values; calendar handling lives in [`crate::time`].
//! - Evaluating coefficients outside of the validity range extrapolates; checking the range is
//!   the caller's responsibility (the evaluator only logs a warning).
//!
//! ## Loading
//!
//! Parsing of coefficient files is out of the scope of this crate: build models from the
//! arrays produced by any SHC/COF reader.

pub mod coefficients;
pub mod piecewise;
pub mod secular;

use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, Mjd2000};

pub use self::coefficients::Coefficients;
pub use self::piecewise::PiecewiseLinearModel;
pub use self::secular::SecularVariationModel;

/// Closed time interval (MJD2000) in which a model is declared valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidityRange {
    pub start: Mjd2000,
    pub end: Mjd2000,
}

impl ValidityRange {
    /// The unbounded validity range, used by models without a declared validity.
    pub const UNBOUNDED: ValidityRange = ValidityRange {
        start: f64::NEG_INFINITY,
        end: f64::INFINITY,
    };

    pub fn contains(&self, time: Mjd2000) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Read-only view of a spherical harmonic model of the internal geomagnetic field.
///
/// The evaluator only needs the coefficients at one time, the range of degrees to sum
/// and the reference radius of the expansion.
pub trait GeomagneticModel: Send + Sync {
    /// Gauss coefficients at `time`, up to [`GeomagneticModel::max_degree`].
    fn evaluate_coefficients(&self, time: Mjd2000) -> Coefficients;

    /// Lowest degree included in the field sum (1 for a core field model).
    fn min_degree(&self) -> usize;

    /// Highest degree of the expansion.
    fn max_degree(&self) -> usize;

    /// Reference radius `a` of the expansion, in kilometers.
    fn reference_radius(&self) -> Kilometer;

    /// Validity range of the model.
    fn validity(&self) -> ValidityRange;
}

impl<M: GeomagneticModel + ?Sized> GeomagneticModel for &M {
    fn evaluate_coefficients(&self, time: Mjd2000) -> Coefficients {
        (**self).evaluate_coefficients(time)
    }

    fn min_degree(&self) -> usize {
        (**self).min_degree()
    }

    fn max_degree(&self) -> usize {
        (**self).max_degree()
    }

    fn reference_radius(&self) -> Kilometer {
        (**self).reference_radius()
    }

    fn validity(&self) -> ValidityRange {
        (**self).validity()
    }
}

impl<M: GeomagneticModel + ?Sized> GeomagneticModel for std::sync::Arc<M> {
    fn evaluate_coefficients(&self, time: Mjd2000) -> Coefficients {
        (**self).evaluate_coefficients(time)
    }

    fn min_degree(&self) -> usize {
        (**self).min_degree()
    }

    fn max_degree(&self) -> usize {
        (**self).max_degree()
    }

    fn reference_radius(&self) -> Kilometer {
        (**self).reference_radius()
    }

    fn validity(&self) -> ValidityRange {
        (**self).validity()
    }
}
