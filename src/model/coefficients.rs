use serde::{Deserialize, Serialize};

use crate::magline_errors::MaglineError;

/// Number of (degree, order) terms of a spherical harmonic expansion up to `degree`,
/// degree 0 included.
#[inline]
pub fn term_count(degree: usize) -> usize {
    ((degree + 1) * (degree + 2)) / 2
}

/// Flat index of the (degree, order) term.
#[inline]
pub fn term_index(degree: usize, order: usize) -> usize {
    (degree * (degree + 1)) / 2 + order
}

/// Gauss coefficients of a spherical harmonic expansion, in nanotesla.
///
/// The `g` and `h` arrays are flat, indexed by [`term_index`]`(n, m)` for `0 ≤ m ≤ n ≤ degree`.
/// The degree-0 term is stored to keep the indexing uniform but never contributes to the
/// field. `h(n, 0)` is zero by definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    degree: usize,
    g: Vec<f64>,
    h: Vec<f64>,
}

impl Coefficients {
    /// Build a coefficient set from flat arrays.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidCoefficients`] if `degree` is zero, if the arrays do not hold
    ///   exactly [`term_count`]`(degree)` terms, or if a coefficient is not finite.
    pub fn new(degree: usize, g: Vec<f64>, h: Vec<f64>) -> Result<Self, MaglineError> {
        if degree == 0 {
            return Err(MaglineError::InvalidCoefficients(
                "the maximum degree must be at least 1".into(),
            ));
        }

        let expected = term_count(degree);
        if g.len() != expected || h.len() != expected {
            return Err(MaglineError::InvalidCoefficients(format!(
                "degree {degree} requires {expected} terms, got {} g and {} h",
                g.len(),
                h.len()
            )));
        }

        if g.iter().chain(h.iter()).any(|c| !c.is_finite()) {
            return Err(MaglineError::InvalidCoefficients(
                "coefficients must be finite".into(),
            ));
        }

        Ok(Coefficients { degree, g, h })
    }

    /// Build a coefficient set from `(n, m, g, h)` tuples, missing terms being zero.
    ///
    /// Errors
    /// ------
    /// * [`MaglineError::InvalidCoefficients`] if a tuple has `m > n` or `n > degree`.
    pub fn from_terms<I>(degree: usize, terms: I) -> Result<Self, MaglineError>
    where
        I: IntoIterator<Item = (usize, usize, f64, f64)>,
    {
        let mut g = vec![0.0; term_count(degree)];
        let mut h = vec![0.0; term_count(degree)];

        for (n, m, gnm, hnm) in terms {
            if m > n || n > degree {
                return Err(MaglineError::InvalidCoefficients(format!(
                    "term ({n}, {m}) outside of a degree {degree} expansion"
                )));
            }
            g[term_index(n, m)] = gnm;
            h[term_index(n, m)] = hnm;
        }

        Coefficients::new(degree, g, h)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn g(&self) -> &[f64] {
        &self.g
    }

    pub fn h(&self) -> &[f64] {
        &self.h
    }

    /// The (g, h) pair of the (degree, order) term, `None` outside of the expansion.
    pub fn get(&self, degree: usize, order: usize) -> Option<(f64, f64)> {
        if order > degree || degree > self.degree {
            return None;
        }
        let i = term_index(degree, order);
        Some((self.g[i], self.h[i]))
    }

    /// Linear combination `self + factor · other`, term by term.
    ///
    /// Both sets must share the same degree; this is guaranteed by the model constructors.
    pub(crate) fn add_scaled(&self, other: &Coefficients, factor: f64) -> Coefficients {
        debug_assert_eq!(self.degree, other.degree);
        Coefficients {
            degree: self.degree,
            g: self
                .g
                .iter()
                .zip(&other.g)
                .map(|(a, b)| a + factor * b)
                .collect(),
            h: self
                .h
                .iter()
                .zip(&other.h)
                .map(|(a, b)| a + factor * b)
                .collect(),
        }
    }

    /// Linear interpolation `(1 - w) · self + w · other`, term by term.
    pub(crate) fn lerp(&self, other: &Coefficients, weight: f64) -> Coefficients {
        debug_assert_eq!(self.degree, other.degree);
        let mix = |a: &f64, b: &f64| (1.0 - weight) * a + weight * b;
        Coefficients {
            degree: self.degree,
            g: self.g.iter().zip(&other.g).map(|(a, b)| mix(a, b)).collect(),
            h: self.h.iter().zip(&other.h).map(|(a, b)| mix(a, b)).collect(),
        }
    }
}
