//! Schmidt semi-normalised associated Legendre functions.
//!
//! The table holds `P(n, m)(cos θ)` and `dP(n, m)/dθ` for `0 ≤ m ≤ n ≤ degree`, stored flat
//! with the `n(n+1)/2 + m` indexing of the model coefficients. The recursions only multiply by
//! `sin θ`, so they stay well defined at the poles.
//!
//! ```text
//! P(0,0) = 1                      dP(0,0) = 0
//! P(1,1) = s                      dP(1,1) = c
//! P(n,n) = k(n) s P(n-1,n-1)      dP(n,n) = k(n) (s dP(n-1,n-1) + c P(n-1,n-1)),   k(n) = √((2n-1)/2n)
//!
//! P(n,m)  = [(2n-1) c P(n-1,m) - √((n-1)²-m²) P(n-2,m)] / √(n²-m²)
//! dP(n,m) = [(2n-1) (c dP(n-1,m) - s P(n-1,m)) - √((n-1)²-m²) dP(n-2,m)] / √(n²-m²)
//! ```
//! with `c = cos θ`, `s = sin θ`.

use crate::model::coefficients::{term_count, term_index};

/// Square roots of the integers `0..=2·degree`, shared by the recursions.
pub(crate) fn integer_square_roots(degree: usize) -> Vec<f64> {
    (0..=2 * degree).map(|i| (i as f64).sqrt()).collect()
}

#[derive(Debug, Clone)]
pub(crate) struct LegendreTable {
    degree: usize,
    psqrt: Vec<f64>,
    p: Vec<f64>,
    dp: Vec<f64>,
}

impl LegendreTable {
    pub(crate) fn new(degree: usize) -> Self {
        LegendreTable {
            degree,
            psqrt: integer_square_roots(degree),
            p: vec![0.0; term_count(degree)],
            dp: vec![0.0; term_count(degree)],
        }
    }

    pub(crate) fn p(&self) -> &[f64] {
        &self.p
    }

    pub(crate) fn dp(&self) -> &[f64] {
        &self.dp
    }

    /// Fill the table for the colatitude whose cosine and sine are `cos_theta` and `sin_theta`.
    pub(crate) fn update(&mut self, cos_theta: f64, sin_theta: f64) {
        let (c, s) = (cos_theta, sin_theta);
        let psqrt = &self.psqrt;

        self.p[0] = 1.0;
        self.dp[0] = 0.0;

        for n in 1..=self.degree {
            // diagonal
            let nn = term_index(n, n);
            let prev = term_index(n - 1, n - 1);
            if n == 1 {
                self.p[nn] = s;
                self.dp[nn] = c;
            } else {
                let k = psqrt[2 * n - 1] / psqrt[2 * n];
                self.p[nn] = k * s * self.p[prev];
                self.dp[nn] = k * (s * self.dp[prev] + c * self.p[prev]);
            }

            // below the diagonal
            let two_n_minus_one = (2 * n - 1) as f64;
            for m in 0..n {
                let i = term_index(n, m);
                let i1 = term_index(n - 1, m);
                let norm = psqrt[n - m] * psqrt[n + m];

                let (p2, dp2, c2) = if n >= m + 2 {
                    let i2 = term_index(n - 2, m);
                    (self.p[i2], self.dp[i2], psqrt[n - 1 - m] * psqrt[n - 1 + m])
                } else {
                    (0.0, 0.0, 0.0)
                };

                self.p[i] = (two_n_minus_one * c * self.p[i1] - c2 * p2) / norm;
                self.dp[i] =
                    (two_n_minus_one * (c * self.dp[i1] - s * self.p[i1]) - c2 * dp2) / norm;
            }
        }
    }
}
