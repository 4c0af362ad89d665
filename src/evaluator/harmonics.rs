use crate::constants::Kilometer;

/// `cos(mφ)` and `sin(mφ)` for `0 ≤ m ≤ degree`, generated by angle addition from
/// `cos φ` and `sin φ` only.
#[derive(Debug, Clone)]
pub(crate) struct AzimuthTable {
    cos_m: Vec<f64>,
    sin_m: Vec<f64>,
}

impl AzimuthTable {
    pub(crate) fn new(degree: usize) -> Self {
        AzimuthTable {
            cos_m: vec![0.0; degree + 1],
            sin_m: vec![0.0; degree + 1],
        }
    }

    pub(crate) fn update(&mut self, longitude_rad: f64) {
        let (sin_phi, cos_phi) = longitude_rad.sin_cos();

        self.cos_m[0] = 1.0;
        self.sin_m[0] = 0.0;
        for m in 1..self.cos_m.len() {
            let (c, s) = (self.cos_m[m - 1], self.sin_m[m - 1]);
            self.cos_m[m] = c * cos_phi - s * sin_phi;
            self.sin_m[m] = s * cos_phi + c * sin_phi;
        }
    }

    #[inline]
    pub(crate) fn get(&self, order: usize) -> (f64, f64) {
        (self.cos_m[order], self.sin_m[order])
    }
}

/// Relative radial powers `(a/r)^(n+2)` for `0 ≤ n ≤ degree`.
#[derive(Debug, Clone)]
pub(crate) struct RadialTable {
    powers: Vec<f64>,
}

impl RadialTable {
    pub(crate) fn new(degree: usize) -> Self {
        RadialTable {
            powers: vec![0.0; degree + 1],
        }
    }

    pub(crate) fn update(&mut self, reference_radius: Kilometer, radius: Kilometer) {
        let ratio = reference_radius / radius;
        let mut power = ratio * ratio;
        for p in self.powers.iter_mut() {
            *p = power;
            power *= ratio;
        }
    }

    #[inline]
    pub(crate) fn get(&self, degree: usize) -> f64 {
        self.powers[degree]
    }
}
