use nalgebra::Vector3;

use crate::constants::{WGS84_A, WGS84_B, WGS84_EPS2};

/// Convert geodetic coordinates above the WGS84 ellipsoid to geocentric Cartesian coordinates.
///
/// Arguments
/// ---------
/// * `point`: (geodetic latitude °, longitude °, height above the ellipsoid km)
///
/// Return
/// ------
/// * (x, y, z) in km
///
/// Details
/// -------
/// With `N` the prime vertical radius of curvature:
///
/// ```text
/// N = a / sqrt(1 - e² sin²φ)
/// x = (N + h) cos φ cos λ
/// y = (N + h) cos φ sin λ
/// z = (N (1 - e²) + h) sin φ
/// ```
pub fn geodetic_to_cartesian(point: &Vector3<f64>) -> Vector3<f64> {
    let (sin_lat, cos_lat) = point.x.to_radians().sin_cos();
    let (sin_lon, cos_lon) = point.y.to_radians().sin_cos();
    let height = point.z;

    let prime_vertical = WGS84_A / (1.0 - WGS84_EPS2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (prime_vertical + height) * cos_lat * cos_lon,
        (prime_vertical + height) * cos_lat * sin_lon,
        (prime_vertical * (1.0 - WGS84_EPS2) + height) * sin_lat,
    )
}

/// Convert geocentric Cartesian coordinates to geodetic coordinates above the WGS84 ellipsoid.
///
/// This uses Heikkinen's closed-form solution of the inverse problem, which avoids the
/// iterations of Bowring's method and is accurate to rounding error for any point
/// farther than a few kilometers from the Earth centre.
///
/// Arguments
/// ---------
/// * `point`: (x, y, z) in km
///
/// Return
/// ------
/// * (geodetic latitude °, longitude °, height km), longitude in (-180°, 180°]
///
/// Remarks
/// -------
/// * The inverse problem has no unique solution in the vicinity of the Earth centre;
///   there the auxiliary square roots are clamped at zero.
pub fn cartesian_to_geodetic(point: &Vector3<f64>) -> Vector3<f64> {
    let (x, y, z) = (point.x, point.y, point.z);

    let a2 = WGS84_A * WGS84_A;
    let b2 = WGS84_B * WGS84_B;
    let e2 = WGS84_EPS2;
    let ep2 = (a2 - b2) / b2;

    let p2 = x * x + y * y;
    let p = p2.sqrt();
    let z2 = z * z;

    let f = 54.0 * b2 * z2;
    let g = p2 + (1.0 - e2) * z2 - e2 * (a2 - b2);
    let c = e2 * e2 * f * p2 / (g * g * g);
    let s = (1.0 + c + (c * c + 2.0 * c).max(0.0).sqrt()).cbrt();
    let k = s + 1.0 + 1.0 / s;
    let pp = f / (3.0 * k * k * g * g);
    let q = (1.0 + 2.0 * e2 * e2 * pp).sqrt();

    let r0 = -(pp * e2 * p) / (1.0 + q)
        + (0.5 * a2 * (1.0 + 1.0 / q) - pp * (1.0 - e2) * z2 / (q * (1.0 + q)) - 0.5 * pp * p2)
            .max(0.0)
            .sqrt();

    let tmp = (p - e2 * r0) * (p - e2 * r0);
    let u = (tmp + z2).sqrt();
    let v = (tmp + (1.0 - e2) * z2).sqrt();
    let z0 = b2 * z / (WGS84_A * v);

    let height = u * (1.0 - b2 / (WGS84_A * v));
    let latitude = (z + ep2 * z0).atan2(p).to_degrees();
    let longitude = y.atan2(x).to_degrees();

    Vector3::new(latitude, longitude, height)
}
