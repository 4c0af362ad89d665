use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;

/// Convert geocentric spherical coordinates to geocentric Cartesian coordinates.
///
/// Arguments
/// ---------
/// * `point`: (latitude °, longitude °, radius km)
///
/// Return
/// ------
/// * (x, y, z) in km
pub fn spherical_to_cartesian(point: &Vector3<f64>) -> Vector3<f64> {
    let (sin_lat, cos_lat) = point.x.to_radians().sin_cos();
    let (sin_lon, cos_lon) = point.y.to_radians().sin_cos();
    let radius = point.z;

    Vector3::new(
        radius * cos_lat * cos_lon,
        radius * cos_lat * sin_lon,
        radius * sin_lat,
    )
}

/// Convert geocentric Cartesian coordinates to geocentric spherical coordinates.
///
/// The longitude is returned in the (-180°, 180°] range. On the polar axis the
/// longitude is 0° and at the origin all angles are 0°.
///
/// Arguments
/// ---------
/// * `point`: (x, y, z) in km
///
/// Return
/// ------
/// * (latitude °, longitude °, radius km)
pub fn cartesian_to_spherical(point: &Vector3<f64>) -> Vector3<f64> {
    let rho = point.x.hypot(point.y);
    let latitude = point.z.atan2(rho).to_degrees();
    let longitude = point.y.atan2(point.x).to_degrees();

    Vector3::new(latitude, longitude, point.norm())
}

/// Local (north, east, up) basis expressed in geocentric Cartesian coordinates.
///
/// The columns of the returned matrix are the north, east and up unit vectors of the
/// local frame tangent to a sphere (geocentric latitude) or to the ellipsoid (geodetic
/// latitude) at the given latitude and longitude. The matrix is orthonormal, so that:
///
/// ```text
/// v_cart  = B · v_local
/// v_local = Bᵀ · v_cart
/// ```
///
/// Arguments
/// ---------
/// * `latitude`: latitude of the local frame in **radians**
/// * `longitude`: longitude of the local frame in **radians**
pub fn local_basis(latitude: Radian, longitude: Radian) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();

    let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let east = Vector3::new(-sin_lon, cos_lon, 0.0);
    let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    Matrix3::from_columns(&[north, east, up])
}

/// Rotate a local (north, east, up) vector within the meridian plane.
///
/// Two local frames sharing the same meridian (e.g. the geodetic and the geocentric frame
/// of one point) differ by a rotation about their common east axis. Given
/// `delta = lat_source - lat_target`, the vector components are mapped as:
///
/// ```text
/// north' =  north · cos δ + up · sin δ
/// east'  =  east
/// up'    = -north · sin δ + up · cos δ
/// ```
pub fn rotate_meridian(vector: &Vector3<f64>, delta: Radian) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), delta) * vector
}
