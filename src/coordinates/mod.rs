//! # Coordinate systems and conversions
//!
//! This module converts **points** and **vectors** between the three coordinate systems
//! used by geomagnetic models:
//!
//! | system | point components | vector components |
//! | --- | --- | --- |
//! | [`CoordinateSystem::GeodeticWgs84`] | geodetic latitude °, longitude °, height above WGS84 km | north, east, up (ellipsoid normal frame) |
//! | [`CoordinateSystem::GeocentricSpherical`] | geocentric latitude °, longitude °, radius km | north, east, up (radial frame) |
//! | [`CoordinateSystem::GeocentricCartesian`] | x, y, z km (Earth-centred, Earth-fixed) | x, y, z |
//!
//! Vectors are always attached to a point: the geodetic and spherical local bases rotate
//! from one point to the next, so converting a vector needs the point it is anchored at.
//!
//! ## Frames & conventions
//!
//! ```text
//! GeodeticWgs84  <--(WGS84 ellipsoid)-->  GeocentricCartesian  <--(sphere)-->  GeocentricSpherical
//!        \_____________________(meridian-plane rotation)_____________________________/
//! ```
//!
//! - Longitudes are east positive and returned in the (-180°, 180°] range.
//! - The geodetic and spherical local frames of a point share the east axis and differ by
//!   a rotation of `φ_geodetic - φ_geocentric` in the meridian plane.
//! - Every pair of systems has its own conversion routine (enum dispatch, no trait objects).
//!
//! ## See also
//! ------------
//! * [`geodetic::geodetic_to_cartesian`], [`geodetic::cartesian_to_geodetic`] – WGS84 conversions.
//! * [`spherical::local_basis`] – Local (north, east, up) frame.

pub mod geodetic;
pub mod spherical;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::magline_errors::MaglineError;

use self::geodetic::{cartesian_to_geodetic, geodetic_to_cartesian};
use self::spherical::{cartesian_to_spherical, local_basis, rotate_meridian, spherical_to_cartesian};

/// Coordinate system tag paired with every point and vector of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Geodetic coordinates above the WGS84 ellipsoid.
    GeodeticWgs84,
    /// Geocentric spherical coordinates.
    GeocentricSpherical,
    /// Geocentric Cartesian coordinates.
    GeocentricCartesian,
}

impl std::fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSystem::GeodeticWgs84 => write!(f, "GEODETIC_ABOVE_WGS84"),
            CoordinateSystem::GeocentricSpherical => write!(f, "GEOCENTRIC_SPHERICAL"),
            CoordinateSystem::GeocentricCartesian => write!(f, "GEOCENTRIC_CARTESIAN"),
        }
    }
}

/// Geodetic → geocentric spherical, through the Cartesian representation.
pub fn geodetic_to_spherical(point: &Vector3<f64>) -> Vector3<f64> {
    cartesian_to_spherical(&geodetic_to_cartesian(point))
}

/// Geocentric spherical → geodetic, through the Cartesian representation.
pub fn spherical_to_geodetic(point: &Vector3<f64>) -> Vector3<f64> {
    cartesian_to_geodetic(&spherical_to_cartesian(point))
}

/// Convert a point from one coordinate system to another.
///
/// Arguments
/// ---------
/// * `point`: point components in the `from` system.
/// * `from`: coordinate system of `point`.
/// * `to`: requested coordinate system.
///
/// Return
/// ------
/// * The point components in the `to` system. Converting to the same system is the identity.
pub fn convert_point(
    point: &Vector3<f64>,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Vector3<f64> {
    use CoordinateSystem::*;

    match (from, to) {
        (GeodeticWgs84, GeodeticWgs84)
        | (GeocentricSpherical, GeocentricSpherical)
        | (GeocentricCartesian, GeocentricCartesian) => *point,
        (GeodeticWgs84, GeocentricSpherical) => geodetic_to_spherical(point),
        (GeodeticWgs84, GeocentricCartesian) => geodetic_to_cartesian(point),
        (GeocentricSpherical, GeodeticWgs84) => spherical_to_geodetic(point),
        (GeocentricSpherical, GeocentricCartesian) => spherical_to_cartesian(point),
        (GeocentricCartesian, GeodeticWgs84) => cartesian_to_geodetic(point),
        (GeocentricCartesian, GeocentricSpherical) => cartesian_to_spherical(point),
    }
}

/// Convert a vector anchored at `point` from one coordinate system to another.
///
/// The local (north, east, up) bases of the geodetic and spherical systems depend on the
/// latitude and longitude of the point, hence the vector conversion is a per-point rotation,
/// never a global one.
///
/// Arguments
/// ---------
/// * `point`: anchor point of the vector, expressed in the `from` system.
/// * `vector`: vector components in the local basis of `from` at `point`.
/// * `from`: coordinate system of `point` and `vector`.
/// * `to`: requested coordinate system.
///
/// Return
/// ------
/// * The vector components in the local basis of `to` at the same physical point.
pub fn convert_vector(
    point: &Vector3<f64>,
    vector: &Vector3<f64>,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Vector3<f64> {
    use CoordinateSystem::*;

    match (from, to) {
        (GeodeticWgs84, GeodeticWgs84)
        | (GeocentricSpherical, GeocentricSpherical)
        | (GeocentricCartesian, GeocentricCartesian) => *vector,
        (GeodeticWgs84, GeocentricSpherical) => {
            let spherical = geodetic_to_spherical(point);
            rotate_meridian(vector, (point.x - spherical.x).to_radians())
        }
        (GeocentricSpherical, GeodeticWgs84) => {
            let geodetic = spherical_to_geodetic(point);
            rotate_meridian(vector, (point.x - geodetic.x).to_radians())
        }
        (GeodeticWgs84, GeocentricCartesian) | (GeocentricSpherical, GeocentricCartesian) => {
            local_basis(point.x.to_radians(), point.y.to_radians()) * vector
        }
        (GeocentricCartesian, GeodeticWgs84) => {
            let geodetic = cartesian_to_geodetic(point);
            local_basis(geodetic.x.to_radians(), geodetic.y.to_radians()).transpose() * vector
        }
        (GeocentricCartesian, GeocentricSpherical) => {
            let spherical = cartesian_to_spherical(point);
            local_basis(spherical.x.to_radians(), spherical.y.to_radians()).transpose() * vector
        }
    }
}

/// Convert a sequence of points, see [`convert_point`].
pub fn convert_points(
    points: &[Vector3<f64>],
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Vec<Vector3<f64>> {
    points
        .iter()
        .map(|point| convert_point(point, from, to))
        .collect()
}

/// Convert a sequence of vectors anchored at the matching points, see [`convert_vector`].
///
/// Errors
/// ------
/// * [`MaglineError::LengthMismatch`] if `points` and `vectors` differ in length.
pub fn convert_vectors(
    points: &[Vector3<f64>],
    vectors: &[Vector3<f64>],
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<Vec<Vector3<f64>>, MaglineError> {
    if points.len() != vectors.len() {
        return Err(MaglineError::LengthMismatch {
            points: points.len(),
            vectors: vectors.len(),
        });
    }

    Ok(points
        .iter()
        .zip(vectors)
        .map(|(point, vector)| convert_vector(point, vector, from, to))
        .collect())
}
