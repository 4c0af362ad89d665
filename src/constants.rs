//! # Constants and type definitions for magline
//!
//! This module centralizes the **geodetic constants**, **reference values** and **common type
//! aliases** used throughout the `magline` library.
//!
//! ## Overview
//!
//! - WGS84 reference ellipsoid (kilometers)
//! - Mean Earth radius used as the reference radius of geomagnetic models
//! - Time epoch of the MJD2000 scale
//! - Default tracing bounds
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Geodetic constants
// -------------------------------------------------------------------------------------------------

/// WGS84 semi-major axis (equatorial radius) in kilometers
pub const WGS84_A: Kilometer = 6378.137;

/// WGS84 flattening
pub const WGS84_INV_FLATTENING: f64 = 298.257223563;

/// WGS84 semi-minor axis (polar radius) in kilometers
pub const WGS84_B: Kilometer = WGS84_A * (1.0 - 1.0 / WGS84_INV_FLATTENING);

/// WGS84 squared first eccentricity
pub const WGS84_EPS2: f64 = (1.0 - 1.0 / WGS84_INV_FLATTENING) * (1.0 / WGS84_INV_FLATTENING)
    + 1.0 / WGS84_INV_FLATTENING;

/// Mean Earth radius in kilometers, the customary reference radius of the IGRF/WMM models
pub const EARTH_RADIUS: Kilometer = 6371.2;

// -------------------------------------------------------------------------------------------------
// Time
// -------------------------------------------------------------------------------------------------

/// Modified Julian Date of 2000-01-01T00:00, the origin of the MJD2000 scale
pub const MJD2000_EPOCH: f64 = 51544.0;

/// Mean length of a Julian year in days
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

// -------------------------------------------------------------------------------------------------
// Tracing defaults
// -------------------------------------------------------------------------------------------------

/// Default lower radius bound of a trace: the WGS84 polar radius, so that any point on or
/// above the ellipsoid is a valid seed
pub const DEFAULT_MIN_RADIUS: Kilometer = WGS84_B;

/// Default upper radius bound of a trace
pub const DEFAULT_MAX_RADIUS: Kilometer = 100.0 * EARTH_RADIUS;

/// Default radius-relative step of the integrator: 100 km at the reference radius
pub const DEFAULT_STEP_FACTOR: f64 = 100.0 / EARTH_RADIUS;

/// Default number of integration steps per trace branch
pub const DEFAULT_MAX_STEPS: usize = 500;

/// Field magnitude (nT) below which the field direction is considered undefined
pub const DEFAULT_MIN_FIELD_MAGNITUDE: NanoTesla = 1e-9;

/// Radius tolerance (km) of the boundary-crossing refinement
pub const DEFAULT_BOUNDARY_TOLERANCE: Kilometer = 1e-9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Magnetic flux density in nanotesla
pub type NanoTesla = f64;
/// Time in days since 2000-01-01T00:00 (MJD2000)
pub type Mjd2000 = f64;
