use hifitime::{Epoch, TimeScale};

use crate::constants::{Mjd2000, DAYS_PER_JULIAN_YEAR, MJD2000_EPOCH};
use crate::magline_errors::MaglineError;

/// Largest absolute calendar year handled by the conversions
const MAX_ABS_YEAR: f64 = 100_000.0;

/// Start of a calendar year on the MJD2000 scale.
///
/// The epoch is built in the TT scale so that differences between two year starts
/// are free of leap seconds.
fn year_start_mjd2000(year: i32) -> Mjd2000 {
    Epoch::from_gregorian_at_midnight(year, 1, 1, TimeScale::TT).to_mjd_tt_days() - MJD2000_EPOCH
}

/// Transformation from a decimal year to MJD2000
///
/// The fractional part of the decimal year is mapped linearly on the length of the
/// calendar year, so that `2016.5` falls half way into the 366 days of the leap year 2016.
///
/// Argument
/// --------
/// * `decimal_year`: a decimal year, e.g. `2015.5`
///
/// Return
/// ------
/// * the number of days elapsed since 2000-01-01T00:00
///
/// Errors
/// ------
/// * [`MaglineError::InvalidTime`] if the input is not finite or beyond ±100 000 years.
pub fn decimal_year_to_mjd2000(decimal_year: f64) -> Result<Mjd2000, MaglineError> {
    if !decimal_year.is_finite() || decimal_year.abs() > MAX_ABS_YEAR {
        return Err(MaglineError::InvalidTime(format!(
            "decimal year {decimal_year} cannot be converted"
        )));
    }

    let year = decimal_year.floor();
    let start = year_start_mjd2000(year as i32);
    let end = year_start_mjd2000(year as i32 + 1);

    Ok(start + (decimal_year - year) * (end - start))
}

/// Transformation from MJD2000 to a decimal year
///
/// Inverse of [`decimal_year_to_mjd2000`].
///
/// Argument
/// --------
/// * `mjd2000`: days elapsed since 2000-01-01T00:00
///
/// Return
/// ------
/// * the decimal year
pub fn mjd2000_to_decimal_year(mjd2000: Mjd2000) -> Result<f64, MaglineError> {
    if !mjd2000.is_finite() || mjd2000.abs() > MAX_ABS_YEAR * DAYS_PER_JULIAN_YEAR {
        return Err(MaglineError::InvalidTime(format!(
            "MJD2000 value {mjd2000} cannot be converted"
        )));
    }

    // first guess from the mean year length, then settle on the enclosing calendar year
    let mut year = (2000.0 + mjd2000 / DAYS_PER_JULIAN_YEAR).floor() as i32;
    while year_start_mjd2000(year) > mjd2000 {
        year -= 1;
    }
    while year_start_mjd2000(year + 1) <= mjd2000 {
        year += 1;
    }

    let start = year_start_mjd2000(year);
    let end = year_start_mjd2000(year + 1);

    Ok(year as f64 + (mjd2000 - start) / (end - start))
}
