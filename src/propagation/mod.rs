//! Orbital propagation capability
use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::{
    error::Error,
    observer::LookAngles,
    prelude::{Duration, Epoch},
};

mod tle;
pub use tle::Sgp4Propagator;

/// Any orbital propagation backend should implement the [OrbitalPropagation] trait
/// to contribute to pass prediction. This is the only query surface
/// the [PassPredictor](crate::prelude::PassPredictor) relies on.
pub trait OrbitalPropagation {
    /// Satellite [LookAngles] at requested [Epoch], as seen
    /// by the ground station this backend was set up for.
    fn look_angles(&self, t: Epoch) -> Result<LookAngles, Error>;

    /// Next rise above the horizon: the first instant past `from` where the elevation
    /// goes from ≤0° to >0°. A satellite already in sight at `from` is not rising:
    /// we wait for the next crossing.
    ///
    /// The provided implementation scans `[from, from + horizon]` with `step`,
    /// then refines the crossing by bisection, down to `tolerance`.
    /// The returned [Epoch] always has a strictly positive elevation.
    /// Returns None when there is no rise within `horizon`.
    fn next_rise(
        &self,
        from: Epoch,
        horizon: Duration,
        step: Duration,
        tolerance: Duration,
    ) -> Result<Option<Epoch>, Error> {
        if step <= Duration::ZERO {
            return Err(Error::OutOfRange {
                field: "coarse_step",
                value: step.to_seconds(),
            });
        }

        let end = from + horizon;

        // bisection needs to terminate above the time resolution
        let min_tolerance = Duration::from_microseconds(1.0);
        let tolerance = if tolerance < min_tolerance {
            min_tolerance
        } else {
            tolerance
        };

        let mut t0 = from;
        let mut el0 = self.look_angles(t0)?.elevation_deg;

        while t0 < end {
            let t1 = if t0 + step > end { end } else { t0 + step };
            let el1 = self.look_angles(t1)?.elevation_deg;

            if el0 <= 0.0 && el1 > 0.0 {
                debug!("rise bracketed within [{}, {}]", t0, t1);
                let (mut lo, mut hi) = (t0, t1);
                while hi - lo > tolerance {
                    let mid = lo + (hi - lo) * 0.5;
                    if self.look_angles(mid)?.elevation_deg > 0.0 {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                return Ok(Some(hi));
            }

            t0 = t1;
            el0 = el1;
        }

        Ok(None)
    }
}

/// Julian days per Julian year
const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Greenwich mean sidereal time (IAU-82), in radians, UT1 approximated by UTC.
pub(crate) fn gmst_rad(t: Epoch) -> f64 {
    let j2000 = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
    let years = (t.to_utc_seconds() - j2000.to_utc_seconds()) / 86_400.0 / DAYS_PER_JULIAN_YEAR;
    sgp4::iau_epoch_to_sidereal_time(years)
}

/// Rotates a TEME position into the (pseudo) Earth fixed frame.
/// Polar motion is neglected.
pub(crate) fn teme_to_ecef(teme: &Vector3<f64>, t: Epoch) -> Vector3<f64> {
    let (sin_g, cos_g) = gmst_rad(t).sin_cos();
    let rot = Matrix3::new(cos_g, sin_g, 0.0, -sin_g, cos_g, 0.0, 0.0, 0.0, 1.0);
    rot * teme
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gmst_j2000() {
        let j2000 = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
        let gmst_deg = gmst_rad(j2000).to_degrees();
        assert!((gmst_deg - 280.46061837).abs() < 1.0E-6, "{}", gmst_deg);
    }

    #[test]
    fn gmst_sidereal_day() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2024, 3, 20);
        // one sidereal day later, same orientation
        let t1 = t0 + Duration::from_seconds(86_164.0905);
        let delta = (gmst_rad(t1) - gmst_rad(t0)).abs();
        assert!(delta < 1.0E-6 || (delta - 2.0 * std::f64::consts::PI).abs() < 1.0E-6);
    }

    #[test]
    fn teme_rotation_preserves_norm_and_pole() {
        let t = Epoch::from_gregorian_utc_at_midnight(2018, 4, 4);
        let teme = Vector3::new(7000.0, -1200.0, 300.0);
        let ecef = teme_to_ecef(&teme, t);
        assert!((ecef.norm() - teme.norm()).abs() < 1.0E-9);
        assert_eq!(ecef[2], 300.0);
    }
}
