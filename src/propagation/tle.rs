use log::warn;
use nalgebra::Vector3;

use crate::{
    elements::OrbitalElementSet,
    error::Error,
    observer::{LookAngles, Observer},
    prelude::{Duration, Epoch},
    propagation::{teme_to_ecef, OrbitalPropagation},
};

/// Elements older than this are considered stale
const STALE_ELEMENTS_DAYS: f64 = 30.0;

/// SGP4/SDP4 [OrbitalPropagation] backend, for one satellite seen from one [Observer].
pub struct Sgp4Propagator {
    /// Ground station
    observer: Observer,
    /// Reference epoch of the elements
    epoch: Epoch,
    /// Propagation model state
    constants: sgp4::Constants,
}

impl Sgp4Propagator {
    pub fn new(elements: &OrbitalElementSet, observer: &Observer) -> Result<Self, Error> {
        let constants = sgp4::Constants::from_elements(elements.elements())
            .map_err(|e| Error::InvalidElements(e.to_string()))?;

        Ok(Self {
            observer: *observer,
            epoch: elements.epoch()?,
            constants,
        })
    }

    /// Reference [Epoch] of the elements
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Logs a warning when predicting far away from the elements epoch
    pub(crate) fn check_age(&self, t: Epoch) {
        let age = (t - self.epoch).abs();
        if age > Duration::from_days(STALE_ELEMENTS_DAYS) {
            warn!(
                "predicting {} away from elements epoch: accuracy degraded",
                age
            );
        }
    }

    /// Satellite position in the TEME frame, in kilometers
    pub fn teme_position_km(&self, t: Epoch) -> Result<Vector3<f64>, Error> {
        let minutes = (t.to_utc_seconds() - self.epoch.to_utc_seconds()) / 60.0;
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| Error::Propagation(format!("{}: {}", t, e)))?;
        Ok(Vector3::from(prediction.position))
    }
}

impl OrbitalPropagation for Sgp4Propagator {
    fn look_angles(&self, t: Epoch) -> Result<LookAngles, Error> {
        let teme = self.teme_position_km(t)?;
        let ecef = teme_to_ecef(&teme, t);
        Ok(self.observer.look_angles(&ecef))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::ISS_TLE;

    fn iss() -> Sgp4Propagator {
        let (name, l1, l2) = ISS_TLE;
        let elements = OrbitalElementSet::new(name, l1, l2).unwrap();
        Sgp4Propagator::new(&elements, &Observer::blacksburg()).unwrap()
    }

    #[test]
    fn orbit_radius() {
        let iss = iss();
        for minutes in [0.0, 45.0, 90.0, 600.0] {
            let t = iss.epoch() + Duration::from_seconds(minutes * 60.0);
            let r = iss.teme_position_km(t).unwrap().norm();
            // ~420 km altitude, low eccentricity
            assert!(r > 6_700.0 && r < 6_850.0, "r={} km at +{} min", r, minutes);
        }
    }

    #[test]
    fn look_angles_are_consistent() {
        let iss = iss();
        for minutes in 0..120 {
            let t = iss.epoch() + Duration::from_seconds(minutes as f64 * 60.0);
            let angles = iss.look_angles(t).unwrap();
            assert!((0.0..360.0).contains(&angles.azimuth_deg));
            assert!((-90.0..=90.0).contains(&angles.elevation_deg));
            // never closer than its altitude, never further than the Earth diameter + orbit
            assert!(angles.range_km > 350.0 && angles.range_km < 13_300.0);
        }
    }

    #[test]
    fn epoch_matches_elements() {
        let (name, l1, l2) = ISS_TLE;
        let elements = OrbitalElementSet::new(name, l1, l2).unwrap();
        assert_eq!(iss().epoch(), elements.epoch().unwrap());
    }
}
