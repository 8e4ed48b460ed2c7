//! Ground station location and topocentric look angles
use nalgebra::{Matrix3, Vector3};

use crate::constants::{EARTH_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84_KM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Azimuth, elevation and slant range of a satellite, as seen by an [Observer].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LookAngles {
    /// Azimuth, clockwise from true North, in [0, 360) degrees
    pub azimuth_deg: f64,
    /// Elevation above the local horizon, in degrees
    pub elevation_deg: f64,
    /// Slant range, in kilometers
    pub range_km: f64,
}

/// [Observer] is the ground station: geodetic coordinates on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observer {
    /// Latitude, in degrees, positive North
    pub latitude_deg: f64,
    /// Longitude, in degrees, positive East
    pub longitude_deg: f64,
    /// Altitude above the ellipsoid, in meters
    pub altitude_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Blacksburg (VA) ground station
    pub fn blacksburg() -> Self {
        Self::new(37.2725, -80.4327, 400.0)
    }

    /// ECEF coordinates, in kilometers
    pub fn ecef_km(&self) -> Vector3<f64> {
        let (lat, lon) = (
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
        );
        let h_km = self.altitude_m / 1000.0;
        let e2 = EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);
        let n = EARTH_SEMI_MAJOR_AXIS_WGS84_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        Vector3::new(
            (n + h_km) * lat.cos() * lon.cos(),
            (n + h_km) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + h_km) * lat.sin(),
        )
    }

    /// ECEF to local East North Up rotation
    fn ecef_to_enu(&self) -> Matrix3<f64> {
        let (lat, lon) = (
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
        );
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        )
    }

    /// [LookAngles] to a target expressed in ECEF kilometers
    pub fn look_angles(&self, target_ecef_km: &Vector3<f64>) -> LookAngles {
        let los = target_ecef_km - self.ecef_km();
        let enu = self.ecef_to_enu() * los;
        let range_km = enu.norm();
        let azimuth_deg = enu[0].atan2(enu[1]).to_degrees().rem_euclid(360.0);
        let elevation_deg = (enu[2] / range_km).asin().to_degrees();
        LookAngles {
            azimuth_deg,
            elevation_deg,
            range_km,
        }
    }
}
