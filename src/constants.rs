/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Mean Earth radius (kilometers)
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// WGS84 Earth Frame Ellipsoid semi-major axis (kilometers)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84_KM: f64 = 6378.137;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// Thermal noise power spectral density at room temperature (290 K), in dBm/Hz.
/// Fixed by physics: not part of any configuration.
pub const THERMAL_NOISE_DENSITY_DBM_HZ: f64 = -174.0;
