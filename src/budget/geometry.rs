use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    error::Error,
    quantity::{Dimension, Quantity, Unit},
};

/// sin β below which the satellite is considered at zenith
const ZENITH_EPSILON: f64 = 1.0E-9;

/// Ground station to satellite slant range, in meters.
///
/// Solves the triangle formed by the Earth center, the ground station and the satellite,
/// for a spherical Earth of radius `earth_radius`:
/// - β = elevation + π/2 is the angle at the ground station
/// - α = asin(r_gs / r_sat · sin β) is the angle at the satellite
/// - θ = π − α − β is the angle at the Earth center
/// - d = r_sat · sin θ / sin β
///
/// Fails with [Error::Geometry] when the satellite cannot be seen at that elevation.
pub fn slant_range(
    altitude_ground_station: &Quantity,
    altitude_satellite: &Quantity,
    elevation: &Quantity,
    earth_radius: &Quantity,
) -> Result<Quantity, Error> {
    let re = earth_radius.expect_dimension(Dimension::Length)?;
    let r_gs = re.checked_add(altitude_ground_station)?.to(Unit::Meter)?;
    let r_sat = re.checked_add(altitude_satellite)?.to(Unit::Meter)?;

    let beta = elevation.value_in(Unit::Radian)? + FRAC_PI_2;
    let ratio = r_gs.checked_div(&r_sat)?.magnitude();

    let arg = ratio * beta.sin();
    if !(-1.0..=1.0).contains(&arg) {
        return Err(Error::Geometry(arg));
    }

    let distance = if beta.sin() < ZENITH_EPSILON {
        // degenerate triangle: both sites are aligned with the Earth center
        r_sat.checked_sub(&r_gs)?
    } else {
        let alpha = arg.asin();
        let theta = PI - alpha - beta;
        r_sat.scale(theta.sin() / beta.sin())
    };

    if !distance.is_finite() || distance.magnitude() <= 0.0 {
        // satellite below the ground station
        return Err(Error::Geometry(arg));
    }
    Ok(distance)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn earth() -> Quantity {
        Quantity::kilometers(6371.0)
    }

    #[test]
    fn noaa_25_degrees() {
        let d = slant_range(
            &Quantity::meters(400.0),
            &Quantity::kilometers(860.0),
            &Quantity::degrees(25.0),
            &earth(),
        )
        .unwrap();
        assert_eq!(d.unit(), Unit::Meter);
        assert!((d.magnitude() - 1_659_696.57).abs() < 1.0, "{}", d);
    }

    #[test]
    fn zenith_is_altitude_difference() {
        let d = slant_range(
            &Quantity::meters(0.0),
            &Quantity::kilometers(500.0),
            &Quantity::degrees(90.0),
            &earth(),
        )
        .unwrap();
        assert!((d.magnitude() - 500_000.0).abs() < 1.0E-3);
    }

    #[rstest]
    #[case(0.0)]
    #[case(400.0)]
    #[case(2500.0)]
    fn grazing_geometry_is_longer(#[case] ground_m: f64) {
        let mut prev = 0.0_f64;
        for elev in (0..90).rev() {
            let d = slant_range(
                &Quantity::meters(ground_m),
                &Quantity::kilometers(860.0),
                &Quantity::degrees(elev as f64),
                &earth(),
            )
            .unwrap()
            .magnitude();
            assert!(d.is_finite() && d > 0.0);
            assert!(d > prev, "slant range not increasing at {}°", elev);
            prev = d;
        }
    }

    #[rstest]
    #[case(90.0)]
    #[case(88.0)]
    #[case(60.0)]
    #[case(0.0)]
    fn satellite_below_ground_station(#[case] elev_deg: f64) {
        let err = slant_range(
            &Quantity::kilometers(10.0),
            &Quantity::kilometers(5.0),
            &Quantity::degrees(elev_deg),
            &earth(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Geometry(_)), "{}° {}", elev_deg, err);
    }

    #[test]
    fn asin_out_of_domain() {
        let err = slant_range(
            &Quantity::kilometers(10.0),
            &Quantity::kilometers(5.0),
            &Quantity::degrees(0.0),
            &earth(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Geometry(arg) if arg > 1.0));
    }

    #[test]
    fn dimension_checks() {
        assert!(slant_range(
            &Quantity::watts(1.0),
            &Quantity::kilometers(860.0),
            &Quantity::degrees(25.0),
            &earth(),
        )
        .is_err());
        assert!(slant_range(
            &Quantity::meters(0.0),
            &Quantity::kilometers(860.0),
            &Quantity::meters(25.0),
            &earth(),
        )
        .is_err());
    }
}
