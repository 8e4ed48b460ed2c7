//! Power and level conversions
use crate::{
    error::Error,
    quantity::{Dimension, Quantity, Unit},
};

/// Converts a power [Quantity] to decibel-milliwatts.
/// Fails with [Error::DimensionMismatch] if `power` is not a power,
/// and with [Error::OutOfRange] if it is not strictly positive and finite.
/// Works in the logarithmic domain, so any positive magnitude from micro-watts
/// to kilo-watts is handled without overflow.
pub fn power_to_dbm(power: &Quantity) -> Result<f64, Error> {
    let power = power.expect_dimension(Dimension::Power)?;
    if !power.is_positive() {
        return Err(Error::OutOfRange {
            field: "power",
            value: power.magnitude(),
        });
    }
    Ok(10.0 * power.value_in(Unit::Milliwatt)?.log10())
}

/// Offsets a level expressed in dBm by a power [Quantity].
///
/// This is `dbm + power_to_dbm(power)`: a sum of two levels in the
/// logarithmic domain. It is NOT the sum of two RF powers, which would have to
/// be carried out in linear units.
pub fn add_dbm_power(dbm: f64, power: &Quantity) -> Result<f64, Error> {
    Ok(dbm + power_to_dbm(power)?)
}

/// Converts a level in dBm back to a power [Quantity], in milliwatts.
pub fn dbm_to_power(dbm: f64) -> Quantity {
    Quantity::milliwatts(10.0_f64.powf(dbm / 10.0))
}

/// Formats a decibel value as `"<value> dBm"`.
/// The value uses the shortest representation that reads back identically,
/// and always carries a fractional part.
pub fn dbm_to_string(value: f64) -> String {
    format!("{:?} dBm", value)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Quantity::watts(1.0), 30.0)]
    #[case(Quantity::milliwatts(1000.0), 30.0)]
    #[case(Quantity::microwatts(10.0), -20.0)]
    #[case(Quantity::watts(10.0), 40.0)]
    #[case(Quantity::milliwatts(1.0), 0.0)]
    #[case(Quantity::new(2.0, Unit::Kilowatt), 63.01029995663981)]
    fn power_to_dbm_levels(#[case] power: Quantity, #[case] expected: f64) {
        let dbm = power_to_dbm(&power).unwrap();
        assert!((dbm - expected).abs() < 1.0E-9, "{}: {} dBm", power, dbm);
    }

    #[test]
    fn unit_independent() {
        assert_eq!(
            power_to_dbm(&Quantity::watts(1.0)),
            power_to_dbm(&Quantity::milliwatts(1000.0))
        );
    }

    #[rstest]
    #[case(30.0, Quantity::milliwatts(1000.0), 60.0)]
    #[case(-20.0, Quantity::microwatts(10.0), -40.0)]
    fn dbm_offset(#[case] dbm: f64, #[case] power: Quantity, #[case] expected: f64) {
        let sum = add_dbm_power(dbm, &power).unwrap();
        assert!((sum - expected).abs() < 1.0E-9);
    }

    #[test]
    fn rejects_non_power() {
        let mismatch = || Error::DimensionMismatch {
            expected: Dimension::Power,
            found: Dimension::Length,
        };
        assert_eq!(power_to_dbm(&Quantity::meters(10.0)), Err(mismatch()));
        assert_eq!(
            add_dbm_power(30.0, &Quantity::meters(10.0)),
            Err(mismatch())
        );
    }

    #[rstest]
    #[case(Quantity::watts(-1.0), -1.0)]
    #[case(Quantity::watts(0.0), 0.0)]
    fn rejects_non_positive_power(#[case] power: Quantity, #[case] value: f64) {
        let out_of_range = || Error::OutOfRange {
            field: "power",
            value,
        };
        assert_eq!(power_to_dbm(&power), Err(out_of_range()));
        assert_eq!(add_dbm_power(30.0, &power), Err(out_of_range()));
    }

    #[test]
    fn rejects_non_finite_power() {
        assert!(matches!(
            power_to_dbm(&Quantity::watts(f64::INFINITY)),
            Err(Error::OutOfRange { field: "power", .. })
        ));
        assert!(matches!(
            power_to_dbm(&Quantity::watts(f64::NAN)),
            Err(Error::OutOfRange { field: "power", .. })
        ));
    }

    #[rstest]
    #[case(Quantity::microwatts(1.0))]
    #[case(Quantity::microwatts(37.5))]
    #[case(Quantity::milliwatts(0.25))]
    #[case(Quantity::watts(5.0))]
    #[case(Quantity::new(1.5, Unit::Kilowatt))]
    fn dbm_round_trip(#[case] power: Quantity) {
        let dbm = power_to_dbm(&power).unwrap();
        let back = dbm_to_power(dbm).value_in(power.unit()).unwrap();
        assert!(
            (back - power.magnitude()).abs() < 1.0E-9 * power.magnitude(),
            "{} -> {} dBm -> {}",
            power,
            dbm,
            back
        );
    }

    #[test]
    fn formatting() {
        let dbm = power_to_dbm(&Quantity::watts(10.0)).unwrap();
        assert_eq!(dbm_to_string(dbm), "40.0 dBm");
        assert_eq!(dbm_to_string(-123.5), "-123.5 dBm");
    }
}
