//! Dimensioned values
use uom::si::{
    angle::{degree, radian},
    f64::{Angle, Frequency, Length, Power, Ratio, Velocity},
    frequency::{gigahertz, hertz, kilohertz, megahertz},
    length::{kilometer, meter},
    power::{kilowatt, microwatt, milliwatt, watt},
    ratio::ratio,
    velocity::meter_per_second,
};

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical dimension of a [Quantity]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimension {
    Length,
    Angle,
    Frequency,
    Power,
    Velocity,
    Dimensionless,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Length => write!(f, "[length]"),
            Self::Angle => write!(f, "[angle]"),
            Self::Frequency => write!(f, "[frequency]"),
            Self::Power => write!(f, "[power]"),
            Self::Velocity => write!(f, "[velocity]"),
            Self::Dimensionless => write!(f, "[dimensionless]"),
        }
    }
}

/// Units supported by [Quantity]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    Meter,
    Kilometer,
    Degree,
    Radian,
    Hertz,
    Kilohertz,
    Megahertz,
    Gigahertz,
    Microwatt,
    Milliwatt,
    Watt,
    Kilowatt,
    MeterPerSecond,
    One,
}

impl Unit {
    /// Physical [Dimension] of this [Unit]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Meter | Self::Kilometer => Dimension::Length,
            Self::Degree | Self::Radian => Dimension::Angle,
            Self::Hertz | Self::Kilohertz | Self::Megahertz | Self::Gigahertz => {
                Dimension::Frequency
            },
            Self::Microwatt | Self::Milliwatt | Self::Watt | Self::Kilowatt => Dimension::Power,
            Self::MeterPerSecond => Dimension::Velocity,
            Self::One => Dimension::Dimensionless,
        }
    }

    /// Symbol, as used by [Display] and [FromStr](std::str::FromStr)
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Degree => "deg",
            Self::Radian => "rad",
            Self::Hertz => "Hz",
            Self::Kilohertz => "kHz",
            Self::Megahertz => "MHz",
            Self::Gigahertz => "GHz",
            Self::Microwatt => "uW",
            Self::Milliwatt => "mW",
            Self::Watt => "W",
            Self::Kilowatt => "kW",
            Self::MeterPerSecond => "m/s",
            Self::One => "",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for Unit {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // SI prefixes are case sensitive (mW versus MW)
        match s.trim() {
            "m" => Ok(Self::Meter),
            "km" => Ok(Self::Kilometer),
            "deg" | "°" => Ok(Self::Degree),
            "rad" => Ok(Self::Radian),
            "Hz" => Ok(Self::Hertz),
            "kHz" => Ok(Self::Kilohertz),
            "MHz" => Ok(Self::Megahertz),
            "GHz" => Ok(Self::Gigahertz),
            "uW" | "µW" => Ok(Self::Microwatt),
            "mW" => Ok(Self::Milliwatt),
            "W" => Ok(Self::Watt),
            "kW" => Ok(Self::Kilowatt),
            "m/s" => Ok(Self::MeterPerSecond),
            "" | "1" => Ok(Self::One),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

/// Statically typed value, one variant per [Dimension]
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Length(Length),
    Angle(Angle),
    Frequency(Frequency),
    Power(Power),
    Velocity(Velocity),
    Ratio(Ratio),
}

impl Value {
    fn new(magnitude: f64, unit: Unit) -> Self {
        match unit {
            Unit::Meter => Self::Length(Length::new::<meter>(magnitude)),
            Unit::Kilometer => Self::Length(Length::new::<kilometer>(magnitude)),
            Unit::Degree => Self::Angle(Angle::new::<degree>(magnitude)),
            Unit::Radian => Self::Angle(Angle::new::<radian>(magnitude)),
            Unit::Hertz => Self::Frequency(Frequency::new::<hertz>(magnitude)),
            Unit::Kilohertz => Self::Frequency(Frequency::new::<kilohertz>(magnitude)),
            Unit::Megahertz => Self::Frequency(Frequency::new::<megahertz>(magnitude)),
            Unit::Gigahertz => Self::Frequency(Frequency::new::<gigahertz>(magnitude)),
            Unit::Microwatt => Self::Power(Power::new::<microwatt>(magnitude)),
            Unit::Milliwatt => Self::Power(Power::new::<milliwatt>(magnitude)),
            Unit::Watt => Self::Power(Power::new::<watt>(magnitude)),
            Unit::Kilowatt => Self::Power(Power::new::<kilowatt>(magnitude)),
            Unit::MeterPerSecond => Self::Velocity(Velocity::new::<meter_per_second>(magnitude)),
            Unit::One => Self::Ratio(Ratio::new::<ratio>(magnitude)),
        }
    }

    fn dimension(&self) -> Dimension {
        match self {
            Self::Length(_) => Dimension::Length,
            Self::Angle(_) => Dimension::Angle,
            Self::Frequency(_) => Dimension::Frequency,
            Self::Power(_) => Dimension::Power,
            Self::Velocity(_) => Dimension::Velocity,
            Self::Ratio(_) => Dimension::Dimensionless,
        }
    }

    /// Magnitude expressed in `unit`, None when dimensions differ
    fn get(&self, unit: Unit) -> Option<f64> {
        match (self, unit) {
            (Self::Length(v), Unit::Meter) => Some(v.get::<meter>()),
            (Self::Length(v), Unit::Kilometer) => Some(v.get::<kilometer>()),
            (Self::Angle(v), Unit::Degree) => Some(v.get::<degree>()),
            (Self::Angle(v), Unit::Radian) => Some(v.get::<radian>()),
            (Self::Frequency(v), Unit::Hertz) => Some(v.get::<hertz>()),
            (Self::Frequency(v), Unit::Kilohertz) => Some(v.get::<kilohertz>()),
            (Self::Frequency(v), Unit::Megahertz) => Some(v.get::<megahertz>()),
            (Self::Frequency(v), Unit::Gigahertz) => Some(v.get::<gigahertz>()),
            (Self::Power(v), Unit::Microwatt) => Some(v.get::<microwatt>()),
            (Self::Power(v), Unit::Milliwatt) => Some(v.get::<milliwatt>()),
            (Self::Power(v), Unit::Watt) => Some(v.get::<watt>()),
            (Self::Power(v), Unit::Kilowatt) => Some(v.get::<kilowatt>()),
            (Self::Velocity(v), Unit::MeterPerSecond) => Some(v.get::<meter_per_second>()),
            (Self::Ratio(v), Unit::One) => Some(v.get::<ratio>()),
            _ => None,
        }
    }

    /// Magnitude in the coherent SI unit of this dimension
    fn si(&self) -> f64 {
        match self {
            Self::Length(v) => v.get::<meter>(),
            Self::Angle(v) => v.get::<radian>(),
            Self::Frequency(v) => v.get::<hertz>(),
            Self::Power(v) => v.get::<watt>(),
            Self::Velocity(v) => v.get::<meter_per_second>(),
            Self::Ratio(v) => v.get::<ratio>(),
        }
    }

    fn scale(&self, factor: f64) -> Self {
        match self {
            Self::Length(v) => Self::Length(*v * factor),
            Self::Angle(v) => Self::Angle(Angle::new::<radian>(v.get::<radian>() * factor)),
            Self::Frequency(v) => Self::Frequency(*v * factor),
            Self::Power(v) => Self::Power(*v * factor),
            Self::Velocity(v) => Self::Velocity(*v * factor),
            Self::Ratio(v) => Self::Ratio(*v * factor),
        }
    }

    /// Sum (or difference, when `negate`) of two values of the same dimension
    fn combine(&self, rhs: &Self, negate: bool) -> Option<Self> {
        let sign = if negate { -1.0 } else { 1.0 };
        match (self, rhs) {
            (Self::Length(a), Self::Length(b)) => Some(Self::Length(*a + *b * sign)),
            (Self::Angle(a), Self::Angle(b)) => Some(Self::Angle(Angle::new::<radian>(
                a.get::<radian>() + sign * b.get::<radian>(),
            ))),
            (Self::Frequency(a), Self::Frequency(b)) => Some(Self::Frequency(*a + *b * sign)),
            (Self::Power(a), Self::Power(b)) => Some(Self::Power(*a + *b * sign)),
            (Self::Velocity(a), Self::Velocity(b)) => Some(Self::Velocity(*a + *b * sign)),
            (Self::Ratio(a), Self::Ratio(b)) => Some(Self::Ratio(*a + *b * sign)),
            _ => None,
        }
    }
}

/// [Quantity] is a magnitude attached to a [Unit], hence to a physical [Dimension].
/// Values are carried by `uom` typed quantities: the [Unit] only
/// selects how the magnitude is read and displayed.
/// Arithmetic and conversions between incompatible dimensions are rejected
/// with [Error::DimensionMismatch].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "QuantityRepr", into = "QuantityRepr")
)]
pub struct Quantity {
    value: Value,
    unit: Unit,
}

/// Serialized form of a [Quantity]
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct QuantityRepr {
    magnitude: f64,
    unit: Unit,
}

#[cfg(feature = "serde")]
impl From<QuantityRepr> for Quantity {
    fn from(repr: QuantityRepr) -> Self {
        Self::new(repr.magnitude, repr.unit)
    }
}

#[cfg(feature = "serde")]
impl From<Quantity> for QuantityRepr {
    fn from(q: Quantity) -> Self {
        Self {
            magnitude: q.magnitude(),
            unit: q.unit,
        }
    }
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self {
            value: Value::new(magnitude, unit),
            unit,
        }
    }

    pub fn meters(m: f64) -> Self {
        Self::new(m, Unit::Meter)
    }

    pub fn kilometers(km: f64) -> Self {
        Self::new(km, Unit::Kilometer)
    }

    pub fn degrees(deg: f64) -> Self {
        Self::new(deg, Unit::Degree)
    }

    pub fn radians(rad: f64) -> Self {
        Self::new(rad, Unit::Radian)
    }

    pub fn hertz(hz: f64) -> Self {
        Self::new(hz, Unit::Hertz)
    }

    pub fn kilohertz(khz: f64) -> Self {
        Self::new(khz, Unit::Kilohertz)
    }

    pub fn megahertz(mhz: f64) -> Self {
        Self::new(mhz, Unit::Megahertz)
    }

    pub fn watts(w: f64) -> Self {
        Self::new(w, Unit::Watt)
    }

    pub fn milliwatts(mw: f64) -> Self {
        Self::new(mw, Unit::Milliwatt)
    }

    pub fn microwatts(uw: f64) -> Self {
        Self::new(uw, Unit::Microwatt)
    }

    pub fn meters_per_second(v: f64) -> Self {
        Self::new(v, Unit::MeterPerSecond)
    }

    /// Magnitude, expressed in [Self::unit]
    pub fn magnitude(&self) -> f64 {
        // unit always matches the stored dimension
        self.value.get(self.unit).unwrap_or(f64::NAN)
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.value.dimension()
    }

    /// Returns [Self] if it has the expected [Dimension]
    pub fn expect_dimension(self, expected: Dimension) -> Result<Self, Error> {
        let found = self.dimension();
        if found == expected {
            Ok(self)
        } else {
            Err(Error::DimensionMismatch { expected, found })
        }
    }

    /// Converts [Self] to another [Unit] of the same [Dimension]
    pub fn to(&self, unit: Unit) -> Result<Self, Error> {
        self.expect_dimension(unit.dimension())?;
        Ok(Self {
            value: self.value,
            unit,
        })
    }

    /// Magnitude of [Self] once expressed in `unit`
    pub fn value_in(&self, unit: Unit) -> Result<f64, Error> {
        self.value.get(unit).ok_or(Error::DimensionMismatch {
            expected: unit.dimension(),
            found: self.dimension(),
        })
    }

    fn mismatch(&self, rhs: &Self) -> Error {
        Error::DimensionMismatch {
            expected: self.dimension(),
            found: rhs.dimension(),
        }
    }

    /// Adds two quantities of the same dimension, result is expressed in [Self::unit].
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, Error> {
        let value = self
            .value
            .combine(&rhs.value, false)
            .ok_or_else(|| self.mismatch(rhs))?;
        Ok(Self {
            value,
            unit: self.unit,
        })
    }

    /// Subtracts two quantities of the same dimension, result is expressed in [Self::unit].
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, Error> {
        let value = self
            .value
            .combine(&rhs.value, true)
            .ok_or_else(|| self.mismatch(rhs))?;
        Ok(Self {
            value,
            unit: self.unit,
        })
    }

    /// Dimension aware division.
    /// - velocity / frequency gives a length in meters
    /// - same dimensions give a dimensionless ratio
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, Error> {
        let value = match (&self.value, &rhs.value) {
            (Value::Velocity(v), Value::Frequency(f)) => {
                return Ok(Self {
                    value: Value::Length(*v / *f),
                    unit: Unit::Meter,
                })
            },
            (Value::Length(a), Value::Length(b)) => *a / *b,
            (Value::Frequency(a), Value::Frequency(b)) => *a / *b,
            (Value::Power(a), Value::Power(b)) => *a / *b,
            (Value::Velocity(a), Value::Velocity(b)) => *a / *b,
            (Value::Ratio(a), Value::Ratio(b)) => *a / *b,
            (Value::Angle(a), Value::Angle(b)) => {
                Ratio::new::<ratio>(a.get::<radian>() / b.get::<radian>())
            },
            _ => return Err(self.mismatch(rhs)),
        };
        Ok(Self {
            value: Value::Ratio(value),
            unit: Unit::One,
        })
    }

    /// Scales the magnitude, preserving the [Unit]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            value: self.value.scale(factor),
            unit: self.unit,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.value.si().is_finite()
    }

    /// True when strictly positive and finite
    pub fn is_positive(&self) -> bool {
        self.is_finite() && self.value.si() > 0.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.unit {
            Unit::One => write!(f, "{}", self.magnitude()),
            unit => write!(f, "{} {}", self.magnitude(), unit),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;
    use std::f64::consts::PI;
    use std::str::FromStr;

    #[rstest]
    #[case(Quantity::kilometers(860.0), Unit::Meter, 860_000.0)]
    #[case(Quantity::meters(400.0), Unit::Kilometer, 0.4)]
    #[case(Quantity::watts(1.0), Unit::Milliwatt, 1000.0)]
    #[case(Quantity::microwatts(10.0), Unit::Milliwatt, 0.01)]
    #[case(Quantity::kilohertz(34.0), Unit::Hertz, 34_000.0)]
    #[case(Quantity::megahertz(137.5), Unit::Kilohertz, 137_500.0)]
    #[case(Quantity::degrees(180.0), Unit::Radian, PI)]
    fn unit_conversion(#[case] q: Quantity, #[case] unit: Unit, #[case] expected: f64) {
        let value = q.value_in(unit).unwrap();
        assert!(
            (value - expected).abs() < 1.0E-9 * expected.abs().max(1.0),
            "{} -> {}: got {}, expected {}",
            q,
            unit,
            value,
            expected
        );
    }

    #[rstest]
    #[case(Quantity::meters(1234.5678), Unit::Kilometer)]
    #[case(Quantity::watts(3.7), Unit::Microwatt)]
    #[case(Quantity::hertz(137.5E6), Unit::Gigahertz)]
    #[case(Quantity::degrees(25.0), Unit::Radian)]
    fn conversion_round_trip(#[case] q: Quantity, #[case] via: Unit) {
        let back = q.to(via).unwrap().to(q.unit()).unwrap();
        assert!((back.magnitude() - q.magnitude()).abs() < 1.0E-12 * q.magnitude().abs());
    }

    #[test]
    fn kilo_prefixes_are_exact() {
        assert_eq!(Quantity::kilometers(6371.0).value_in(Unit::Meter), Ok(6_371_000.0));
        assert_eq!(Quantity::kilometers(860.0).value_in(Unit::Kilometer), Ok(860.0));
        assert_eq!(Quantity::kilohertz(34.0).value_in(Unit::Hertz), Ok(34_000.0));
    }

    #[test]
    fn conversion_keeps_the_value() {
        let q = Quantity::watts(5.0);
        let mw = q.to(Unit::Milliwatt).unwrap();
        assert_eq!(mw.unit(), Unit::Milliwatt);
        assert_eq!(mw.dimension(), Dimension::Power);
        assert!((mw.magnitude() - 5000.0).abs() < 1.0E-9);
        assert_eq!(mw.to(Unit::Watt).unwrap(), q);
    }

    #[test]
    fn positivity() {
        assert!(Quantity::watts(1.0E-9).is_positive());
        assert!(!Quantity::watts(0.0).is_positive());
        assert!(!Quantity::kilometers(-1.0).is_positive());
        assert!(!Quantity::hertz(f64::INFINITY).is_positive());
        assert!(!Quantity::hertz(f64::NAN).is_finite());
    }

    #[test]
    fn dimension_mismatch() {
        assert_eq!(
            Quantity::meters(10.0).to(Unit::Milliwatt),
            Err(Error::DimensionMismatch {
                expected: Dimension::Power,
                found: Dimension::Length,
            })
        );
        assert!(Quantity::meters(1.0)
            .checked_add(&Quantity::watts(1.0))
            .is_err());
        assert!(Quantity::meters(1.0)
            .checked_div(&Quantity::hertz(1.0))
            .is_err());
        assert!(Quantity::degrees(1.0)
            .expect_dimension(Dimension::Length)
            .is_err());
    }

    #[test]
    fn dimension_aware_arithmetic() {
        let sum = Quantity::kilometers(6371.0)
            .checked_add(&Quantity::meters(400.0))
            .unwrap();
        assert_eq!(sum.unit(), Unit::Kilometer);
        assert!((sum.magnitude() - 6371.4).abs() < 1.0E-9);

        let wavelength = Quantity::meters_per_second(299_792_458.0)
            .checked_div(&Quantity::megahertz(137.5))
            .unwrap();
        assert_eq!(wavelength.dimension(), Dimension::Length);
        assert!((wavelength.magnitude() - 2.180308785).abs() < 1.0E-6);

        let ratio_q = Quantity::kilometers(1.0)
            .checked_div(&Quantity::meters(500.0))
            .unwrap();
        assert_eq!(ratio_q, Quantity::new(2.0, Unit::One));
    }

    #[test]
    fn unit_parsing() {
        for unit in [
            Unit::Meter,
            Unit::Kilometer,
            Unit::Degree,
            Unit::Radian,
            Unit::Hertz,
            Unit::Kilohertz,
            Unit::Megahertz,
            Unit::Gigahertz,
            Unit::Microwatt,
            Unit::Milliwatt,
            Unit::Watt,
            Unit::Kilowatt,
            Unit::MeterPerSecond,
            Unit::One,
        ] {
            assert_eq!(Unit::from_str(unit.symbol()), Ok(unit));
        }
        assert_eq!(Unit::from_str("µW"), Ok(Unit::Microwatt));
        assert_eq!(
            Unit::from_str("MW"),
            Err(Error::UnknownUnit("MW".to_string()))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Quantity::kilohertz(34.0).to_string(), "34 kHz");
        assert_eq!(Quantity::new(2.5, Unit::One).to_string(), "2.5");
    }
}
