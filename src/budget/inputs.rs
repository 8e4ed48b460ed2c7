use crate::{
    error::Error,
    quantity::{Dimension, Quantity, Unit},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Checks a [Quantity] has the expected [Dimension] and is finite
pub(crate) fn finite(
    field: &'static str,
    q: Quantity,
    dimension: Dimension,
) -> Result<Quantity, Error> {
    let q = q.expect_dimension(dimension)?;
    if q.is_finite() {
        Ok(q)
    } else {
        Err(Error::OutOfRange {
            field,
            value: q.magnitude(),
        })
    }
}

/// Checks a [Quantity] has the expected [Dimension] and is strictly positive
pub(crate) fn positive(
    field: &'static str,
    q: Quantity,
    dimension: Dimension,
) -> Result<Quantity, Error> {
    let q = finite(field, q, dimension)?;
    if q.is_positive() {
        Ok(q)
    } else {
        Err(Error::OutOfRange {
            field,
            value: q.magnitude(),
        })
    }
}

/// Checks an elevation angle lies within [0°, 90°]
pub(crate) fn elevation(field: &'static str, q: Quantity) -> Result<Quantity, Error> {
    let q = finite(field, q, Dimension::Angle)?;
    let deg = q.value_in(Unit::Degree)?;
    if (0.0..=90.0).contains(&deg) {
        Ok(q)
    } else {
        Err(Error::OutOfRange { field, value: deg })
    }
}

/// Checks a decibel value is finite
pub(crate) fn decibel(field: &'static str, db: f64) -> Result<f64, Error> {
    if db.is_finite() {
        Ok(db)
    } else {
        Err(Error::OutOfRange { field, value: db })
    }
}

/// Every input of the link budget.
///
/// Losses are expressed as negative decibel values and gains as
/// positive decibel values: every term is simply summed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkBudgetInputs {
    /// Ground station altitude, above sea level
    pub altitude_ground_station: Quantity,
    /// Satellite altitude, above sea level
    pub altitude_satellite: Quantity,
    /// Satellite elevation as seen from the ground station, in [0°, 90°]
    pub orbit_elevation_angle: Quantity,
    /// Downlink carrier frequency
    pub downlink_frequency: Quantity,
    /// Target Eb/No [dB]
    pub target_energy_noise_ratio: f64,
    /// Implementation loss [dB]
    pub implementation_loss: f64,
    /// Transmitter output power
    pub transmit_power: Quantity,
    /// Transmitter line losses [dB]
    pub transmit_losses: f64,
    /// Transmitter antenna gain [dB]
    pub transmit_antenna_gain: f64,
    /// Transmitter pointing loss [dB]
    pub transmit_pointing_loss: f64,
    /// Polarization mismatch losses [dB]
    pub polarization_losses: f64,
    /// Atmospheric loss [dB], see [atmospheric_loss_db](crate::prelude::atmospheric_loss_db)
    pub atmospheric_loss: f64,
    /// Receiver antenna gain [dB]
    pub receive_antenna_gain: f64,
    /// Receiver pointing loss [dB]
    pub receiving_pointing_loss: f64,
    /// Receiver system noise figure [dB]
    pub system_noise_figure: f64,
    /// Receiver noise bandwidth
    pub noise_bandwidth: Quantity,
}

impl Default for LinkBudgetInputs {
    /// All zeros. Frequencies, power and bandwidth have to be set
    /// before a run can succeed.
    fn default() -> Self {
        Self {
            altitude_ground_station: Quantity::meters(0.0),
            altitude_satellite: Quantity::meters(0.0),
            orbit_elevation_angle: Quantity::degrees(0.0),
            downlink_frequency: Quantity::hertz(0.0),
            target_energy_noise_ratio: 0.0,
            implementation_loss: 0.0,
            transmit_power: Quantity::watts(0.0),
            transmit_losses: 0.0,
            transmit_antenna_gain: 0.0,
            transmit_pointing_loss: 0.0,
            polarization_losses: 0.0,
            atmospheric_loss: 0.0,
            receive_antenna_gain: 0.0,
            receiving_pointing_loss: 0.0,
            system_noise_figure: 0.0,
            noise_bandwidth: Quantity::hertz(0.0),
        }
    }
}

impl LinkBudgetInputs {
    /// Verifies every dimension and range invariant.
    /// Returns the first violation.
    pub fn validate(&self) -> Result<(), Error> {
        finite(
            "altitude_ground_station",
            self.altitude_ground_station,
            Dimension::Length,
        )?;
        positive(
            "altitude_satellite",
            self.altitude_satellite,
            Dimension::Length,
        )?;
        elevation("orbit_elevation_angle", self.orbit_elevation_angle)?;
        positive(
            "downlink_frequency",
            self.downlink_frequency,
            Dimension::Frequency,
        )?;
        positive("transmit_power", self.transmit_power, Dimension::Power)?;
        positive(
            "noise_bandwidth",
            self.noise_bandwidth,
            Dimension::Frequency,
        )?;
        for (field, db) in [
            ("target_energy_noise_ratio", self.target_energy_noise_ratio),
            ("implementation_loss", self.implementation_loss),
            ("transmit_losses", self.transmit_losses),
            ("transmit_antenna_gain", self.transmit_antenna_gain),
            ("transmit_pointing_loss", self.transmit_pointing_loss),
            ("polarization_losses", self.polarization_losses),
            ("atmospheric_loss", self.atmospheric_loss),
            ("receive_antenna_gain", self.receive_antenna_gain),
            ("receiving_pointing_loss", self.receiving_pointing_loss),
            ("system_noise_figure", self.system_noise_figure),
        ] {
            decibel(field, db)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_incomplete() {
        assert_eq!(
            LinkBudgetInputs::default().validate(),
            Err(Error::OutOfRange {
                field: "altitude_satellite",
                value: 0.0
            })
        );
    }

    #[test]
    fn elevation_bounds() {
        assert!(elevation("e", Quantity::degrees(0.0)).is_ok());
        assert!(elevation("e", Quantity::degrees(90.0)).is_ok());
        assert!(elevation("e", Quantity::radians(0.5)).is_ok());
        assert_eq!(
            elevation("e", Quantity::degrees(-0.1)),
            Err(Error::OutOfRange {
                field: "e",
                value: -0.1
            })
        );
        assert!(elevation("e", Quantity::degrees(90.5)).is_err());
        assert!(elevation("e", Quantity::meters(10.0)).is_err());
    }

    #[test]
    fn positivity() {
        assert!(positive("f", Quantity::hertz(1.0), Dimension::Frequency).is_ok());
        assert!(positive("f", Quantity::hertz(0.0), Dimension::Frequency).is_err());
        assert!(positive("f", Quantity::hertz(f64::NAN), Dimension::Frequency).is_err());
        assert_eq!(
            positive("f", Quantity::watts(1.0), Dimension::Frequency),
            Err(Error::DimensionMismatch {
                expected: Dimension::Frequency,
                found: Dimension::Power,
            })
        );
    }

    #[test]
    fn decibels() {
        assert_eq!(decibel("g", -3.0), Ok(-3.0));
        assert!(decibel("g", f64::INFINITY).is_err());
    }
}
