//! Atmospheric attenuation
use crate::{
    error::Error,
    quantity::{Quantity, Unit},
};

/// Atmospheric loss (in dB, negative) at given elevation angle.
/// Step table derived from the AMSAT link budget sheet, for the 137 MHz band.
/// Loss magnitude shrinks as elevation increases.
pub fn atmospheric_loss_db(elevation: &Quantity) -> Result<f64, Error> {
    let elev_deg = elevation.value_in(Unit::Degree)?;
    let loss = if elev_deg < 5.0 {
        -4.6
    } else if elev_deg < 10.0 {
        -2.1
    } else if elev_deg < 30.0 {
        -1.1
    } else if elev_deg < 45.0 {
        -0.4
    } else if elev_deg < 90.0 {
        -0.3
    } else {
        0.0
    };
    Ok(loss)
}
