use crate::quantity::Quantity;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Link budget results, fully recomputed by every successful
/// [LinkBudgetCalculator::run](crate::prelude::LinkBudgetCalculator::run).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LinkBudgetOutputs {
    /// Downlink wavelength (m)
    pub downlink_wavelength: Quantity,
    /// Ground station to satellite slant range (m)
    pub link_distance: Quantity,
    /// Required Eb/No, with implementation loss (dB)
    pub required_ebno: f64,
    /// Transmitter output power (dBm)
    pub transmit_power_dbm: f64,
    /// Effective Isotropic Radiated Power (dBm)
    pub transmit_eirp: f64,
    /// Free space path loss, negative (dB)
    pub downlink_path_loss: f64,
    /// Power at the receiver input (dBm)
    pub received_power: f64,
    /// Receiver noise floor (dBm)
    pub minimum_detectable_signal: f64,
    /// Received Eb/No (dB)
    pub energy_noise_ratio: f64,
    /// Received minus required Eb/No (dB). Positive when the link closes.
    pub link_margin: f64,
}

impl Default for LinkBudgetOutputs {
    fn default() -> Self {
        Self {
            downlink_wavelength: Quantity::meters(0.0),
            link_distance: Quantity::meters(0.0),
            required_ebno: 0.0,
            transmit_power_dbm: 0.0,
            transmit_eirp: 0.0,
            downlink_path_loss: 0.0,
            received_power: 0.0,
            minimum_detectable_signal: 0.0,
            energy_noise_ratio: 0.0,
            link_margin: 0.0,
        }
    }
}

impl LinkBudgetOutputs {
    /// True when the link closes (positive or null margin)
    pub fn closes(&self) -> bool {
        self.link_margin >= 0.0
    }
}
