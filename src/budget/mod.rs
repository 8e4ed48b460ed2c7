//! Downlink budget
use log::{debug, error};

use crate::{
    cfg::LinkBudgetConfig,
    constants::THERMAL_NOISE_DENSITY_DBM_HZ,
    error::Error,
    power::power_to_dbm,
    quantity::{Dimension, Quantity, Unit},
};

mod geometry;
mod inputs;
mod outputs;

pub use geometry::slant_range;
pub use inputs::LinkBudgetInputs;
pub use outputs::LinkBudgetOutputs;

/// Rejects NaN and infinite intermediate results
fn finite(step: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite(step))
    }
}

/// [LinkBudgetCalculator] converts transmitter, receiver and orbit parameters
/// into received power, noise floor and link margin.
///
/// Each input has a single setter that checks its dimension and range before
/// storing it: an invalid value never reaches [Self::run].
/// [Self::run] either commits a complete new set of [LinkBudgetOutputs],
/// or leaves the previous ones untouched and [Self::is_valid] false.
///
/// The calculator is meant to be built once and run many times,
/// for example once per elevation angle of a pass.
#[derive(Debug, Clone)]
pub struct LinkBudgetCalculator {
    /// Physical constants
    cfg: LinkBudgetConfig,
    /// Current inputs
    inputs: LinkBudgetInputs,
    /// Latest committed outputs
    outputs: LinkBudgetOutputs,
    /// True when latest [Self::run] succeeded and no input changed since
    valid: bool,
}

/// Checks the injected physical constants
fn validate_config(cfg: &LinkBudgetConfig) -> Result<(), Error> {
    inputs::positive("speed_of_light", cfg.speed_of_light, Dimension::Velocity)?;
    inputs::positive("earth_radius", cfg.earth_radius, Dimension::Length)?;
    Ok(())
}

impl Default for LinkBudgetCalculator {
    fn default() -> Self {
        Self {
            cfg: LinkBudgetConfig::default(),
            inputs: LinkBudgetInputs::default(),
            outputs: LinkBudgetOutputs::default(),
            valid: false,
        }
    }
}

impl LinkBudgetCalculator {
    /// Builds a new [LinkBudgetCalculator] with given physical constants.
    /// Fails if the speed of light is not a positive velocity,
    /// or the Earth radius not a positive length.
    /// Inputs are zeroed and need to be set before [Self::run].
    pub fn new(cfg: LinkBudgetConfig) -> Result<Self, Error> {
        validate_config(&cfg)?;
        Ok(Self {
            cfg,
            ..Default::default()
        })
    }

    /// Builds a new [LinkBudgetCalculator] from a complete set of [LinkBudgetInputs]
    pub fn with_inputs(cfg: LinkBudgetConfig, inputs: LinkBudgetInputs) -> Result<Self, Error> {
        let mut s = Self::new(cfg)?;
        s.set_inputs(inputs)?;
        Ok(s)
    }

    /// Replaces the physical constants, once validated
    pub fn set_config(&mut self, cfg: LinkBudgetConfig) -> Result<(), Error> {
        validate_config(&cfg)?;
        self.cfg = cfg;
        self.valid = false;
        Ok(())
    }

    /// Physical constants in use
    pub fn config(&self) -> &LinkBudgetConfig {
        &self.cfg
    }

    /// Current inputs
    pub fn inputs(&self) -> &LinkBudgetInputs {
        &self.inputs
    }

    /// Replaces all inputs at once, once they have all been validated
    pub fn set_inputs(&mut self, inputs: LinkBudgetInputs) -> Result<(), Error> {
        inputs.validate()?;
        self.inputs = inputs;
        self.valid = false;
        Ok(())
    }

    pub fn set_altitude_ground_station(&mut self, altitude: Quantity) -> Result<(), Error> {
        self.inputs.altitude_ground_station =
            inputs::finite("altitude_ground_station", altitude, Dimension::Length)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_altitude_satellite(&mut self, altitude: Quantity) -> Result<(), Error> {
        self.inputs.altitude_satellite =
            inputs::positive("altitude_satellite", altitude, Dimension::Length)?;
        self.valid = false;
        Ok(())
    }

    /// Elevation angle, within [0°, 90°]
    pub fn set_orbit_elevation_angle(&mut self, elevation: Quantity) -> Result<(), Error> {
        self.inputs.orbit_elevation_angle = inputs::elevation("orbit_elevation_angle", elevation)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_downlink_frequency(&mut self, frequency: Quantity) -> Result<(), Error> {
        self.inputs.downlink_frequency =
            inputs::positive("downlink_frequency", frequency, Dimension::Frequency)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_target_energy_noise_ratio(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.target_energy_noise_ratio = inputs::decibel("target_energy_noise_ratio", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_implementation_loss(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.implementation_loss = inputs::decibel("implementation_loss", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_transmit_power(&mut self, power: Quantity) -> Result<(), Error> {
        self.inputs.transmit_power = inputs::positive("transmit_power", power, Dimension::Power)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_transmit_losses(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.transmit_losses = inputs::decibel("transmit_losses", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_transmit_antenna_gain(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.transmit_antenna_gain = inputs::decibel("transmit_antenna_gain", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_transmit_pointing_loss(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.transmit_pointing_loss = inputs::decibel("transmit_pointing_loss", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_polarization_losses(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.polarization_losses = inputs::decibel("polarization_losses", db)?;
        self.valid = false;
        Ok(())
    }

    /// See [atmospheric_loss_db](crate::prelude::atmospheric_loss_db) to derive it from elevation
    pub fn set_atmospheric_loss(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.atmospheric_loss = inputs::decibel("atmospheric_loss", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_receive_antenna_gain(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.receive_antenna_gain = inputs::decibel("receive_antenna_gain", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_receiving_pointing_loss(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.receiving_pointing_loss = inputs::decibel("receiving_pointing_loss", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_system_noise_figure(&mut self, db: f64) -> Result<(), Error> {
        self.inputs.system_noise_figure = inputs::decibel("system_noise_figure", db)?;
        self.valid = false;
        Ok(())
    }

    pub fn set_noise_bandwidth(&mut self, bandwidth: Quantity) -> Result<(), Error> {
        self.inputs.noise_bandwidth =
            inputs::positive("noise_bandwidth", bandwidth, Dimension::Frequency)?;
        self.valid = false;
        Ok(())
    }

    /// True when the latest [Self::run] succeeded, and inputs did not change since.
    /// Outputs should not be trusted otherwise.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Latest committed [LinkBudgetOutputs]
    pub fn outputs(&self) -> &LinkBudgetOutputs {
        &self.outputs
    }

    pub fn downlink_wavelength(&self) -> Quantity {
        self.outputs.downlink_wavelength
    }

    pub fn link_distance(&self) -> Quantity {
        self.outputs.link_distance
    }

    pub fn required_ebno(&self) -> f64 {
        self.outputs.required_ebno
    }

    pub fn transmit_power_dbm(&self) -> f64 {
        self.outputs.transmit_power_dbm
    }

    pub fn transmit_eirp(&self) -> f64 {
        self.outputs.transmit_eirp
    }

    pub fn downlink_path_loss(&self) -> f64 {
        self.outputs.downlink_path_loss
    }

    pub fn received_power(&self) -> f64 {
        self.outputs.received_power
    }

    pub fn minimum_detectable_signal(&self) -> f64 {
        self.outputs.minimum_detectable_signal
    }

    pub fn energy_noise_ratio(&self) -> f64 {
        self.outputs.energy_noise_ratio
    }

    pub fn link_margin(&self) -> f64 {
        self.outputs.link_margin
    }

    /// Evaluates the link budget.
    ///
    /// On success, the new [LinkBudgetOutputs] are committed and returned.
    /// On failure, previous outputs are preserved but [Self::is_valid] is false.
    pub fn run(&mut self) -> Result<&LinkBudgetOutputs, Error> {
        self.valid = false;
        match self.evaluate() {
            Ok(outputs) => {
                self.outputs = outputs;
                self.valid = true;
                Ok(&self.outputs)
            },
            Err(e) => {
                error!("link budget evaluation failed: {}", e);
                Err(e)
            },
        }
    }

    fn evaluate(&self) -> Result<LinkBudgetOutputs, Error> {
        let inputs = &self.inputs;
        inputs.validate()?;

        let downlink_wavelength = self
            .cfg
            .speed_of_light
            .checked_div(&inputs.downlink_frequency)?;
        finite("wavelength", downlink_wavelength.magnitude())?;

        let link_distance = slant_range(
            &inputs.altitude_ground_station,
            &inputs.altitude_satellite,
            &inputs.orbit_elevation_angle,
            &self.cfg.earth_radius,
        )?;

        debug!(
            "wavelength={:.6} m, link distance={:.3} km",
            downlink_wavelength.magnitude(),
            link_distance.value_in(Unit::Kilometer)?
        );

        let transmit_power_dbm = finite("transmit power", power_to_dbm(&inputs.transmit_power)?)?;

        let transmit_eirp = transmit_power_dbm
            + inputs.transmit_losses
            + inputs.transmit_antenna_gain
            + inputs.transmit_pointing_loss;

        let ratio = link_distance
            .scale(4.0 * std::f64::consts::PI)
            .checked_div(&downlink_wavelength)?;
        let downlink_path_loss = finite("path loss", -20.0 * ratio.magnitude().log10())?;

        let required_ebno = inputs.target_energy_noise_ratio - inputs.implementation_loss;

        // gains and losses are summed once each
        let received_power = transmit_eirp
            + downlink_path_loss
            + inputs.polarization_losses
            + inputs.atmospheric_loss
            + inputs.receive_antenna_gain
            + inputs.receiving_pointing_loss;

        let bandwidth_hz = inputs.noise_bandwidth.value_in(Unit::Hertz)?;
        let minimum_detectable_signal = finite(
            "noise floor",
            THERMAL_NOISE_DENSITY_DBM_HZ + 10.0 * bandwidth_hz.log10() + inputs.system_noise_figure,
        )?;

        let energy_noise_ratio = received_power - minimum_detectable_signal;
        let link_margin = finite("link margin", energy_noise_ratio - required_ebno)?;

        debug!(
            "eirp={:.2} dBm, path loss={:.2} dB, rx={:.2} dBm, mds={:.2} dBm, eb/no={:.2} dB, margin={:.2} dB",
            transmit_eirp,
            downlink_path_loss,
            received_power,
            minimum_detectable_signal,
            energy_noise_ratio,
            link_margin,
        );

        Ok(LinkBudgetOutputs {
            downlink_wavelength,
            link_distance,
            required_ebno,
            transmit_power_dbm,
            transmit_eirp,
            downlink_path_loss,
            received_power,
            minimum_detectable_signal,
            energy_noise_ratio,
            link_margin,
        })
    }
}
