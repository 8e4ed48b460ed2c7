//! Link budget along a pass
use log::warn;

use crate::{
    atmosphere::atmospheric_loss_db,
    budget::LinkBudgetCalculator,
    error::Error,
    pass::PassTrack,
    prelude::Epoch,
    quantity::{Quantity, Unit},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Link budget at one [PassSample](crate::prelude::PassSample)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassBudgetSample {
    pub epoch: Epoch,
    /// Elevation used in the budget (degrees)
    pub elevation_deg: f64,
    /// Atmospheric loss applied (dB)
    pub atmospheric_loss_db: f64,
    /// Slant range (km)
    pub link_distance_km: f64,
    /// (dBm)
    pub received_power_dbm: f64,
    /// (dB)
    pub link_margin_db: f64,
}

/// Link budget evaluated at every sample of a [PassTrack]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassBudget {
    pub samples: Vec<PassBudgetSample>,
}

impl PassBudget {
    /// Sample with the lowest margin
    pub fn worst_margin(&self) -> Option<&PassBudgetSample> {
        self.samples
            .iter()
            .min_by(|a, b| a.link_margin_db.total_cmp(&b.link_margin_db))
    }

    /// True when the margin stays positive over the whole pass
    pub fn closes(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(|s| s.link_margin_db >= 0.0)
    }
}

impl LinkBudgetCalculator {
    /// Evaluates the link budget at every sample of `track`.
    ///
    /// This is an explicit, opt-in composition of both engines: for each sample,
    /// the elevation angle is taken from the track and the atmospheric loss from
    /// [atmospheric_loss_db]. Every other input is the current one.
    /// The evaluation runs on a copy: [Self] is not modified.
    pub fn pass_budget(&self, track: &PassTrack) -> Result<PassBudget, Error> {
        let mut calc = self.clone();
        let mut samples = Vec::with_capacity(track.len());

        for sample in track.iter() {
            let elevation_deg = sample.elevation_deg.clamp(0.0, 90.0);
            if elevation_deg != sample.elevation_deg {
                warn!(
                    "{}: elevation {:.3}° clamped to {:.3}°",
                    sample.epoch, sample.elevation_deg, elevation_deg
                );
            }

            let elevation = Quantity::degrees(elevation_deg);
            let atmospheric_loss = atmospheric_loss_db(&elevation)?;

            calc.set_orbit_elevation_angle(elevation)?;
            calc.set_atmospheric_loss(atmospheric_loss)?;

            let outputs = calc.run()?;

            samples.push(PassBudgetSample {
                epoch: sample.epoch,
                elevation_deg,
                atmospheric_loss_db: atmospheric_loss,
                link_distance_km: outputs.link_distance.value_in(Unit::Kilometer)?,
                received_power_dbm: outputs.received_power,
                link_margin_db: outputs.link_margin,
            });
        }

        Ok(PassBudget { samples })
    }
}
