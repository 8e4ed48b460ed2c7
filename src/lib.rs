#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod atmosphere;
mod budget;
mod cfg;
mod elements;
mod error;
mod observer;
mod pass;
mod pass_budget;
mod power;
mod propagation;
mod quantity;
mod reference;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::atmosphere::atmospheric_loss_db;
    pub use crate::budget::{slant_range, LinkBudgetCalculator, LinkBudgetInputs, LinkBudgetOutputs};
    pub use crate::cfg::{Config, LinkBudgetConfig, PredictorConfig};
    pub use crate::elements::{ElementCatalog, OrbitalElementSet};
    pub use crate::error::{Error, NoPassCause};
    pub use crate::observer::{LookAngles, Observer};
    pub use crate::pass::{PassPredictor, PassSample, PassTrack};
    pub use crate::pass_budget::{PassBudget, PassBudgetSample};
    pub use crate::power::{add_dbm_power, dbm_to_power, dbm_to_string, power_to_dbm};
    pub use crate::propagation::{OrbitalPropagation, Sgp4Propagator};
    pub use crate::quantity::{Dimension, Quantity, Unit};
    pub use crate::reference::{ExpectedOutputs, ReferenceCase};
    // re-export
    pub use hifitime::{Duration, Epoch};
}

// pub export
pub use error::Error;
