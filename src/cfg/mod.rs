#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    constants::{EARTH_MEAN_RADIUS_KM, SPEED_OF_LIGHT_M_S},
    observer::Observer,
    prelude::Duration,
    quantity::Quantity,
};

fn default_speed_of_light() -> Quantity {
    Quantity::meters_per_second(SPEED_OF_LIGHT_M_S)
}

fn default_earth_radius() -> Quantity {
    Quantity::kilometers(EARTH_MEAN_RADIUS_KM)
}

fn default_search_horizon() -> Duration {
    Duration::from_days(2.0)
}

fn default_coarse_step() -> Duration {
    Duration::from_seconds(30.0)
}

fn default_rise_tolerance() -> Duration {
    Duration::from_milliseconds(10.0)
}

fn default_sample_period() -> Duration {
    Duration::from_seconds(1.0)
}

fn default_max_samples() -> usize {
    7200
}

fn default_timeout() -> Option<std::time::Duration> {
    None
}

/// Physical constants injected into the
/// [LinkBudgetCalculator](crate::prelude::LinkBudgetCalculator).
/// Override them to run what-if scenarios or deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct LinkBudgetConfig {
    /// Speed of light, as a velocity
    #[cfg_attr(feature = "serde", serde(default = "default_speed_of_light"))]
    pub speed_of_light: Quantity,
    /// Spherical Earth radius used in the slant range triangle
    #[cfg_attr(feature = "serde", serde(default = "default_earth_radius"))]
    pub earth_radius: Quantity,
}

impl Default for LinkBudgetConfig {
    fn default() -> Self {
        Self {
            speed_of_light: default_speed_of_light(),
            earth_radius: default_earth_radius(),
        }
    }
}

/// [PassPredictor](crate::prelude::PassPredictor) parametrization.
/// Every loop of the predictor is bounded by one of these settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PredictorConfig {
    /// Rise search does not look further than this, past the start [Epoch](crate::prelude::Epoch).
    #[cfg_attr(feature = "serde", serde(default = "default_search_horizon"))]
    pub search_horizon: Duration,
    /// Coarse step of the rise search. Passes shorter than that may be missed.
    #[cfg_attr(feature = "serde", serde(default = "default_coarse_step"))]
    pub coarse_step: Duration,
    /// Rise instant is refined down to this tolerance
    #[cfg_attr(feature = "serde", serde(default = "default_rise_tolerance"))]
    pub rise_tolerance: Duration,
    /// Track sampling period
    #[cfg_attr(feature = "serde", serde(default = "default_sample_period"))]
    pub sample_period: Duration,
    /// Maximal number of samples in one track
    #[cfg_attr(feature = "serde", serde(default = "default_max_samples"))]
    pub max_samples: usize,
    /// Optional wall clock budget for one prediction
    #[cfg_attr(feature = "serde", serde(default = "default_timeout"))]
    pub timeout: Option<std::time::Duration>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            search_horizon: default_search_horizon(),
            coarse_step: default_coarse_step(),
            rise_tolerance: default_rise_tolerance(),
            sample_period: default_sample_period(),
            max_samples: default_max_samples(),
            timeout: default_timeout(),
        }
    }
}

impl PredictorConfig {
    /// Copies and returns [Self] with a wall clock budget
    pub fn with_timeout(&self, timeout: std::time::Duration) -> Self {
        let mut s = *self;
        s.timeout = Some(timeout);
        s
    }

    /// Copies and returns [Self] with a new sample cap
    pub fn with_max_samples(&self, max_samples: usize) -> Self {
        let mut s = *self;
        s.max_samples = max_samples;
        s
    }

    /// Copies and returns [Self] with a new rise search horizon
    pub fn with_search_horizon(&self, horizon: Duration) -> Self {
        let mut s = *self;
        s.search_horizon = horizon;
        s
    }
}

/// Complete setup: ground station location and both engines.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Ground station location
    #[cfg_attr(feature = "serde", serde(default))]
    pub observer: Observer,
    /// Link budget constants
    #[cfg_attr(feature = "serde", serde(default))]
    pub budget: LinkBudgetConfig,
    /// Pass prediction settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Returns [Config] for the Blacksburg (VA) ground station.
    /// You can then customize [Self] as you will.
    pub fn blacksburg_preset() -> Self {
        let mut s = Self::default();
        s.observer = Observer::blacksburg();
        s
    }
}
