//! Pass geometry prediction
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use itertools::Itertools;
use log::{debug, info};

use crate::{
    cfg::PredictorConfig,
    elements::OrbitalElementSet,
    error::{Error, NoPassCause},
    observer::Observer,
    prelude::{Duration, Epoch},
    propagation::{OrbitalPropagation, Sgp4Propagator},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Satellite attitude at one instant of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassSample {
    /// Sampling instant
    pub epoch: Epoch,
    /// Azimuth, clockwise from true North, in [0, 360) degrees
    pub azimuth_deg: f64,
    /// Elevation in degrees, always positive within a [PassTrack]
    pub elevation_deg: f64,
}

/// Coarse steps scanned between two interruption checks, during the rise search
const RISE_SEARCH_CHUNK_STEPS: usize = 120;

/// [PassTrack] is one visible pass: chronological [PassSample]s, evenly spaced,
/// from the first instant above the horizon to the last one before the satellite sets.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassTrack {
    samples: Vec<PassSample>,
}

impl PassTrack {
    pub fn samples(&self) -> &[PassSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PassSample> {
        self.samples.iter()
    }

    /// First sample, right after the rise
    pub fn rise(&self) -> Option<&PassSample> {
        self.samples.first()
    }

    /// Last sample, right before the set
    pub fn set(&self) -> Option<&PassSample> {
        self.samples.last()
    }

    /// Time elapsed between first and last sample
    pub fn duration(&self) -> Duration {
        match (self.rise(), self.set()) {
            (Some(rise), Some(set)) => set.epoch - rise.epoch,
            _ => Duration::ZERO,
        }
    }

    /// Highest elevation sample
    pub fn culmination(&self) -> Option<&PassSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.elevation_deg.total_cmp(&b.elevation_deg))
    }

    /// True if all samples are spaced by exactly `period`
    pub fn is_evenly_spaced(&self, period: Duration) -> bool {
        self.samples
            .iter()
            .tuple_windows()
            .all(|(a, b)| b.epoch - a.epoch == period)
    }
}

impl<'a> IntoIterator for &'a PassTrack {
    type Item = &'a PassSample;
    type IntoIter = std::slice::Iter<'a, PassSample>;
    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl IntoIterator for PassTrack {
    type Item = PassSample;
    type IntoIter = std::vec::IntoIter<PassSample>;
    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

/// [PassPredictor] finds the next visible pass and samples it.
///
/// Every loop is bounded: the rise search by [PredictorConfig::search_horizon],
/// the track by [PredictorConfig::max_samples] and optionally by [PredictorConfig::timeout].
/// A cancellation flag may also be installed, to interrupt the prediction from another thread.
#[derive(Debug, Clone, Default)]
pub struct PassPredictor {
    /// Bounds and sampling
    cfg: PredictorConfig,
    /// Raised by the caller to interrupt
    cancel: Option<Arc<AtomicBool>>,
}

impl PassPredictor {
    pub fn new(cfg: PredictorConfig) -> Self {
        Self { cfg, cancel: None }
    }

    /// Copies and returns [Self] with a cancellation flag.
    /// Raising the flag interrupts the prediction with [Error::Cancelled].
    pub fn with_cancellation(&self, flag: Arc<AtomicBool>) -> Self {
        let mut s = self.clone();
        s.cancel = Some(flag);
        s
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.cfg
    }

    /// Predicts the next pass of the satellite described by `elements`,
    /// over `observer`, past `from`, using the SGP4/SDP4 model.
    pub fn predict_next_pass(
        &self,
        elements: &OrbitalElementSet,
        from: Epoch,
        observer: &Observer,
    ) -> Result<PassTrack, Error> {
        let propagator = Sgp4Propagator::new(elements, observer)?;
        propagator.check_age(from);
        self.predict_with(&propagator, from)
    }

    /// Predicts the next pass past `from`, using any [OrbitalPropagation] backend.
    pub fn predict_with<P: OrbitalPropagation + ?Sized>(
        &self,
        propagation: &P,
        from: Epoch,
    ) -> Result<PassTrack, Error> {
        let period = self.cfg.sample_period;
        if period <= Duration::ZERO {
            return Err(Error::OutOfRange {
                field: "sample_period",
                value: period.to_seconds(),
            });
        }

        let started = std::time::Instant::now();
        self.interrupted(started)?;

        let horizon = self.cfg.search_horizon;
        let rise = self.rise_search(propagation, from, started)?;

        debug!("rise at {}", rise);

        let mut samples = Vec::<PassSample>::new();
        let mut t = rise;

        loop {
            self.interrupted(started)?;

            let angles = propagation.look_angles(t)?;
            if angles.elevation_deg <= 0.0 {
                break;
            }

            if samples.len() == self.cfg.max_samples {
                return Err(Error::NoPassFound(NoPassCause::SampleLimit(
                    self.cfg.max_samples,
                )));
            }

            samples.push(PassSample {
                epoch: t,
                azimuth_deg: angles.azimuth_deg,
                elevation_deg: angles.elevation_deg,
            });

            t = t + period;
        }

        let track = PassTrack { samples };

        match track.culmination() {
            Some(max) => {
                info!(
                    "pass {} - {} ({} samples), max elevation {:.2}° at {}",
                    rise,
                    t - period,
                    track.len(),
                    max.elevation_deg,
                    max.epoch,
                );
                Ok(track)
            },
            // backend reported a rise it could not confirm
            None => Err(Error::NoPassFound(NoPassCause::SearchHorizon(horizon))),
        }
    }

    /// Scans the search horizon for the next rise, chunk by chunk,
    /// so timeout and cancellation are honored during the search.
    fn rise_search<P: OrbitalPropagation + ?Sized>(
        &self,
        propagation: &P,
        from: Epoch,
        started: std::time::Instant,
    ) -> Result<Epoch, Error> {
        let horizon = self.cfg.search_horizon;
        let step = self.cfg.coarse_step;
        if step <= Duration::ZERO {
            return Err(Error::OutOfRange {
                field: "coarse_step",
                value: step.to_seconds(),
            });
        }

        let chunk = step * RISE_SEARCH_CHUNK_STEPS as f64;
        let end = from + horizon;
        let mut start = from;

        while start < end {
            self.interrupted(started)?;

            let window = if start + chunk > end { end - start } else { chunk };

            if let Some(rise) =
                propagation.next_rise(start, window, step, self.cfg.rise_tolerance)?
            {
                return Ok(rise);
            }

            start = start + window;
        }

        Err(Error::NoPassFound(NoPassCause::SearchHorizon(horizon)))
    }

    fn interrupted(&self, started: std::time::Instant) -> Result<(), Error> {
        if let Some(cancel) = &self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        if let Some(timeout) = self.cfg.timeout {
            if started.elapsed() >= timeout {
                return Err(Error::NoPassFound(NoPassCause::Timeout));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{init_logger, CancellingPropagation, SineProfile};
    use rstest::*;

    #[fixture]
    fn t0() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2018, 4, 4)
    }

    #[fixture]
    fn profile(t0: Epoch) -> SineProfile {
        // visible from +100s to +700s, every 6000s
        SineProfile::new(t0, 100.0, 700.0, 6000.0, 60.0)
    }

    #[rstest]
    fn brackets_the_visible_window(t0: Epoch, profile: SineProfile) {
        init_logger();
        let track = PassPredictor::default().predict_with(&profile, t0).unwrap();

        assert_eq!(track.len(), 600);
        assert!(track.is_evenly_spaced(Duration::from_seconds(1.0)));

        let rise = track.rise().unwrap();
        let set = track.set().unwrap();

        let rise_s = (rise.epoch - t0).to_seconds();
        assert!(rise_s > 100.0 && rise_s < 100.02, "rise at +{}s", rise_s);

        for sample in track.iter() {
            assert!(sample.elevation_deg > 0.0);
            assert!(rise.elevation_deg <= sample.elevation_deg);
            assert!(set.elevation_deg <= sample.elevation_deg);
        }

        let max = track.culmination().unwrap();
        assert!((max.elevation_deg - 60.0).abs() < 0.01);
        assert!(track.duration() < Duration::from_seconds(600.0));
    }

    #[rstest]
    fn already_visible_waits_for_next_pass(t0: Epoch, profile: SineProfile) {
        let from = t0 + Duration::from_seconds(400.0);
        let track = PassPredictor::default().predict_with(&profile, from).unwrap();
        let rise_s = (track.rise().unwrap().epoch - t0).to_seconds();
        assert!(rise_s > 6100.0 && rise_s < 6100.02, "rise at +{}s", rise_s);
    }

    #[rstest]
    fn never_visible(t0: Epoch) {
        let profile = SineProfile::never_visible(t0);
        let cfg = PredictorConfig::default().with_search_horizon(Duration::from_hours(6.0));
        assert_eq!(
            PassPredictor::new(cfg).predict_with(&profile, t0),
            Err(Error::NoPassFound(NoPassCause::SearchHorizon(
                Duration::from_hours(6.0)
            )))
        );
    }

    #[rstest]
    fn horizon_too_short(t0: Epoch, profile: SineProfile) {
        let cfg = PredictorConfig::default().with_search_horizon(Duration::from_seconds(60.0));
        assert!(matches!(
            PassPredictor::new(cfg).predict_with(&profile, t0),
            Err(Error::NoPassFound(NoPassCause::SearchHorizon(_)))
        ));
    }

    #[rstest]
    fn sample_limit(t0: Epoch, profile: SineProfile) {
        let cfg = PredictorConfig::default().with_max_samples(10);
        assert_eq!(
            PassPredictor::new(cfg).predict_with(&profile, t0),
            Err(Error::NoPassFound(NoPassCause::SampleLimit(10)))
        );
    }

    #[rstest]
    fn cancellation(t0: Epoch, profile: SineProfile) {
        let flag = Arc::new(AtomicBool::new(true));
        let predictor = PassPredictor::default().with_cancellation(flag.clone());
        assert_eq!(predictor.predict_with(&profile, t0), Err(Error::Cancelled));

        flag.store(false, Ordering::Relaxed);
        assert!(predictor.predict_with(&profile, t0).is_ok());
    }

    #[rstest]
    fn cancellation_during_rise_search(t0: Epoch) {
        let backend = CancellingPropagation::new(SineProfile::never_visible(t0), 200);
        let predictor = PassPredictor::default().with_cancellation(backend.cancel.clone());

        assert_eq!(predictor.predict_with(&backend, t0), Err(Error::Cancelled));

        // 2 days at 30s: 5760 coarse steps when scanned to the end
        let queries = backend.queries();
        assert!(queries >= 200 && queries < 200 + 2 * RISE_SEARCH_CHUNK_STEPS, "{}", queries);
    }

    #[rstest]
    fn rise_found_across_chunks(t0: Epoch) {
        // first rise well past the first chunk
        let profile = SineProfile::new(t0, 10_000.0, 10_600.0, 20_000.0, 45.0);
        let track = PassPredictor::default().predict_with(&profile, t0).unwrap();
        let rise_s = (track.rise().unwrap().epoch - t0).to_seconds();
        assert!(rise_s > 10_000.0 && rise_s < 10_000.02, "rise at +{}s", rise_s);
    }

    #[rstest]
    fn timeout(t0: Epoch, profile: SineProfile) {
        let cfg = PredictorConfig::default().with_timeout(std::time::Duration::ZERO);
        assert_eq!(
            PassPredictor::new(cfg).predict_with(&profile, t0),
            Err(Error::NoPassFound(NoPassCause::Timeout))
        );
    }

    #[rstest]
    fn invalid_sampling(t0: Epoch, profile: SineProfile) {
        let mut cfg = PredictorConfig::default();
        cfg.sample_period = Duration::ZERO;
        assert!(matches!(
            PassPredictor::new(cfg).predict_with(&profile, t0),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn empty_track() {
        let track = PassTrack::default();
        assert!(track.is_empty());
        assert!(track.culmination().is_none());
        assert_eq!(track.duration(), Duration::ZERO);
        assert!(track.is_evenly_spaced(Duration::from_seconds(1.0)));
    }
}
