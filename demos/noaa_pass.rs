// NOAA weather satellite demo: reference link budget, next pass over Blacksburg (VA)
// and link budget evaluated along that pass.
use env_logger::{Builder, Target};
use log::{error, info};

use sat_link::prelude::{
    dbm_to_string, Config, ElementCatalog, Error, LinkBudgetCalculator, PassPredictor,
    ReferenceCase, Unit,
};

const NOAA_19: &str = "NOAA 19
1 33591U 09005A   18094.54237829  .00000049  00000-0  51466-4 0  9996
2 33591  99.1393  68.6432 0014138 219.6316 140.3833 14.12313656470073
";

fn run() -> Result<(), Error> {
    let cfg = Config::blacksburg_preset();
    let noaa = ReferenceCase::noaa_weather_satellite();

    // Reference budget, at fixed elevation
    let mut calc = LinkBudgetCalculator::with_inputs(cfg.budget, noaa.inputs)?;
    let outputs = *calc.run()?;

    info!("{}: {}", noaa, noaa.description);
    info!(
        "link distance: {:.1} km",
        outputs.link_distance.value_in(Unit::Kilometer)?
    );
    info!("EIRP: {}", dbm_to_string(outputs.transmit_eirp));
    info!("path loss: {:.2} dB", outputs.downlink_path_loss);
    info!("received: {}", dbm_to_string(outputs.received_power));
    info!("MDS: {}", dbm_to_string(outputs.minimum_detectable_signal));
    info!("Eb/N0: {:.2} dB", outputs.energy_noise_ratio);
    info!("margin: {:.2} dB", outputs.link_margin);

    let failures = noaa.check(&outputs);
    if !failures.is_empty() {
        error!("out of tolerance: {:?}", failures);
    }

    // Next pass
    let catalog = ElementCatalog::parse(NOAA_19)?;
    let elements = catalog
        .by_catalog_number(33591)
        .ok_or_else(|| Error::InvalidElements("NOAA 19 not found".to_string()))?;

    let predictor = PassPredictor::new(cfg.predictor);
    let track = predictor.predict_next_pass(elements, elements.epoch()?, &cfg.observer)?;

    if let (Some(rise), Some(set)) = (track.rise(), track.set()) {
        info!(
            "{} rises at {} (azimuth {:.1}°), sets at {} (azimuth {:.1}°)",
            elements.name(), rise.epoch, rise.azimuth_deg, set.epoch, set.azimuth_deg
        );
    }

    // Budget along the pass
    let budget = calc.pass_budget(&track)?;

    for sample in budget.samples.iter().step_by(60) {
        info!(
            "{} elev={:.1}° range={:.0} km rx={} margin={:.2} dB",
            sample.epoch,
            sample.elevation_deg,
            sample.link_distance_km,
            dbm_to_string(sample.received_power_dbm),
            sample.link_margin_db
        );
    }

    if let Some(worst) = budget.worst_margin() {
        info!(
            "worst margin {:.2} dB at {:.1}° elevation",
            worst.link_margin_db, worst.elevation_deg
        );
    }

    info!(
        "link closes over the whole pass: {}",
        if budget.closes() { "yes" } else { "no" }
    );

    Ok(())
}

pub fn main() {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
