use crate::cli::ContactsArgs;
use crate::config::{ContactsConfig, build_contacts_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use mdflare::{
    core::io::{pdb::PdbFile, traits::TrajectoryFile},
    engine::progress::ProgressReporter,
    workflows,
};
use std::time::Instant;
use tracing::{info, warn};

pub fn run(args: ContactsArgs) -> Result<()> {
    let config = build_contacts_config(&args)?;
    execute(&config, ProgressReporter::with_callback(CliProgressHandler::new().get_callback()))
}

fn execute(config: &ContactsConfig, reporter: ProgressReporter) -> Result<()> {
    let started = Instant::now();

    info!(
        "Loading topology {:?} and trajectory {:?}",
        &config.topology, &config.trajectory
    );
    let trajectory = PdbFile::read_trajectory_from_paths(&config.topology, &config.trajectory)
        .map_err(|e| CliError::FileParsing {
            path: config.trajectory.clone(),
            source: e.into(),
        })?;
    info!(
        atoms = trajectory.atom_count(),
        frames = trajectory.frame_count(),
        "Trajectory loaded."
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|source| CliError::Output {
        path: config.output_dir.clone(),
        source,
    })?;

    let interaction_tags: Vec<_> = config.detection.detectors.iter().map(|k| k.tag()).collect();
    println!(
        "Computing contacts ({}) on {} worker(s)...",
        interaction_tags.join(", "),
        config.detection.workers
    );

    let result = workflows::detect::run(&trajectory, &config.detection, &reporter)?;

    let failed = result.failed_frames();
    if !failed.is_empty() {
        warn!(frames = ?failed, "Some frames failed and were left out of the output.");
    }

    let output_path = config.output_path();
    result
        .write_to_path(&output_path)
        .map_err(|source| CliError::Output {
            path: output_path.clone(),
            source,
        })?;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        records = result.record_count(),
        seconds = elapsed,
        "Contacts written to {:?}",
        &output_path
    );
    println!(
        "✓ {} contact(s) written to: {}",
        result.record_count(),
        output_path.display()
    );
    println!("Computation time: {:.2} seconds", elapsed);
    Ok(())
}
