use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hyper_sweep_rs::campaign::run_campaign;
use hyper_sweep_rs::cli::Cli;
use hyper_sweep_rs::error::{Result, SweepError};
use hyper_sweep_rs::jobs::SlurmArrayWriter;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let campaign = cli.resolve_campaign()?;

    let requested = usize::try_from(cli.num_jobs)
        .map_err(|_| SweepError::InvalidInput(format!("too many jobs: {}", cli.num_jobs)))?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("random seed {} (pass --seed {} to reproduce)", seed, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let summary = run_campaign(
        &campaign,
        requested,
        &cli.plan_paths(),
        &mut rng,
        &SlurmArrayWriter,
    )?;

    if cli.save_campaign {
        let path = cli.slurm_dir.join("campaign.json");
        campaign.save(&path)?;
        println!("Saved campaign to {}", path.display());
    }

    println!(
        "Wrote {} configs to {}",
        summary.jobs.len(),
        cli.slurm_dir.display()
    );
    println!("Job manifest: {}", summary.manifest_path.display());
    println!("Array script: {}", summary.script_path.display());

    Ok(())
}
