use std::path::PathBuf;

use log::info;
use rand::Rng;

use crate::error::{Result, SweepError};
use crate::jobs::{JobArrayWriter, JobPlanner, PlanPaths, commands, write_manifest};
use crate::models::JobSpec;

use super::Campaign;

/// File name of the job manifest written next to the configs.
pub const MANIFEST_FILE: &str = "jobs.csv";

/// What a campaign run left on disk.
#[derive(Debug)]
pub struct RunSummary {
    pub jobs: Vec<JobSpec>,
    pub manifest_path: PathBuf,
    pub script_path: PathBuf,
}

/// Plan every job of a campaign, then hand the commands to the array writer.
///
/// Validation happens before the first file is written.
pub fn run_campaign<R: Rng + ?Sized>(
    campaign: &Campaign,
    requested: usize,
    paths: &PlanPaths,
    rng: &mut R,
    writer: &dyn JobArrayWriter,
) -> Result<RunSummary> {
    campaign.validate(requested)?;
    if !paths.slurm_dir.is_dir() {
        return Err(SweepError::InvalidInput(format!(
            "output directory {} does not exist",
            paths.slurm_dir.display()
        )));
    }

    info!(
        "campaign '{}': {} jobs",
        campaign.name,
        campaign.job_count(requested)
    );

    let planner = JobPlanner::new(
        &campaign.space,
        campaign.options,
        &campaign.policy,
        &campaign.environment,
    )?;
    let jobs = planner.plan(rng, requested, paths)?;

    let manifest_path = paths.slurm_dir.join(MANIFEST_FILE);
    write_manifest(&jobs, &manifest_path)?;

    let script_path =
        writer.write_array_script(&paths.slurm_dir, &commands(&jobs), &campaign.cluster)?;
    info!("wrote array script {}", script_path.display());

    Ok(RunSummary {
        jobs,
        manifest_path,
        script_path,
    })
}
