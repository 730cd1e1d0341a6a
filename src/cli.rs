use std::path::PathBuf;

use clap::Parser;

use crate::campaign::Campaign;
use crate::error::Result;
use crate::jobs::PlanPaths;
use crate::space::ParameterSpace;

/// hyper_sweep — sample training configurations and emit a SLURM job array.
#[derive(Parser, Debug)]
#[command(name = "hyper_sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory receiving the config files, job manifest, and array script.
    pub slurm_dir: PathBuf,

    /// Input data directory passed to every training job.
    pub data_dir: PathBuf,

    /// Directory receiving the trained models.
    pub model_dir: PathBuf,

    /// SLURM partition to submit to.
    pub queue: String,

    /// Number of jobs (ignored by grid campaigns).
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub num_jobs: u64,

    /// Built-in campaign to run.
    #[arg(short, long, default_value = "conv-sweep")]
    pub campaign: String,

    /// JSON campaign file; takes precedence over --campaign.
    #[arg(long)]
    pub campaign_file: Option<PathBuf>,

    /// JSON domain table replacing the campaign's own table.
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Seed for the random source. A fresh seed is drawn and logged when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Memory reservation per job, in MB.
    #[arg(long)]
    pub memory: Option<u64>,

    /// Maximum number of array tasks running at once.
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// Job name for the array script.
    #[arg(long)]
    pub job_name: Option<String>,

    /// Directory each job changes into before training.
    #[arg(long)]
    pub run_dir: Option<String>,

    /// Conda environment activated by each job.
    #[arg(long)]
    pub conda_env: Option<String>,

    /// Training program invoked by each job.
    #[arg(long)]
    pub entry_point: Option<String>,

    /// Extra `#SBATCH` line; repeat to add several. Replaces the campaign's extra lines.
    #[arg(long = "sbatch")]
    pub sbatch: Vec<String>,

    /// Also write the resolved campaign as campaign.json in the output directory.
    #[arg(long)]
    pub save_campaign: bool,
}

impl Cli {
    /// Load the selected campaign and apply command-line overrides.
    pub fn resolve_campaign(&self) -> Result<Campaign> {
        let mut campaign = match &self.campaign_file {
            Some(path) => Campaign::load(path)?,
            None => Campaign::builtin(&self.campaign)?,
        };
        if let Some(path) = &self.table {
            campaign.space = ParameterSpace::load(path)?;
        }
        self.apply_overrides(&mut campaign);
        Ok(campaign)
    }

    pub fn apply_overrides(&self, campaign: &mut Campaign) {
        campaign.cluster.queue = self.queue.clone();
        if let Some(memory) = self.memory {
            campaign.cluster.memory = memory;
        }
        if let Some(max_parallel) = self.max_parallel {
            campaign.cluster.max_parallel = max_parallel;
        }
        if let Some(job_name) = &self.job_name {
            campaign.cluster.job_name = job_name.clone();
        }
        if !self.sbatch.is_empty() {
            campaign.cluster.extra_directives = self.sbatch.clone();
        }
        if let Some(run_dir) = &self.run_dir {
            campaign.environment.run_dir = run_dir.clone();
        }
        if let Some(conda_env) = &self.conda_env {
            campaign.environment.conda_env = conda_env.clone();
        }
        if let Some(entry_point) = &self.entry_point {
            campaign.environment.entry_point = entry_point.clone();
        }
    }

    pub fn plan_paths(&self) -> PlanPaths {
        PlanPaths {
            slurm_dir: self.slurm_dir.clone(),
            data_dir: self.data_dir.clone(),
            model_dir: self.model_dir.clone(),
        }
    }
}
