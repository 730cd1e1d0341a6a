use std::path::PathBuf;

use log::{debug, info, warn};
use rand::Rng;

use crate::error::Result;
use crate::jobs::JobEnvironment;
use crate::models::JobSpec;
use crate::space::ParameterSpace;
use crate::sweep::{AssemblerOptions, ConfigAssembler, EnumerationPolicy, write_config};

/// Directories a plan reads from and writes to.
#[derive(Debug, Clone)]
pub struct PlanPaths {
    /// Receives `{n}.config` files and the array script.
    pub slurm_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Prefix directory for `model{n}` outputs.
    pub model_dir: PathBuf,
}

impl PlanPaths {
    pub fn config_path(&self, index: usize) -> PathBuf {
        self.slurm_dir.join(format!("{}.config", index))
    }

    pub fn model_path(&self, index: usize) -> PathBuf {
        self.model_dir.join(format!("model{}", index))
    }
}

/// Turns a campaign into config files and one shell command per job.
pub struct JobPlanner<'a> {
    assembler: ConfigAssembler<'a>,
    policy: &'a EnumerationPolicy,
    environment: &'a JobEnvironment,
}

impl<'a> JobPlanner<'a> {
    /// Build a planner, validating the table against the policy up front.
    pub fn new(
        space: &'a ParameterSpace,
        options: AssemblerOptions,
        policy: &'a EnumerationPolicy,
        environment: &'a JobEnvironment,
    ) -> Result<Self> {
        let assembler = ConfigAssembler::new(space, options);
        assembler.validate(policy)?;

        if matches!(policy, EnumerationPolicy::Random) && space.is_fully_fixed() {
            warn!("every parameter has a single candidate; all jobs will be identical");
        }

        Ok(Self {
            assembler,
            policy,
            environment,
        })
    }

    /// Plan every job, writing `{n}.config` for each as it goes.
    ///
    /// Jobs are numbered from 1. A config write failure aborts the plan
    /// before the matching command is produced.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        requested: usize,
        paths: &PlanPaths,
    ) -> Result<Vec<JobSpec>> {
        self.policy.validate(requested)?;
        if self.policy.fixes_job_count() && requested != self.policy.job_count(requested) {
            warn!(
                "grid policy fixes the job count at {}; ignoring requested {}",
                self.policy.job_count(requested),
                requested
            );
        }

        info!(
            "planning {} jobs into {}",
            self.policy.job_count(requested),
            paths.slurm_dir.display()
        );

        let mut jobs = Vec::new();
        for (i, draw) in self.policy.draws(requested).enumerate() {
            let index = i + 1;
            let assignment = self.assembler.assemble_draw(rng, draw)?;
            let config_path = paths.config_path(index);
            write_config(&config_path, &assignment)?;

            let model_path = paths.model_path(index);
            let command = self
                .environment
                .command(&config_path, &paths.data_dir, &model_path);
            debug!("job {}: wrote {}", index, config_path.display());

            jobs.push(JobSpec {
                index,
                config_path,
                model_path,
                command,
            });
        }
        Ok(jobs)
    }
}

/// Commands in job order, as handed to the array writer.
pub fn commands(jobs: &[JobSpec]) -> Vec<String> {
    jobs.iter().map(|j| j.command.clone()).collect()
}
