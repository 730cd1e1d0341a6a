mod command;
mod manifest;
mod planner;
mod slurm;

pub use command::{DEFAULT_CONDA_ENV, DEFAULT_ENTRY_POINT, DEFAULT_RUN_DIR, JobEnvironment};
pub use manifest::write_manifest;
pub use planner::{JobPlanner, PlanPaths, commands};
pub use slurm::{ClusterSettings, JobArrayWriter, SlurmArrayWriter};
