use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default repository checkout that jobs run from.
pub const DEFAULT_RUN_DIR: &str = "/hpc/group/igvf/hyper/git";

/// Default conda environment activated by every job.
pub const DEFAULT_CONDA_ENV: &str = "/hpc/home/bmajoros/lab/conda/TF4";

/// Default training entry point.
pub const DEFAULT_ENTRY_POINT: &str = "/hpc/group/igvf/hyper/git/BlueSTARR-Transformer.py";

/// Host-side settings baked into every generated job command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEnvironment {
    pub run_dir: String,
    pub conda_env: String,
    pub entry_point: String,
}

impl Default for JobEnvironment {
    fn default() -> Self {
        Self {
            run_dir: DEFAULT_RUN_DIR.to_string(),
            conda_env: DEFAULT_CONDA_ENV.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

impl JobEnvironment {
    /// Shell fragment for one job: setup, diagnostics, then the training call.
    pub fn command(&self, config_path: &Path, data_dir: &Path, model_path: &Path) -> String {
        format!(
            "cd {run_dir}\n\
             source ~/.bashrc\n\
             conda activate {env}\n\
             hostname\n\
             echo $SLURMD_NODENAME\n\
             nvidia-smi\n\
             {entry} {config} {data} {model}\n",
            run_dir = self.run_dir,
            env = self.conda_env,
            entry = self.entry_point,
            config = config_path.display(),
            data = data_dir.display(),
            model = model_path.display(),
        )
    }
}
