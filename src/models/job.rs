use std::path::PathBuf;

/// A single planned training job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// 1-based job number, also the array task id.
    pub index: usize,

    /// Config file written for this job.
    pub config_path: PathBuf,

    /// Output model path prefix handed to the training program.
    pub model_path: PathBuf,

    /// Shell fragment that runs the job.
    pub command: String,
}
