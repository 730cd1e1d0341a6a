pub mod campaign;
pub mod cli;
pub mod error;
pub mod jobs;
pub mod models;
pub mod space;
pub mod sweep;

pub use campaign::Campaign;
pub use error::{Result, SweepError};
pub use models::{AssignedValue, Assignment, JobSpec, ParamValue};
pub use space::{ParameterDomain, ParameterSpace};
