mod assignment;
mod job;
mod value;

pub use assignment::{AssignedValue, Assignment};
pub use job::JobSpec;
pub use value::ParamValue;
