mod domain;
pub mod names;
mod table;

pub use domain::ParameterDomain;
pub use names::{INTERNAL_KEYS, is_internal};
pub use table::ParameterSpace;
