use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::models::ParamValue;
use crate::sweep::serializer::SEPARATOR;

/// Characters that would split one config line into several.
const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// Joins per-layer list elements in a config value.
const LIST_DELIMITER: char = ',';

/// The finite, ordered candidate set of one parameter.
///
/// Construction rejects empty candidate sets, so every domain can be sampled,
/// and any name or token that would not survive the `key = value` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain")]
pub struct ParameterDomain {
    name: String,
    values: Vec<ParamValue>,
}

#[derive(Deserialize)]
struct RawDomain {
    name: String,
    values: Vec<ParamValue>,
}

impl TryFrom<RawDomain> for ParameterDomain {
    type Error = SweepError;

    fn try_from(raw: RawDomain) -> Result<Self> {
        ParameterDomain::new(raw.name, raw.values)
    }
}

impl ParameterDomain {
    pub fn new(name: impl Into<String>, values: Vec<ParamValue>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SweepError::InvalidDomain(
                "parameter name must not be empty".to_string(),
            ));
        }
        if name.contains(SEPARATOR) || name.contains(LINE_BREAKS) {
            return Err(SweepError::InvalidDomain(format!(
                "parameter name {:?} contains '{}' or a line break",
                name,
                SEPARATOR.trim()
            )));
        }
        if values.is_empty() {
            return Err(SweepError::EmptyDomain(name));
        }
        if let Some(token) = values.iter().find_map(|v| match v {
            ParamValue::Token(t) if t.contains(LIST_DELIMITER) || t.contains(LINE_BREAKS) => {
                Some(t)
            }
            _ => None,
        }) {
            return Err(SweepError::InvalidDomain(format!(
                "{} candidate {:?} contains '{}' or a line break",
                name, token, LIST_DELIMITER
            )));
        }
        Ok(Self { name, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    /// Number of candidates (always at least 1).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A domain with a single candidate is effectively fixed.
    pub fn is_fixed(&self) -> bool {
        self.values.len() == 1
    }

    /// Interpret every candidate as a layer count.
    pub fn counts(&self) -> Result<Vec<usize>> {
        self.values
            .iter()
            .map(|v| {
                v.as_count().ok_or_else(|| {
                    SweepError::InvalidDomain(format!(
                        "{} must hold non-negative integer counts, found '{}'",
                        self.name, v
                    ))
                })
            })
            .collect()
    }
}
