use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::space::ParameterDomain;

/// An ordered domain table: parameter name to candidate values.
///
/// Declaration order is the order keys are written to config files.
/// The table is read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ParameterDomain>", into = "Vec<ParameterDomain>")]
pub struct ParameterSpace {
    domains: Vec<ParameterDomain>,
}

impl ParameterSpace {
    /// Build a table, rejecting duplicate parameter names.
    pub fn new(domains: Vec<ParameterDomain>) -> Result<Self> {
        let mut seen = HashSet::new();
        for domain in &domains {
            if !seen.insert(domain.name()) {
                return Err(SweepError::InvalidDomain(format!(
                    "parameter '{}' is declared more than once",
                    domain.name()
                )));
            }
        }
        Ok(Self { domains })
    }

    /// Look up the candidate set for a parameter.
    pub fn domain_of(&self, name: &str) -> Option<&ParameterDomain> {
        self.domains.iter().find(|d| d.name() == name)
    }

    /// Look up a parameter that some derivation step cannot do without.
    pub fn require(&self, name: &str, needed_by: &str) -> Result<&ParameterDomain> {
        self.domain_of(name)
            .ok_or_else(|| SweepError::MissingParameter {
                name: name.to_string(),
                needed_by: needed_by.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDomain> {
        self.domains.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.name())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// True when every parameter has exactly one candidate.
    pub fn is_fully_fixed(&self) -> bool {
        self.domains.iter().all(|d| d.is_fixed())
    }

    /// Load a table from a JSON list of `{"name": ..., "values": [...]}` entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let space: ParameterSpace = serde_json::from_str(&content)?;
        Ok(space)
    }
}

impl TryFrom<Vec<ParameterDomain>> for ParameterSpace {
    type Error = SweepError;

    fn try_from(domains: Vec<ParameterDomain>) -> Result<Self> {
        ParameterSpace::new(domains)
    }
}

impl From<ParameterSpace> for Vec<ParameterDomain> {
    fn from(space: ParameterSpace) -> Self {
        space.domains
    }
}
