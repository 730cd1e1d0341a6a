//! Campaigns: a domain table plus the policy and settings used to run it.

mod builtin;
mod run;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{Result, SweepError};
use crate::jobs::{ClusterSettings, JobEnvironment};
use crate::space::ParameterSpace;
use crate::sweep::{AssemblerOptions, ConfigAssembler, EnumerationPolicy};

pub use builtin::{
    BUILTIN_CAMPAIGNS, GRID_KEY_DIMS, GRID_REPEATS, TRANSFORMER_LAYERS, conv_sweep,
    transformer_grid, transformer_sweep,
};
pub use run::{MANIFEST_FILE, RunSummary, run_campaign};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub space: ParameterSpace,

    #[serde(default = "default_policy")]
    pub policy: EnumerationPolicy,

    #[serde(default)]
    pub options: AssemblerOptions,

    #[serde(default)]
    pub cluster: ClusterSettings,

    #[serde(default)]
    pub environment: JobEnvironment,
}

fn default_policy() -> EnumerationPolicy {
    EnumerationPolicy::Random
}

impl Campaign {
    /// Look up a built-in campaign by name (case-insensitive).
    pub fn builtin(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "conv-sweep" => conv_sweep(),
            "transformer-sweep" => transformer_sweep(),
            "transformer-grid" => transformer_grid(),
            _ => Err(SweepError::UnknownCampaign {
                name: name.to_string(),
                suggestion: suggest(name),
            }),
        }
    }

    /// Load a campaign from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let campaign: Campaign = serde_json::from_str(&content)?;
        Ok(campaign)
    }

    /// Save a campaign as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check the table against the policy and options without sampling anything.
    pub fn validate(&self, requested: usize) -> Result<()> {
        self.policy.validate(requested)?;
        ConfigAssembler::new(&self.space, self.options).validate(&self.policy)
    }

    /// Number of jobs this campaign produces for a requested count.
    pub fn job_count(&self, requested: usize) -> usize {
        self.policy.job_count(requested)
    }
}

/// Closest built-in campaign name, if any is similar enough.
fn suggest(name: &str) -> Option<String> {
    let input = name.to_lowercase();
    BUILTIN_CAMPAIGNS
        .iter()
        .map(|&candidate| (candidate, jaro_winkler(candidate, &input)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate.to_string())
}
