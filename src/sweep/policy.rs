use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// One point of a layer-split grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub total_layers: usize,
    pub num_conv: usize,
    pub key_dim: i64,
}

impl GridPoint {
    /// Attention layers fill whatever the convolutional layers leave.
    pub fn num_attention(&self) -> usize {
        self.total_layers.saturating_sub(self.num_conv)
    }

    /// Every split of `total_layers` into `0..total_layers` convolutional layers,
    /// crossed with each key dimension (key dimension outermost).
    pub fn layer_split(total_layers: usize, key_dims: &[i64]) -> Vec<GridPoint> {
        key_dims
            .iter()
            .flat_map(|&key_dim| {
                (0..total_layers).map(move |num_conv| GridPoint {
                    total_layers,
                    num_conv,
                    key_dim,
                })
            })
            .collect()
    }
}

/// How the jobs of one campaign are enumerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EnumerationPolicy {
    /// Draw the requested number of independent assignments.
    Random,
    /// Emit `repeats` independent assignments at every grid point.
    GridRepeats { grid: Vec<GridPoint>, repeats: usize },
}

/// What the assembler is asked to produce for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Free,
    At(GridPoint),
}

impl EnumerationPolicy {
    /// Number of jobs this policy produces for a requested count.
    pub fn job_count(&self, requested: usize) -> usize {
        match self {
            EnumerationPolicy::Random => requested,
            EnumerationPolicy::GridRepeats { grid, repeats } => {
                grid.len().saturating_mul(*repeats)
            }
        }
    }

    /// Whether the requested job count is ignored.
    pub fn fixes_job_count(&self) -> bool {
        matches!(self, EnumerationPolicy::GridRepeats { .. })
    }

    /// The ordered draws for every job, produced lazily.
    pub fn draws(&self, requested: usize) -> impl Iterator<Item = Draw> + '_ {
        (0..self.job_count(requested)).map(move |i| match self {
            EnumerationPolicy::Random => Draw::Free,
            EnumerationPolicy::GridRepeats { grid, repeats } => Draw::At(grid[i / repeats]),
        })
    }

    pub fn validate(&self, requested: usize) -> Result<()> {
        match self {
            EnumerationPolicy::Random => {
                if requested == 0 {
                    return Err(SweepError::InvalidInput(
                        "number of jobs must be positive".to_string(),
                    ));
                }
            }
            EnumerationPolicy::GridRepeats { grid, repeats } => {
                if grid.is_empty() {
                    return Err(SweepError::InvalidInput("grid has no points".to_string()));
                }
                if *repeats == 0 {
                    return Err(SweepError::InvalidInput(
                        "grid repeats must be positive".to_string(),
                    ));
                }
                if let Some(point) = grid.iter().find(|p| p.num_conv > p.total_layers) {
                    return Err(SweepError::InvalidInput(format!(
                        "grid point has {} conv layers but only {} total",
                        point.num_conv, point.total_layers
                    )));
                }
            }
        }
        Ok(())
    }
}
