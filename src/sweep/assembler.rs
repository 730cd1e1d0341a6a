use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::models::{AssignedValue, Assignment, ParamValue};
use crate::space::names::*;
use crate::space::{ParameterDomain, ParameterSpace};
use crate::sweep::policy::{Draw, EnumerationPolicy, GridPoint};
use crate::sweep::sampler::{sample, sample_many};

/// How the convolutional and attention layer counts are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum LayerCounts {
    /// Sample `NumConvLayers` and `NumAttentionLayers` independently.
    #[default]
    Independent,
    /// Sample `NumConvLayers`; attention layers make up the rest of `total`.
    FixedTotal { total: usize },
}

/// How attention heads and key dimensions are drawn across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttentionSampling {
    /// Fresh draw for every attention layer.
    #[default]
    PerLayer,
    /// One draw per job, repeated for every attention layer.
    PerJob,
}

/// How the per-layer convolutional lists are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConvLists {
    /// Kernel size and count drawn per layer; layer 0 uses the first-layer count domain.
    #[default]
    Sampled,
    /// Layer `i` takes element `i` of the `KernelSizes` and `NumKernels` domains.
    Schedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerOptions {
    pub layer_counts: LayerCounts,
    pub attention: AttentionSampling,
    pub conv_lists: ConvLists,
}

/// Per-job layer counts once the grid or the sampled scalars are resolved.
#[derive(Debug, Clone, Copy)]
struct Layers {
    conv: usize,
    attention: usize,
    dense: usize,
}

/// Builds one job's [`Assignment`] from a domain table.
pub struct ConfigAssembler<'a> {
    space: &'a ParameterSpace,
    options: AssemblerOptions,
}

impl<'a> ConfigAssembler<'a> {
    pub fn new(space: &'a ParameterSpace, options: AssemblerOptions) -> Self {
        Self { space, options }
    }

    /// Check that the table supports every draw the policy will request.
    ///
    /// Run this before any job is planned: a table that passes never fails
    /// during assembly.
    pub fn validate(&self, policy: &EnumerationPolicy) -> Result<()> {
        let space = self.space;
        space.require(KERNEL_SIZES, "convolutional layers")?;
        space.require(ATTENTION_HEADS, "attention layers")?;
        space.require(NUM_DENSE, "dense layers")?.counts()?;
        space.require(DENSE_SIZES, "dense layers")?;

        let max_conv = match policy {
            EnumerationPolicy::Random => {
                space.require(ATTENTION_KEY_DIM, "attention layers")?;
                let conv = space
                    .require(NUM_CONV_LAYERS, "convolutional layers")?
                    .counts()?;
                match self.options.layer_counts {
                    LayerCounts::Independent => {
                        space
                            .require(NUM_ATTENTION_LAYERS, "attention layers")?
                            .counts()?;
                    }
                    LayerCounts::FixedTotal { total } => {
                        if let Some(n) = conv.iter().find(|&&n| n > total) {
                            return Err(SweepError::InvalidDomain(format!(
                                "{} candidate {} exceeds the fixed total of {} layers",
                                NUM_CONV_LAYERS, n, total
                            )));
                        }
                    }
                }
                conv.into_iter().max().unwrap_or(0)
            }
            EnumerationPolicy::GridRepeats { grid, .. } => {
                grid.iter().map(|p| p.num_conv).max().unwrap_or(0)
            }
        };

        match self.options.conv_lists {
            ConvLists::Sampled => {
                space.require(NUM_KERNELS_FIRST_LAYER, "the first convolutional layer")?;
                space.require(NUM_KERNELS_LATER_LAYERS, "later convolutional layers")?;
            }
            ConvLists::Schedule => {
                for name in [KERNEL_SIZES, NUM_KERNELS] {
                    let domain = space.require(name, "the convolutional layer schedule")?;
                    if domain.len() < max_conv {
                        return Err(SweepError::InvalidDomain(format!(
                            "{} schedule has {} entries but up to {} conv layers are requested",
                            name,
                            domain.len(),
                            max_conv
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Sample a complete assignment with layer counts drawn from the table.
    pub fn assemble<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Assignment> {
        self.assemble_draw(rng, Draw::Free)
    }

    /// Sample a complete assignment with layer counts and key dimension fixed by a grid point.
    pub fn assemble_at<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        point: &GridPoint,
    ) -> Result<Assignment> {
        self.assemble_draw(rng, Draw::At(*point))
    }

    pub fn assemble_draw<R: Rng + ?Sized>(&self, rng: &mut R, draw: Draw) -> Result<Assignment> {
        let mut assignment = Assignment::with_capacity(self.space.len());
        for domain in self.space.iter() {
            assignment.set(
                domain.name(),
                AssignedValue::Scalar(sample(rng, domain).clone()),
            );
        }

        let layers = self.resolve_layers(&assignment, draw)?;
        debug!(
            "layers: conv={} attention={} dense={}",
            layers.conv, layers.attention, layers.dense
        );

        let (kernel_sizes, num_kernels) = self.conv_lists(rng, layers.conv)?;
        let (heads, key_dims) = self.attention_lists(rng, layers.attention, draw)?;
        let dense_sizes = sample_many(
            rng,
            self.space.require(DENSE_SIZES, "dense layers")?,
            layers.dense,
        );

        assignment.set(NUM_CONV_LAYERS, AssignedValue::Scalar(layers.conv.into()));
        assignment.set(
            NUM_ATTENTION_LAYERS,
            AssignedValue::Scalar(layers.attention.into()),
        );
        assignment.set(KERNEL_SIZES, AssignedValue::layer_list(kernel_sizes));
        assignment.set(NUM_KERNELS, AssignedValue::layer_list(num_kernels));
        assignment.set(ATTENTION_HEADS, AssignedValue::layer_list(heads));
        assignment.set(ATTENTION_KEY_DIM, AssignedValue::layer_list(key_dims));
        assignment.set(DENSE_SIZES, AssignedValue::layer_list(dense_sizes));

        Ok(assignment)
    }

    fn resolve_layers(&self, assignment: &Assignment, draw: Draw) -> Result<Layers> {
        let dense = sampled_count(assignment, NUM_DENSE)?;
        let (conv, attention) = match draw {
            Draw::At(point) => (point.num_conv, point.num_attention()),
            Draw::Free => {
                let conv = sampled_count(assignment, NUM_CONV_LAYERS)?;
                let attention = match self.options.layer_counts {
                    LayerCounts::Independent => sampled_count(assignment, NUM_ATTENTION_LAYERS)?,
                    LayerCounts::FixedTotal { total } => {
                        total.checked_sub(conv).ok_or_else(|| {
                            SweepError::InvalidDomain(format!(
                                "{} conv layers exceed the fixed total of {}",
                                conv, total
                            ))
                        })?
                    }
                };
                (conv, attention)
            }
        };
        Ok(Layers {
            conv,
            attention,
            dense,
        })
    }

    fn conv_lists<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_conv: usize,
    ) -> Result<(Vec<ParamValue>, Vec<ParamValue>)> {
        let sizes = self.space.require(KERNEL_SIZES, "convolutional layers")?;
        match self.options.conv_lists {
            ConvLists::Sampled => {
                let first = self
                    .space
                    .require(NUM_KERNELS_FIRST_LAYER, "the first convolutional layer")?;
                let later = self
                    .space
                    .require(NUM_KERNELS_LATER_LAYERS, "later convolutional layers")?;

                let mut kernel_sizes = Vec::with_capacity(num_conv);
                let mut num_kernels = Vec::with_capacity(num_conv);
                for i in 0..num_conv {
                    kernel_sizes.push(sample(rng, sizes).clone());
                    let counts = if i == 0 { first } else { later };
                    num_kernels.push(sample(rng, counts).clone());
                }
                Ok((kernel_sizes, num_kernels))
            }
            ConvLists::Schedule => {
                let counts = self
                    .space
                    .require(NUM_KERNELS, "the convolutional layer schedule")?;
                Ok((schedule_prefix(sizes, num_conv)?, schedule_prefix(counts, num_conv)?))
            }
        }
    }

    fn attention_lists<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_attention: usize,
        draw: Draw,
    ) -> Result<(Vec<ParamValue>, Vec<ParamValue>)> {
        if num_attention == 0 {
            return Ok((Vec::new(), Vec::new()));
        }
        let heads = self.space.require(ATTENTION_HEADS, "attention layers")?;

        if let Draw::At(point) = draw {
            let head = match self.options.attention {
                AttentionSampling::PerLayer => sample_many(rng, heads, num_attention),
                AttentionSampling::PerJob => vec![sample(rng, heads).clone(); num_attention],
            };
            return Ok((head, vec![ParamValue::Int(point.key_dim); num_attention]));
        }

        let key_dims = self.space.require(ATTENTION_KEY_DIM, "attention layers")?;
        match self.options.attention {
            AttentionSampling::PerLayer => {
                let mut head_list = Vec::with_capacity(num_attention);
                let mut key_list = Vec::with_capacity(num_attention);
                for _ in 0..num_attention {
                    head_list.push(sample(rng, heads).clone());
                    key_list.push(sample(rng, key_dims).clone());
                }
                Ok((head_list, key_list))
            }
            AttentionSampling::PerJob => {
                let head = sample(rng, heads).clone();
                let key_dim = sample(rng, key_dims).clone();
                Ok((vec![head; num_attention], vec![key_dim; num_attention]))
            }
        }
    }
}

fn sampled_count(assignment: &Assignment, name: &str) -> Result<usize> {
    assignment
        .get(name)
        .and_then(AssignedValue::as_scalar)
        .and_then(ParamValue::as_count)
        .ok_or_else(|| {
            SweepError::InvalidDomain(format!("{} must be a non-negative integer count", name))
        })
}

fn schedule_prefix(domain: &ParameterDomain, n: usize) -> Result<Vec<ParamValue>> {
    domain
        .values()
        .get(..n)
        .map(<[ParamValue]>::to_vec)
        .ok_or_else(|| {
            SweepError::InvalidDomain(format!(
                "{} schedule is shorter than {} layers",
                domain.name(),
                n
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ints(name: &str, values: &[i64]) -> ParameterDomain {
        ParameterDomain::new(name, values.iter().map(|&v| v.into()).collect()).unwrap()
    }

    fn small_space(num_conv: &[i64], num_attn: &[i64], num_dense: &[i64]) -> ParameterSpace {
        ParameterSpace::new(vec![
            ints(ATTENTION_HEADS, &[4, 8]),
            ints(ATTENTION_KEY_DIM, &[5, 10, 20]),
            ints("BatchSize", &[128]),
            ints(DENSE_SIZES, &[20, 50]),
            ints(KERNEL_SIZES, &[8, 16, 32]),
            ints(NUM_ATTENTION_LAYERS, num_attn),
            ints(NUM_CONV_LAYERS, num_conv),
            ints(NUM_DENSE, num_dense),
            ints(NUM_KERNELS_FIRST_LAYER, &[1024]),
            ints(NUM_KERNELS_LATER_LAYERS, &[512, 256, 128, 64, 32]),
            ints(NUM_KERNELS, &[0]),
        ])
        .unwrap()
    }

    fn list_len(assignment: &Assignment, name: &str) -> usize {
        assignment.get(name).unwrap().to_string().split(',').count()
    }

    #[test]
    fn test_list_lengths_follow_counts() {
        let space = small_space(&[0, 1, 3, 5], &[0, 1, 2], &[0, 1, 2]);
        let assembler = ConfigAssembler::new(&space, AssemblerOptions::default());
        assembler.validate(&EnumerationPolicy::Random).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let a = assembler.assemble(&mut rng).unwrap();
            let conv = sampled_count(&a, NUM_CONV_LAYERS).unwrap();
            let attn = sampled_count(&a, NUM_ATTENTION_LAYERS).unwrap();
            let dense = sampled_count(&a, NUM_DENSE).unwrap();

            assert_eq!(list_len(&a, KERNEL_SIZES), conv.max(1));
            assert_eq!(list_len(&a, NUM_KERNELS), conv.max(1));
            assert_eq!(list_len(&a, ATTENTION_HEADS), attn.max(1));
            assert_eq!(list_len(&a, ATTENTION_KEY_DIM), attn.max(1));
            assert_eq!(list_len(&a, DENSE_SIZES), dense.max(1));
        }
    }

    #[test]
    fn test_zero_counts_give_sentinels() {
        let space = small_space(&[0], &[0], &[0]);
        let assembler = ConfigAssembler::new(&space, AssemblerOptions::default());
        let a = assembler.assemble(&mut StdRng::seed_from_u64(1)).unwrap();

        for name in [KERNEL_SIZES, NUM_KERNELS, ATTENTION_HEADS, ATTENTION_KEY_DIM, DENSE_SIZES] {
            assert_eq!(a.get(name).unwrap().to_string(), "0", "{}", name);
        }
    }

    #[test]
    fn test_first_layer_uses_first_layer_domain() {
        let space = small_space(&[3], &[0], &[0]);
        let assembler = ConfigAssembler::new(&space, AssemblerOptions::default());
        let mut rng = StdRng::seed_from_u64(5);
        let later = ["512", "256", "128", "64", "32"];

        for _ in 0..100 {
            let a = assembler.assemble(&mut rng).unwrap();
            let kernels = a.get(NUM_KERNELS).unwrap().to_string();
            let parts: Vec<&str> = kernels.split(',').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "1024");
            assert!(parts[1..].iter().all(|p| later.contains(p)));
        }
    }

    #[test]
    fn test_fixed_total_splits_layers() {
        let space = small_space(&[2, 4, 6], &[0], &[0]);
        let options = AssemblerOptions {
            layer_counts: LayerCounts::FixedTotal { total: 6 },
            ..Default::default()
        };
        let assembler = ConfigAssembler::new(&space, options);
        assembler.validate(&EnumerationPolicy::Random).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let a = assembler.assemble(&mut rng).unwrap();
            let conv = sampled_count(&a, NUM_CONV_LAYERS).unwrap();
            let attn = sampled_count(&a, NUM_ATTENTION_LAYERS).unwrap();
            assert_eq!(conv + attn, 6);
        }
    }

    #[test]
    fn test_fixed_total_rejects_oversized_conv_candidates() {
        let space = small_space(&[2, 8], &[0], &[0]);
        let options = AssemblerOptions {
            layer_counts: LayerCounts::FixedTotal { total: 6 },
            ..Default::default()
        };
        let assembler = ConfigAssembler::new(&space, options);
        assert!(assembler.validate(&EnumerationPolicy::Random).is_err());
    }

    #[test]
    fn test_per_job_attention_repeats_one_draw() {
        let space = small_space(&[0], &[4], &[0]);
        let options = AssemblerOptions {
            attention: AttentionSampling::PerJob,
            ..Default::default()
        };
        let assembler = ConfigAssembler::new(&space, options);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let a = assembler.assemble(&mut rng).unwrap();
            let keys = a.get(ATTENTION_KEY_DIM).unwrap().to_string();
            let parts: Vec<&str> = keys.split(',').collect();
            assert_eq!(parts.len(), 4);
            assert!(parts.iter().all(|p| *p == parts[0]));
        }
    }

    #[test]
    fn test_schedule_takes_layer_prefix() {
        let space = ParameterSpace::new(vec![
            ints(NUM_KERNELS, &[1024, 512, 256, 128]),
            ints(KERNEL_SIZES, &[8, 16, 32, 64]),
            ints(ATTENTION_HEADS, &[8]),
            ints(DENSE_SIZES, &[0]),
            ints(NUM_DENSE, &[0]),
        ])
        .unwrap();
        let options = AssemblerOptions {
            conv_lists: ConvLists::Schedule,
            attention: AttentionSampling::PerJob,
            ..Default::default()
        };
        let policy = EnumerationPolicy::GridRepeats {
            grid: GridPoint::layer_split(4, &[20]),
            repeats: 1,
        };
        let assembler = ConfigAssembler::new(&space, options);
        assembler.validate(&policy).unwrap();

        let point = GridPoint { total_layers: 4, num_conv: 3, key_dim: 20 };
        let a = assembler
            .assemble_at(&mut StdRng::seed_from_u64(0), &point)
            .unwrap();
        assert_eq!(a.get(NUM_KERNELS).unwrap().to_string(), "1024,512,256");
        assert_eq!(a.get(KERNEL_SIZES).unwrap().to_string(), "8,16,32");
        assert_eq!(a.get(ATTENTION_HEADS).unwrap().to_string(), "8");
        assert_eq!(a.get(ATTENTION_KEY_DIM).unwrap().to_string(), "20");
    }

    #[test]
    fn test_schedule_too_short_rejected() {
        let space = ParameterSpace::new(vec![
            ints(NUM_KERNELS, &[1024, 512]),
            ints(KERNEL_SIZES, &[8, 16]),
            ints(ATTENTION_HEADS, &[8]),
            ints(DENSE_SIZES, &[0]),
            ints(NUM_DENSE, &[0]),
        ])
        .unwrap();
        let options = AssemblerOptions {
            conv_lists: ConvLists::Schedule,
            ..Default::default()
        };
        let policy = EnumerationPolicy::GridRepeats {
            grid: GridPoint::layer_split(4, &[20]),
            repeats: 1,
        };
        let assembler = ConfigAssembler::new(&space, options);
        assert!(assembler.validate(&policy).is_err());
    }

    #[test]
    fn test_missing_domain_rejected_before_sampling() {
        let space = ParameterSpace::new(vec![ints(NUM_CONV_LAYERS, &[1])]).unwrap();
        let assembler = ConfigAssembler::new(&space, AssemblerOptions::default());
        let err = assembler.validate(&EnumerationPolicy::Random).unwrap_err();
        assert!(matches!(err, SweepError::MissingParameter { .. }));
    }

    #[test]
    fn test_internal_keys_stay_in_assignment() {
        let space = small_space(&[1], &[0], &[0]);
        let assembler = ConfigAssembler::new(&space, AssemblerOptions::default());
        let a = assembler.assemble(&mut StdRng::seed_from_u64(2)).unwrap();
        assert!(a.get(NUM_KERNELS_FIRST_LAYER).is_some());
        assert!(a.get(NUM_KERNELS_LATER_LAYERS).is_some());
    }
}
