use crate::error::Result;
use crate::jobs::{ClusterSettings, JobEnvironment};
use crate::models::ParamValue;
use crate::space::{ParameterDomain, ParameterSpace};
use crate::sweep::{
    AssemblerOptions, AttentionSampling, ConvLists, EnumerationPolicy, GridPoint, LayerCounts,
};

use super::Campaign;

/// Names of the built-in campaigns, in listing order.
pub const BUILTIN_CAMPAIGNS: [&str; 3] = ["conv-sweep", "transformer-sweep", "transformer-grid"];

/// Total layers shared by the transformer campaigns.
pub const TRANSFORMER_LAYERS: usize = 10;

/// Independent repeats at every grid point.
pub const GRID_REPEATS: usize = 10;

/// Key dimensions crossed with every layer split in the grid campaign.
pub const GRID_KEY_DIMS: [i64; 4] = [5, 10, 20, 30];

const TF5_ENV: &str = "/hpc/home/bmajoros/lab/conda/TF5";

fn ints(name: &str, values: &[i64]) -> Result<ParameterDomain> {
    ParameterDomain::new(name, values.iter().map(|&v| ParamValue::Int(v)).collect())
}

fn floats(name: &str, values: &[f64]) -> Result<ParameterDomain> {
    ParameterDomain::new(name, values.iter().map(|&v| ParamValue::Float(v)).collect())
}

fn tokens(name: &str, values: &[&str]) -> Result<ParameterDomain> {
    ParameterDomain::new(name, values.iter().map(|&v| ParamValue::from(v)).collect())
}

/// Deep convolutional stacks, no attention or dense layers.
pub fn conv_sweep() -> Result<Campaign> {
    let space = ParameterSpace::new(vec![
        ints("AttentionHeads", &[0])?,
        ints("AttentionKeyDim", &[0])?,
        ints("AttentionResidualSkip", &[0])?,
        ints("BatchSize", &[128])?,
        ints("ConvDropout", &[0, 1])?,
        tokens("ConvPad", &["same"])?,
        ints("ConvPoolSize", &[1])?,
        ints("ConvResidualSkip", &[0])?,
        ints("DenseSizes", &[0])?,
        ints("DilationFactor", &[1])?,
        floats("DropoutRate", &[0.5])?,
        ints("EarlyStop", &[10])?,
        ints("Epochs", &[200])?,
        ints("GlobalAvePool", &[1])?,
        ints("GlobalMaxPool", &[0])?,
        ints("KernelSizes", &[8, 16, 32, 64, 128])?,
        floats("LearningRate", &[0.002])?,
        ints("MaxTest", &[999999999])?,
        ints("MaxTrain", &[3000000])?,
        ints("NumAttentionLayers", &[0])?,
        ints("NumConvLayers", &[5, 10, 15, 20, 25, 30])?,
        ints("NumDense", &[0])?,
        ints("NumKernelsFirstLayer", &[500, 1000])?,
        ints("NumKernelsLaterLayers", &[25, 50, 100, 200])?,
        ints("NumKernels", &[1024, 512, 256, 128, 64])?,
        ints("RevComp", &[0])?,
        ints("ShouldTest", &[1])?,
        tokens("Tasks", &["K562"])?,
        ints("TaskWeights", &[1])?,
        ints("UseCustomLoss", &[0])?,
        ints("Verbose", &[2])?,
    ])?;

    Ok(Campaign {
        name: "conv-sweep".to_string(),
        description: "Random convolutional depth and kernel sweep".to_string(),
        space,
        policy: EnumerationPolicy::Random,
        options: AssemblerOptions::default(),
        cluster: ClusterSettings::default(),
        environment: JobEnvironment::default(),
    })
}

/// Random split of a fixed layer budget between convolution and attention.
pub fn transformer_sweep() -> Result<Campaign> {
    let space = ParameterSpace::new(vec![
        ints("AttentionHeads", &[5, 10, 20, 40, 60])?,
        ints("AttentionKeyDim", &[5, 10, 20, 30, 40])?,
        ints("AttentionResidualSkip", &[1])?,
        ints("BatchSize", &[128])?,
        ints("ConvDropout", &[0, 1])?,
        tokens("ConvPad", &["same"])?,
        ints("ConvPoolSize", &[1])?,
        ints("ConvResidualSkip", &[1])?,
        ints("DenseSizes", &[20, 50, 100, 200])?,
        ints("DilationFactor", &[1])?,
        floats("DropoutRate", &[0.1, 0.2, 0.3, 0.4, 0.5])?,
        ints("EarlyStop", &[10])?,
        ints("Epochs", &[200])?,
        ints("GlobalAvePool", &[1])?,
        ints("GlobalMaxPool", &[0])?,
        ints("KernelSizes", &[8, 16, 32, 64, 128])?,
        floats("LearningRate", &[0.001, 0.002, 0.005])?,
        ints("MaxTest", &[999999999])?,
        ints("MaxTrain", &[3000000])?,
        ints("NumAttentionLayers", &[0])?,
        ints("NumConvLayers", &[2, 4, 6, 8])?,
        ints("NumDense", &[0, 1, 2])?,
        ints("NumKernelsFirstLayer", &[500, 1000])?,
        ints("NumKernelsLaterLayers", &[25, 50, 100, 200])?,
        ints("NumKernels", &[0])?,
        ints("RevComp", &[0])?,
        ints("ShouldTest", &[1])?,
        tokens("Tasks", &["K562"])?,
        ints("TaskWeights", &[1])?,
        ints("UseCustomLoss", &[0])?,
        ints("Verbose", &[2])?,
    ])?;

    Ok(Campaign {
        name: "transformer-sweep".to_string(),
        description: "Random conv/attention split of a fixed layer budget".to_string(),
        space,
        policy: EnumerationPolicy::Random,
        options: AssemblerOptions {
            layer_counts: LayerCounts::FixedTotal {
                total: TRANSFORMER_LAYERS,
            },
            attention: AttentionSampling::PerLayer,
            conv_lists: ConvLists::Sampled,
        },
        cluster: ClusterSettings::default(),
        environment: JobEnvironment {
            conda_env: TF5_ENV.to_string(),
            ..JobEnvironment::default()
        },
    })
}

/// Every conv/attention split crossed with key dimension, repeated.
pub fn transformer_grid() -> Result<Campaign> {
    let space = ParameterSpace::new(vec![
        ints("NumKernels", &[1024, 512, 256, 128, 64, 32, 32, 32, 32, 32])?,
        ints("KernelSizes", &[8, 16, 32, 64, 128, 128, 128, 128, 128, 128])?,
        ints("AttentionKeyDim", &GRID_KEY_DIMS)?,
        ints("AttentionHeads", &[8])?,
        ints("ConvDropout", &[1])?,
        floats("DropoutRate", &[0.5])?,
        ints("DilationFactor", &[0])?,
        ints("AttentionResidualSkip", &[0])?,
        ints("BatchSize", &[128])?,
        tokens("ConvPad", &["same"])?,
        ints("ConvPoolSize", &[1])?,
        ints("ConvResidualSkip", &[1])?,
        ints("DenseSizes", &[0])?,
        ints("EarlyStop", &[10])?,
        ints("Epochs", &[200])?,
        ints("GlobalAvePool", &[1])?,
        ints("GlobalMaxPool", &[0])?,
        floats("LearningRate", &[0.002])?,
        ints("MaxTest", &[999999999])?,
        ints("MaxTrain", &[3000000])?,
        ints("NumDense", &[0])?,
        ints("RevComp", &[0])?,
        ints("ShouldTest", &[1])?,
        tokens("Tasks", &["K562"])?,
        ints("TaskWeights", &[1])?,
        ints("UseCustomLoss", &[0])?,
        ints("Verbose", &[2])?,
    ])?;

    Ok(Campaign {
        name: "transformer-grid".to_string(),
        description: "Layer-split by key-dimension grid, repeated".to_string(),
        space,
        policy: EnumerationPolicy::GridRepeats {
            grid: GridPoint::layer_split(TRANSFORMER_LAYERS, &GRID_KEY_DIMS),
            repeats: GRID_REPEATS,
        },
        options: AssemblerOptions {
            layer_counts: LayerCounts::FixedTotal {
                total: TRANSFORMER_LAYERS,
            },
            attention: AttentionSampling::PerJob,
            conv_lists: ConvLists::Schedule,
        },
        cluster: ClusterSettings {
            memory: 100000,
            extra_directives: vec![
                "#SBATCH --exclusive".to_string(),
                "#SBATCH --gres=gpu:RTXA5000:1".to_string(),
            ],
            ..ClusterSettings::default()
        },
        environment: JobEnvironment {
            conda_env: TF5_ENV.to_string(),
            ..JobEnvironment::default()
        },
    })
}
