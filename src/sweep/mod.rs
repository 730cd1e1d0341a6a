pub mod assembler;
pub mod policy;
pub mod sampler;
pub mod serializer;

pub use assembler::{AssemblerOptions, AttentionSampling, ConfigAssembler, ConvLists, LayerCounts};
pub use policy::{Draw, EnumerationPolicy, GridPoint};
pub use sampler::{sample, sample_many};
pub use serializer::{config_lines, parse_config, render_config, write_config};
