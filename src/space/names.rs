//! Parameter names the assembler reads or derives.

pub const NUM_CONV_LAYERS: &str = "NumConvLayers";
pub const NUM_ATTENTION_LAYERS: &str = "NumAttentionLayers";
pub const NUM_DENSE: &str = "NumDense";

pub const KERNEL_SIZES: &str = "KernelSizes";
pub const NUM_KERNELS: &str = "NumKernels";
pub const ATTENTION_HEADS: &str = "AttentionHeads";
pub const ATTENTION_KEY_DIM: &str = "AttentionKeyDim";
pub const DENSE_SIZES: &str = "DenseSizes";

pub const NUM_KERNELS_FIRST_LAYER: &str = "NumKernelsFirstLayer";
pub const NUM_KERNELS_LATER_LAYERS: &str = "NumKernelsLaterLayers";

/// Keys that drive list derivation but are never written to a config file.
pub const INTERNAL_KEYS: [&str; 2] = [NUM_KERNELS_FIRST_LAYER, NUM_KERNELS_LATER_LAYERS];

#[inline]
pub fn is_internal(name: &str) -> bool {
    INTERNAL_KEYS.contains(&name)
}
