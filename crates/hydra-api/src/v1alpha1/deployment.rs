use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

const GIB: u128 = 1 << 30;

/// Inference engine a deployment runs on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum DeploymentRuntime {
    #[serde(rename = "vllm")]
    Vllm,
    #[serde(rename = "sglang")]
    Sglang,
}

literal_enum!(DeploymentRuntime, "runtime", {
    Vllm => "vllm",
    Sglang => "sglang",
});

/// Kind of GPU a deployment is scheduled on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum GpuType {
    /// Whole NVIDIA GPU.
    #[serde(rename = "gpu", alias = "nvidia-gpu")]
    Gpu,
    /// Shared/virtual NVIDIA GPU.
    #[serde(rename = "vgpu", alias = "nvidia-vgpu")]
    Vgpu,
}

literal_enum!(GpuType, "gpu type", {
    Gpu => "gpu",
    Vgpu => "vgpu",
});

/// Compute a deployment needs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    /// CPU cores; bare integers are whole cores.
    pub cpu: Quantity,

    pub gpu_count: u32,

    pub gpu_type: GpuType,

    /// Host memory; bare integers are GiB.
    pub memory: Quantity,

    #[serde(rename = "perGPUMemoryGB")]
    pub per_gpu_memory_gb: u32,
}

impl ResourceRequirements {
    pub fn cpu_millis(&self) -> u128 {
        self.cpu.milli_value()
    }

    pub fn memory_bytes(&self) -> u128 {
        self.memory.bytes_with_default_unit(GIB)
    }

    /// Aggregate GPU memory across all requested GPUs, in GB.
    pub fn total_gpu_memory_gb(&self) -> u64 {
        u64::from(self.gpu_count) * u64::from(self.per_gpu_memory_gb)
    }
}

/// One way of running the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Extra command-line arguments appended to the runtime invocation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_runtime_args: Vec<String>,

    pub resource_requirements: ResourceRequirements,

    pub runtime: DeploymentRuntime,

    /// Runtime version constraint, e.g. ">=0.8.5".
    pub version_required: String,
}
