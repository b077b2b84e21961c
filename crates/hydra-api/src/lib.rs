pub mod codec;
pub mod crd;
pub mod error;
pub mod quantity;
pub mod scheme;
pub mod telemetry;
pub mod v1alpha1;

pub use error::{Error, Result};
pub use quantity::Quantity;
pub use scheme::{KindInfo, RegisteredKind, Scheme, SchemeBuilder};
pub use v1alpha1::{
    Deployment, DeploymentRuntime, Descriptor, GpuType, Hub, HubRepo, ModelConfig, ModelSpec, ModelSpecList,
    ModelSpecSpec, ModelSpecTag, ResourceRequirements, Source,
};
