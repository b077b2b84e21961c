//! `model.hydra.io/v1alpha1` types.

/// Adds `as_str`, `ALL`, `Display` and `FromStr` to a string-literal enum so
/// CLI flags and documents share one closed set of spellings.
macro_rules! literal_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $lit:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $lit),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok($ty::$variant),)+
                    other => Err($crate::error::Error::unknown_variant(
                        $kind,
                        other,
                        &[$($lit),+],
                    )),
                }
            }
        }
    };
}

mod deployment;
mod descriptor;
mod model_spec;
mod source;

pub use deployment::{Deployment, DeploymentRuntime, GpuType, ResourceRequirements};
pub use descriptor::{
    Description, Descriptor, Icon, Link, LocalizedText, ModelSpecTag, Provider, ProviderName,
};
pub use model_spec::{ModelConfig, ModelSpec, ModelSpecList, ModelSpecSpec, KIND, LIST_KIND, PLURAL, SHORT_NAME, SINGULAR};
pub use source::{Hub, HubRepo, Source};

use crate::error::Result;
use crate::scheme::SchemeBuilder;

pub const GROUP: &str = "model.hydra.io";
pub const VERSION: &str = "v1alpha1";

/// Registers ModelSpec and ModelSpecList.
pub fn add_to_scheme(builder: &mut SchemeBuilder) -> Result<()> {
    builder.register::<ModelSpec>()?;
    builder.register::<ModelSpecList>()?;
    Ok(())
}

#[cfg(test)]
mod tests;
