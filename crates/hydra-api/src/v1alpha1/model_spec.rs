use std::borrow::Cow;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta};
use k8s_openapi::NamespaceResourceScope;
use kube::core::Resource;
use schemars::JsonSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{Deployment, DeploymentRuntime, Descriptor, Source, GROUP, VERSION};
use crate::error::Error;
use crate::scheme::{KindInfo, RegisteredKind};

pub const KIND: &str = "ModelSpec";
pub const LIST_KIND: &str = "ModelSpecList";
pub const PLURAL: &str = "modelspecs";
pub const SINGULAR: &str = "modelspec";
pub const SHORT_NAME: &str = "ms";

/// Serving limits taken from the model's tokenizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Context window in tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// Desired state of a model: how to deploy it, how to present it, where
/// its weights live.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ModelSpecSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ModelConfig>,
    /// Supported runtime configurations, in order of preference.
    pub deployments: Vec<Deployment>,
    pub descriptor: Descriptor,
    pub source: Source,
}

impl ModelSpecSpec {
    pub fn max_tokens(&self) -> Option<u64> {
        self.config.as_ref().and_then(|c| c.max_tokens)
    }

    /// First deployment targeting `runtime`.
    pub fn deployment_for(&self, runtime: DeploymentRuntime) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.runtime == runtime)
    }
}

/// Namespaced `model.hydra.io/v1alpha1` ModelSpec resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ModelSpecFields")]
pub struct ModelSpec {
    pub metadata: ObjectMeta,
    pub spec: ModelSpecSpec,
}

impl ModelSpec {
    pub fn new(name: &str, spec: ModelSpecSpec) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            spec,
        }
    }
}

/// Collection of ModelSpec resources as returned by a list call.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "ModelSpecListFields")]
pub struct ModelSpecList {
    pub metadata: ListMeta,
    pub items: Vec<ModelSpec>,
}

fn api_version() -> String {
    format!("{GROUP}/{VERSION}")
}

/// `apiVersion` and `kind` are optional on input but must match when given.
fn check_type_meta(api_version_in: Option<&str>, kind_in: Option<&str>, kind: &str) -> Result<(), Error> {
    let expected_version = api_version();
    if let Some(v) = api_version_in {
        if v != expected_version {
            return Err(Error::UnexpectedKind {
                expected: format!("apiVersion {expected_version}"),
                actual: v.to_string(),
            });
        }
    }
    if let Some(k) = kind_in {
        if k != kind {
            return Err(Error::UnexpectedKind {
                expected: format!("kind {kind}"),
                actual: k.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSpecFields {
    api_version: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    spec: ModelSpecSpec,
}

impl TryFrom<ModelSpecFields> for ModelSpec {
    type Error = Error;

    fn try_from(fields: ModelSpecFields) -> Result<Self, Self::Error> {
        check_type_meta(fields.api_version.as_deref(), fields.kind.as_deref(), KIND)?;
        Ok(Self {
            metadata: fields.metadata,
            spec: fields.spec,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSpecListFields {
    api_version: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    metadata: ListMeta,
    #[serde(default)]
    items: Vec<ModelSpec>,
}

impl TryFrom<ModelSpecListFields> for ModelSpecList {
    type Error = Error;

    fn try_from(fields: ModelSpecListFields) -> Result<Self, Self::Error> {
        check_type_meta(fields.api_version.as_deref(), fields.kind.as_deref(), LIST_KIND)?;
        Ok(Self {
            metadata: fields.metadata,
            items: fields.items,
        })
    }
}

impl Serialize for ModelSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct(KIND, 4)?;
        s.serialize_field("apiVersion", &api_version())?;
        s.serialize_field("kind", KIND)?;
        s.serialize_field("metadata", &self.metadata)?;
        s.serialize_field("spec", &self.spec)?;
        s.end()
    }
}

impl Serialize for ModelSpecList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct(LIST_KIND, 4)?;
        s.serialize_field("apiVersion", &api_version())?;
        s.serialize_field("kind", LIST_KIND)?;
        s.serialize_field("metadata", &self.metadata)?;
        s.serialize_field("items", &self.items)?;
        s.end()
    }
}

impl Resource for ModelSpec {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        KIND.into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        VERSION.into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        PLURAL.into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl RegisteredKind for ModelSpec {
    fn kind_info() -> KindInfo {
        KindInfo::root(GROUP, VERSION, KIND, PLURAL).with_crd(crate::crd::model_spec_crd)
    }
}

impl RegisteredKind for ModelSpecList {
    fn kind_info() -> KindInfo {
        KindInfo::list(GROUP, VERSION, LIST_KIND, KIND)
    }
}
