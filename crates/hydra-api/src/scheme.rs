//! Registry of the resource kinds this crate knows how to decode.
//!
//! A [`Scheme`] is built once at start-up and handed by reference to the
//! codec, the CRD generator and the catalog tooling. Nothing here is global.

use std::collections::HashMap;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::GroupVersionKind;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec;
use crate::error::{Error, Result};

pub type CrdFn = fn() -> Result<CustomResourceDefinition>;

/// What the scheme records about one kind.
#[derive(Debug, Clone)]
pub struct KindInfo {
    pub gvk: GroupVersionKind,
    /// Plural resource name; `None` for list kinds.
    pub plural: Option<&'static str>,
    /// Item kind when this is a list kind.
    pub item_kind: Option<&'static str>,
    crd: Option<CrdFn>,
}

impl KindInfo {
    pub fn root(group: &str, version: &str, kind: &str, plural: &'static str) -> Self {
        Self {
            gvk: GroupVersionKind::gvk(group, version, kind),
            plural: Some(plural),
            item_kind: None,
            crd: None,
        }
    }

    pub fn list(group: &str, version: &str, kind: &str, item_kind: &'static str) -> Self {
        Self {
            gvk: GroupVersionKind::gvk(group, version, kind),
            plural: None,
            item_kind: Some(item_kind),
            crd: None,
        }
    }

    pub fn with_crd(mut self, crd: CrdFn) -> Self {
        self.crd = Some(crd);
        self
    }

    pub fn is_list(&self) -> bool {
        self.item_kind.is_some()
    }

    pub fn api_version(&self) -> String {
        self.gvk.api_version()
    }
}

/// A type that can be registered in a [`Scheme`].
pub trait RegisteredKind {
    fn kind_info() -> KindInfo;
}

#[derive(Debug, Default)]
pub struct SchemeBuilder {
    kinds: Vec<KindInfo>,
}

impl SchemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<K: RegisteredKind>(&mut self) -> Result<&mut Self> {
        let info = K::kind_info();
        if self.kinds.iter().any(|k| k.gvk == info.gvk) {
            return Err(Error::DuplicateKind(display_gvk(&info.gvk)));
        }
        tracing::debug!(kind = %display_gvk(&info.gvk), "registered kind");
        self.kinds.push(info);
        Ok(self)
    }

    pub fn build(self) -> Scheme {
        let index = self
            .kinds
            .iter()
            .enumerate()
            .map(|(i, k)| (k.gvk.clone(), i))
            .collect();
        Scheme {
            kinds: self.kinds,
            index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheme {
    kinds: Vec<KindInfo>,
    index: HashMap<GroupVersionKind, usize>,
}

impl Scheme {
    pub fn builder() -> SchemeBuilder {
        SchemeBuilder::new()
    }

    /// Scheme with every kind this crate defines.
    pub fn with_defaults() -> Result<Self> {
        let mut builder = SchemeBuilder::new();
        crate::v1alpha1::add_to_scheme(&mut builder)?;
        Ok(builder.build())
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindInfo> {
        self.kinds.iter()
    }

    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<&KindInfo> {
        self.index.get(gvk).map(|&i| &self.kinds[i])
    }

    pub fn is_registered<K: RegisteredKind>(&self) -> bool {
        self.lookup(&K::kind_info().gvk).is_some()
    }

    /// Identify a document by its `apiVersion` and `kind` fields.
    pub fn recognize(&self, doc: &Value) -> Result<&KindInfo> {
        let api_version = doc.get("apiVersion").and_then(Value::as_str);
        let kind = doc.get("kind").and_then(Value::as_str);
        let (Some(api_version), Some(kind)) = (api_version, kind) else {
            return Err(Error::Malformed {
                kind: "document",
                message: "missing apiVersion or kind".to_string(),
            });
        };
        let gvk = parse_gvk(api_version, kind);
        self.lookup(&gvk)
            .ok_or_else(|| Error::UnknownKind(display_gvk(&gvk)))
    }

    /// Decode `doc` as `K`, which must be registered.
    pub fn decode<K>(&self, doc: Value) -> Result<K>
    where
        K: RegisteredKind + DeserializeOwned,
    {
        let info = K::kind_info();
        if self.lookup(&info.gvk).is_none() {
            return Err(Error::UnknownKind(display_gvk(&info.gvk)));
        }
        codec::from_value(doc)
    }

    /// CRD documents for every registered root kind.
    pub fn crds(&self) -> Result<Vec<CustomResourceDefinition>> {
        self.kinds.iter().filter_map(|k| k.crd).map(|f| f()).collect()
    }
}

fn parse_gvk(api_version: &str, kind: &str) -> GroupVersionKind {
    match api_version.split_once('/') {
        Some((group, version)) => GroupVersionKind::gvk(group, version, kind),
        None => GroupVersionKind::gvk("", api_version, kind),
    }
}

fn display_gvk(gvk: &GroupVersionKind) -> String {
    format!("{}/{}", gvk.api_version(), gvk.kind)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::v1alpha1::{ModelSpec, ModelSpecList};

    #[test]
    fn test_default_scheme_knows_both_kinds() {
        let scheme = Scheme::with_defaults().unwrap();
        assert!(scheme.is_registered::<ModelSpec>());
        assert!(scheme.is_registered::<ModelSpecList>());
        assert_eq!(scheme.kinds().count(), 2);

        let list = scheme
            .lookup(&GroupVersionKind::gvk("model.hydra.io", "v1alpha1", "ModelSpecList"))
            .unwrap();
        assert!(list.is_list());
        assert_eq!(list.item_kind, Some("ModelSpec"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut builder = SchemeBuilder::new();
        builder.register::<ModelSpec>().unwrap();
        assert!(matches!(
            builder.register::<ModelSpec>(),
            Err(Error::DuplicateKind(_))
        ));
    }

    #[test]
    fn test_recognize() {
        let scheme = Scheme::with_defaults().unwrap();
        let doc = json!({"apiVersion": "model.hydra.io/v1alpha1", "kind": "ModelSpec"});
        let info = scheme.recognize(&doc).unwrap();
        assert_eq!(info.plural, Some("modelspecs"));
        assert_eq!(info.api_version(), "model.hydra.io/v1alpha1");

        let other = json!({"apiVersion": "v1", "kind": "ConfigMap"});
        assert!(matches!(scheme.recognize(&other), Err(Error::UnknownKind(_))));
        assert!(matches!(
            scheme.recognize(&json!({"kind": "ModelSpec"})),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_decode_requires_registration() {
        let scheme = Scheme::builder().build();
        let err = scheme.decode::<ModelSpecList>(json!({"items": []})).unwrap_err();
        assert!(matches!(err, Error::UnknownKind(_)));
    }

    #[test]
    fn test_crds_only_for_root_kinds() {
        let scheme = Scheme::with_defaults().unwrap();
        let crds = scheme.crds().unwrap();
        assert_eq!(crds.len(), 1);
        assert_eq!(crds[0].metadata.name.as_deref(), Some("modelspecs.model.hydra.io"));
    }
}
