use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, CustomResourceDefinitionNames, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, JSONSchemaProps,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::schema::StructuralSchemaRewriter;
use schemars::gen::SchemaSettings;
use serde_json::json;

use crate::error::{Error, Result};
use crate::v1alpha1::{ModelSpecSpec, GROUP, KIND, LIST_KIND, PLURAL, SHORT_NAME, SINGULAR, VERSION};

/// Structural OpenAPI v3 schema for the ModelSpec root object.
pub fn model_spec_schema() -> Result<JSONSchemaProps> {
    let gen = SchemaSettings::openapi3()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .with_visitor(StructuralSchemaRewriter)
        .into_generator();
    let spec = gen.into_root_schema_for::<ModelSpecSpec>();
    let spec = serde_json::to_value(spec.schema).map_err(|e| Error::Schema(e.to_string()))?;

    let root = json!({
        "type": "object",
        "description": "ModelSpec is the Schema for the modelspecs API.",
        "properties": { "spec": spec },
        "required": ["spec"],
    });
    serde_json::from_value(root).map_err(|e| Error::Schema(e.to_string()))
}

pub fn model_spec_crd() -> Result<CustomResourceDefinition> {
    let schema = model_spec_schema()?;
    Ok(CustomResourceDefinition {
        metadata: ObjectMeta {
            name: Some(format!("{PLURAL}.{GROUP}")),
            ..ObjectMeta::default()
        },
        spec: CustomResourceDefinitionSpec {
            group: GROUP.to_string(),
            names: CustomResourceDefinitionNames {
                kind: KIND.to_string(),
                list_kind: Some(LIST_KIND.to_string()),
                plural: PLURAL.to_string(),
                singular: Some(SINGULAR.to_string()),
                short_names: Some(vec![SHORT_NAME.to_string()]),
                categories: None,
            },
            scope: "Namespaced".to_string(),
            versions: vec![CustomResourceDefinitionVersion {
                name: VERSION.to_string(),
                served: true,
                storage: true,
                schema: Some(CustomResourceValidation {
                    open_api_v3_schema: Some(schema),
                }),
                ..CustomResourceDefinitionVersion::default()
            }],
            ..CustomResourceDefinitionSpec::default()
        },
        status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_props() -> JSONSchemaProps {
        let root = model_spec_schema().unwrap();
        root.properties.unwrap().remove("spec").unwrap()
    }

    #[test]
    fn test_crd_identity() {
        let crd = model_spec_crd().unwrap();
        assert_eq!(crd.metadata.name.as_deref(), Some("modelspecs.model.hydra.io"));
        assert_eq!(crd.spec.group, "model.hydra.io");
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(crd.spec.names.kind, "ModelSpec");
        assert_eq!(crd.spec.names.short_names, Some(vec!["ms".to_string()]));
        assert_eq!(crd.spec.versions.len(), 1);
        assert!(crd.spec.versions[0].storage);
    }

    #[test]
    fn test_schema_covers_wire_fields() {
        let spec = spec_props();
        let props = spec.properties.unwrap();
        for key in ["deployments", "descriptor", "source"] {
            assert!(props.contains_key(key), "missing {key}");
        }
        assert_eq!(
            spec.required,
            Some(vec![
                "deployments".to_string(),
                "descriptor".to_string(),
                "source".to_string()
            ])
        );
    }

    #[test]
    fn test_quantities_are_int_or_string() {
        let spec = spec_props();
        let json = serde_json::to_value(&spec).unwrap();
        let reqs = &json["properties"]["deployments"]["items"]["properties"]["resourceRequirements"];
        assert_eq!(reqs["properties"]["cpu"]["x-kubernetes-int-or-string"], true);
        assert_eq!(reqs["properties"]["memory"]["x-kubernetes-int-or-string"], true);
        assert!(reqs["properties"]["perGPUMemoryGB"].is_object());
    }
}
