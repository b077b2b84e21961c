use serde_json::{json, Value};

use super::*;
use crate::codec;
use crate::error::Error;
use crate::quantity::Quantity;

fn example_doc() -> Value {
    json!({
        "spec": {
            "deployments": [{
                "resourceRequirements": {
                    "cpu": 4,
                    "gpuCount": 1,
                    "gpuType": "gpu",
                    "memory": 16384,
                    "perGPUMemoryGB": 24
                },
                "runtime": "vllm",
                "versionRequired": "0.5.0"
            }],
            "descriptor": {
                "description": {"enUS": "A model", "zhCN": "模型"},
                "display": "MyModel",
                "icon": {"src": "http://x/icon.png", "type": "image/png"},
                "links": [],
                "provider": {"id": "p1", "name": {"enUS": "Provider", "zhCN": "提供商"}},
                "tags": ["TEXT_GENERATION"]
            },
            "source": {"huggingface": {"name": "org/model"}, "modelscope": {"name": ""}}
        }
    })
}

fn make_spec(deployments: Vec<Deployment>) -> ModelSpecSpec {
    ModelSpecSpec {
        config: None,
        deployments,
        descriptor: Descriptor {
            description: LocalizedText::uniform("desc"),
            display: "Qwen2.5-7B-Instruct".to_string(),
            icon: Icon {
                src: "https://example.com/qwen.svg".to_string(),
                media_type: "image/svg".to_string(),
            },
            links: vec![Link {
                description: "About".to_string(),
                url: "https://github.com/Qwen".to_string(),
            }],
            provider: Provider {
                id: "qwen".to_string(),
                name: LocalizedText {
                    en_us: "Qwen".to_string(),
                    zh_cn: "通义千问".to_string(),
                },
            },
            tags: vec![ModelSpecTag::TextGeneration, ModelSpecTag::Tools],
        },
        source: Source::Mirrored {
            huggingface: HubRepo::new("Qwen/Qwen2.5-7B-Instruct"),
            modelscope: HubRepo::new("Qwen/Qwen2.5-7B-Instruct"),
        },
    }
}

fn make_deployment(runtime: DeploymentRuntime, args: Vec<&str>) -> Deployment {
    Deployment {
        custom_runtime_args: args.into_iter().map(String::from).collect(),
        resource_requirements: ResourceRequirements {
            cpu: "7500m".parse().unwrap(),
            gpu_count: 2,
            gpu_type: GpuType::Vgpu,
            memory: Quantity::from_integer(64),
            per_gpu_memory_gb: 80,
        },
        runtime,
        version_required: ">=0.8.5".to_string(),
    }
}

#[test]
fn test_example_document_round_trip() {
    let input = example_doc();
    let model: ModelSpec = codec::from_value(input.clone()).unwrap();

    assert_eq!(model.metadata.name, None);
    assert_eq!(model.spec.deployments.len(), 1);
    let reqs = &model.spec.deployments[0].resource_requirements;
    assert_eq!(reqs.gpu_type, GpuType::Gpu);
    assert_eq!(reqs.cpu_millis(), 4_000);
    assert!(model.spec.deployments[0].custom_runtime_args.is_empty());

    let output = serde_json::to_value(&model).unwrap();
    assert_eq!(output["apiVersion"], "model.hydra.io/v1alpha1");
    assert_eq!(output["kind"], "ModelSpec");
    assert_eq!(output["spec"], input["spec"]);
    assert_eq!(output["spec"]["deployments"][0]["resourceRequirements"]["gpuType"], "gpu");
    assert_eq!(output["spec"]["descriptor"]["tags"][0], "TEXT_GENERATION");
}

#[test]
fn test_populated_resource_round_trip() {
    let mut model = ModelSpec::new(
        "qwen2-5-7b-instruct",
        make_spec(vec![
            make_deployment(DeploymentRuntime::Vllm, vec!["--max-model-len", "32768"]),
            make_deployment(DeploymentRuntime::Sglang, vec![]),
        ]),
    );
    model.metadata.namespace = Some("models".to_string());
    model.metadata.resource_version = Some("42".to_string());

    let bytes = codec::to_json(&model).unwrap();
    let decoded: ModelSpec = codec::from_json(&bytes).unwrap();
    assert_eq!(decoded, model);

    let yaml = codec::to_yaml(&model).unwrap();
    let decoded: ModelSpec = codec::from_yaml(&yaml).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn test_enum_literals_are_preserved() {
    for runtime in DeploymentRuntime::ALL {
        let encoded = serde_json::to_value(runtime).unwrap();
        assert_eq!(encoded, runtime.as_str());
        assert_eq!(serde_json::from_value::<DeploymentRuntime>(encoded).unwrap(), *runtime);
    }
    for gpu in GpuType::ALL {
        let encoded = serde_json::to_value(gpu).unwrap();
        assert_eq!(encoded, gpu.as_str());
        assert_eq!(serde_json::from_value::<GpuType>(encoded).unwrap(), *gpu);
    }
    for tag in ModelSpecTag::ALL {
        let encoded = serde_json::to_value(tag).unwrap();
        assert_eq!(encoded, tag.as_str());
        assert_eq!(tag.as_str().parse::<ModelSpecTag>().unwrap(), *tag);
    }
    assert_eq!(ModelSpecTag::RerankModel.as_str(), "RERANK_MODEL");
    assert_eq!(ModelSpecTag::ALL.len(), 11);
}

#[test]
fn test_legacy_gpu_type_spelling() {
    let gpu: GpuType = serde_json::from_value(json!("nvidia-vgpu")).unwrap();
    assert_eq!(gpu, GpuType::Vgpu);
    assert_eq!(serde_json::to_value(gpu).unwrap(), "vgpu");
}

#[test]
fn test_unknown_literals_rejected() {
    let mut doc = example_doc();
    doc["spec"]["deployments"][0]["runtime"] = json!("triton");
    let err = codec::from_value::<ModelSpec>(doc).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }));
    assert!(err.to_string().contains("triton"));

    let mut doc = example_doc();
    doc["spec"]["descriptor"]["tags"] = json!(["TEXT_GENERATION", "transformers"]);
    assert!(codec::from_value::<ModelSpec>(doc).is_err());

    let err = "tpu".parse::<GpuType>().unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { kind: "gpu type", .. }));
    assert!(err.to_string().contains("gpu, vgpu"));
}

#[test]
fn test_custom_runtime_args_absent_and_empty() {
    let model: ModelSpec = codec::from_value(example_doc()).unwrap();
    assert_eq!(model.spec.deployments[0].custom_runtime_args, Vec::<String>::new());

    let mut doc = example_doc();
    doc["spec"]["deployments"][0]["customRuntimeArgs"] = json!(["--enforce-eager", "--trust-remote-code"]);
    let model: ModelSpec = codec::from_value(doc).unwrap();
    assert_eq!(
        model.spec.deployments[0].custom_runtime_args,
        vec!["--enforce-eager", "--trust-remote-code"]
    );
}

#[test]
fn test_config_max_tokens() {
    let model: ModelSpec = codec::from_value(example_doc()).unwrap();
    assert_eq!(model.spec.config, None);
    let output = serde_json::to_value(&model).unwrap();
    assert!(output["spec"].get("config").is_none());

    let mut doc = example_doc();
    doc["spec"]["config"] = json!({"maxTokens": 32768});
    let model: ModelSpec = codec::from_value(doc).unwrap();
    assert_eq!(model.spec.max_tokens(), Some(32768));
    let output = serde_json::to_value(&model).unwrap();
    assert_eq!(output["spec"]["config"], json!({"maxTokens": 32768}));

    let mut doc = example_doc();
    doc["spec"]["config"] = json!({});
    let model: ModelSpec = codec::from_value(doc).unwrap();
    assert_eq!(model.spec.config, Some(ModelConfig::default()));
    assert_eq!(model.spec.max_tokens(), None);
}

#[test]
fn test_deployment_multiplicity() {
    let mut doc = example_doc();
    doc["spec"]["deployments"] = json!([]);
    let model: ModelSpec = codec::from_value(doc).unwrap();
    assert!(model.spec.deployments.is_empty());

    let mut doc = example_doc();
    let one = doc["spec"]["deployments"][0].clone();
    let mut sglang = one.clone();
    sglang["runtime"] = json!("sglang");
    doc["spec"]["deployments"] = json!([one.clone(), sglang, one]);
    let model: ModelSpec = codec::from_value(doc).unwrap();
    assert_eq!(model.spec.deployments.len(), 3);
    assert_eq!(
        model.spec.deployment_for(DeploymentRuntime::Sglang).map(|d| d.runtime),
        Some(DeploymentRuntime::Sglang)
    );
}

#[test]
fn test_missing_required_key_is_malformed() {
    let mut doc = example_doc();
    doc["spec"]["deployments"][0]
        .as_object_mut()
        .unwrap()
        .remove("versionRequired");
    let err = codec::from_value::<ModelSpec>(doc).unwrap_err();
    assert!(err.to_string().contains("versionRequired"));

    let mut doc = example_doc();
    doc["spec"]["deployments"][0]["resourceRequirements"]["gpuCount"] = json!("one");
    assert!(matches!(
        codec::from_value::<ModelSpec>(doc),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn test_empty_source_is_malformed() {
    let mut doc = example_doc();
    doc["spec"]["source"] = json!({"huggingface": {"name": ""}, "modelscope": {"name": ""}});
    assert!(codec::from_value::<ModelSpec>(doc).is_err());
}

#[test]
fn test_type_meta_checked_when_present() {
    let mut doc = example_doc();
    doc["apiVersion"] = json!("model.hydra.io/v1alpha1");
    doc["kind"] = json!("ModelSpec");
    assert!(codec::from_value::<ModelSpec>(doc.clone()).is_ok());

    doc["kind"] = json!("ModelCard");
    let err = codec::from_value::<ModelSpec>(doc).unwrap_err();
    assert!(err.to_string().contains("ModelCard"));
}

#[test]
fn test_quantity_strings_in_requirements() {
    let mut doc = example_doc();
    doc["spec"]["deployments"][0]["resourceRequirements"]["cpu"] = json!("500m");
    doc["spec"]["deployments"][0]["resourceRequirements"]["memory"] = json!("2Gi");
    let model: ModelSpec = codec::from_value(doc.clone()).unwrap();
    let reqs = &model.spec.deployments[0].resource_requirements;
    assert_eq!(reqs.cpu_millis(), 500);
    assert_eq!(reqs.memory_bytes(), 2 << 30);

    let output = serde_json::to_value(&model).unwrap();
    assert_eq!(output["spec"], doc["spec"]);

    doc["spec"]["deployments"][0]["resourceRequirements"]["memory"] = json!("2GiB");
    assert!(codec::from_value::<ModelSpec>(doc).is_err());
}

#[test]
fn test_list_round_trip() {
    let list = ModelSpecList {
        items: vec![
            ModelSpec::new("a", make_spec(vec![])),
            ModelSpec::new("b", make_spec(vec![make_deployment(DeploymentRuntime::Vllm, vec![])])),
        ],
        ..ModelSpecList::default()
    };
    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value["kind"], "ModelSpecList");
    assert_eq!(value["items"][1]["kind"], "ModelSpec");

    let decoded: ModelSpecList = codec::from_value(value).unwrap();
    assert_eq!(decoded, list);
}

#[test]
fn test_resource_identity() {
    use kube::core::{Resource, ResourceExt};

    let model = ModelSpec::new("qwen", make_spec(vec![]));
    assert_eq!(ModelSpec::api_version(&()), "model.hydra.io/v1alpha1");
    assert_eq!(ModelSpec::plural(&()), "modelspecs");
    assert_eq!(model.name_any(), "qwen");
}

#[test]
fn test_total_gpu_memory() {
    let d = make_deployment(DeploymentRuntime::Vllm, vec![]);
    assert_eq!(d.resource_requirements.total_gpu_memory_gb(), 160);
    assert_eq!(d.resource_requirements.memory_bytes(), 64 << 30);
}
