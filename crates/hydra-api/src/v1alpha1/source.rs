use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Model hosting site that serves weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hub {
    Huggingface,
    Modelscope,
}

impl Hub {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Huggingface => "huggingface",
            Self::Modelscope => "modelscope",
        }
    }
}

impl std::fmt::Display for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository path on a hub, e.g. "Qwen/Qwen2.5-7B-Instruct".
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct HubRepo {
    pub name: String,
}

impl HubRepo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Organisation part of an `org/model` path; `None` unless the path has
    /// exactly two non-empty segments.
    pub fn org(&self) -> Option<&str> {
        let (org, model) = self.name.split_once('/')?;
        if org.is_empty() || model.is_empty() || model.contains('/') {
            return None;
        }
        Some(org)
    }

    fn is_set(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Where the model weights come from.
///
/// At least one hub is always set; an empty repository name counts as
/// unset. `Mirrored` holds the same model published on both hubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SourceFields", into = "SourceFields")]
pub enum Source {
    Huggingface(HubRepo),
    Modelscope(HubRepo),
    Mirrored {
        huggingface: HubRepo,
        modelscope: HubRepo,
    },
}

impl Source {
    pub fn huggingface(&self) -> Option<&HubRepo> {
        match self {
            Self::Huggingface(repo) | Self::Mirrored { huggingface: repo, .. } => Some(repo),
            Self::Modelscope(_) => None,
        }
    }

    pub fn modelscope(&self) -> Option<&HubRepo> {
        match self {
            Self::Modelscope(repo) | Self::Mirrored { modelscope: repo, .. } => Some(repo),
            Self::Huggingface(_) => None,
        }
    }

    /// Hub a downloader should try first. Hugging Face wins for mirrored sources.
    pub fn primary(&self) -> (Hub, &HubRepo) {
        match self {
            Self::Huggingface(repo) | Self::Mirrored { huggingface: repo, .. } => {
                (Hub::Huggingface, repo)
            }
            Self::Modelscope(repo) => (Hub::Modelscope, repo),
        }
    }

    /// Every configured `(hub, repo)` pair, Hugging Face first.
    pub fn repos(&self) -> Vec<(Hub, &HubRepo)> {
        let mut out = Vec::with_capacity(2);
        if let Some(repo) = self.huggingface() {
            out.push((Hub::Huggingface, repo));
        }
        if let Some(repo) = self.modelscope() {
            out.push((Hub::Modelscope, repo));
        }
        out
    }
}

/// Wire shape: both keys are always present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
struct SourceFields {
    #[serde(default)]
    huggingface: HubRepo,
    #[serde(default)]
    modelscope: HubRepo,
}

impl TryFrom<SourceFields> for Source {
    type Error = String;

    fn try_from(fields: SourceFields) -> Result<Self, Self::Error> {
        match (fields.huggingface.is_set(), fields.modelscope.is_set()) {
            (true, true) => Ok(Self::Mirrored {
                huggingface: fields.huggingface,
                modelscope: fields.modelscope,
            }),
            (true, false) => Ok(Self::Huggingface(fields.huggingface)),
            (false, true) => Ok(Self::Modelscope(fields.modelscope)),
            (false, false) => {
                Err("source needs a huggingface or modelscope repository name".to_string())
            }
        }
    }
}

impl From<Source> for SourceFields {
    fn from(source: Source) -> Self {
        match source {
            Source::Huggingface(huggingface) => Self {
                huggingface,
                modelscope: HubRepo::default(),
            },
            Source::Modelscope(modelscope) => Self {
                huggingface: HubRepo::default(),
                modelscope,
            },
            Source::Mirrored {
                huggingface,
                modelscope,
            } => Self {
                huggingface,
                modelscope,
            },
        }
    }
}

impl JsonSchema for Source {
    fn schema_name() -> String {
        "Source".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        SourceFields::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_single_hub_keeps_empty_counterpart_on_the_wire() {
        let raw = json!({"huggingface": {"name": "org/model"}, "modelscope": {"name": ""}});
        let source: Source = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(source, Source::Huggingface(HubRepo::new("org/model")));
        assert_eq!(serde_json::to_value(&source).unwrap(), raw);
    }

    #[test]
    fn test_both_hubs_is_mirrored() {
        let raw = json!({"huggingface": {"name": "a/b"}, "modelscope": {"name": "c/d"}});
        let source: Source = serde_json::from_value(raw).unwrap();
        assert_eq!(source.primary(), (Hub::Huggingface, &HubRepo::new("a/b")));
        assert_eq!(source.repos().len(), 2);
    }

    #[test]
    fn test_modelscope_only() {
        let raw = json!({"modelscope": {"name": "c/d"}});
        let source: Source = serde_json::from_value(raw).unwrap();
        assert_eq!(source.huggingface(), None);
        assert_eq!(source.primary().0, Hub::Modelscope);
    }

    #[test]
    fn test_no_hub_is_rejected() {
        let raw = json!({"huggingface": {"name": " "}, "modelscope": {"name": ""}});
        assert!(serde_json::from_value::<Source>(raw).is_err());
    }

    #[test]
    fn test_repo_org() {
        assert_eq!(HubRepo::new("Qwen/Qwen2.5-7B").org(), Some("Qwen"));
        assert_eq!(HubRepo::new("bare").org(), None);
        assert_eq!(HubRepo::new("a/b/c").org(), None);
        assert_eq!(HubRepo::new("/model").org(), None);
        assert_eq!(HubRepo::new("org/").org(), None);
    }
}
