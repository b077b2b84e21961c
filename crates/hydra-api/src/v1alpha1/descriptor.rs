use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Capability category used to classify a model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelSpecTag {
    TextGeneration,
    VideoToText,
    TextToVideo,
    ImageToImage,
    ImageToText,
    TextToImage,
    Embedding,
    RerankModel,
    AudioToAudio,
    AudioToText,
    /// Chat template supports tool calls.
    Tools,
}

literal_enum!(ModelSpecTag, "tag", {
    TextGeneration => "TEXT_GENERATION",
    VideoToText => "VIDEO_TO_TEXT",
    TextToVideo => "TEXT_TO_VIDEO",
    ImageToImage => "IMAGE_TO_IMAGE",
    ImageToText => "IMAGE_TO_TEXT",
    TextToImage => "TEXT_TO_IMAGE",
    Embedding => "EMBEDDING",
    RerankModel => "RERANK_MODEL",
    AudioToAudio => "AUDIO_TO_AUDIO",
    AudioToText => "AUDIO_TO_TEXT",
    Tools => "TOOLS",
});

/// Text in the two locales the catalog ships.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LocalizedText {
    #[serde(rename = "enUS")]
    pub en_us: String,
    #[serde(rename = "zhCN")]
    pub zh_cn: String,
}

impl LocalizedText {
    /// Same text for both locales.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            en_us: text.clone(),
            zh_cn: text,
        }
    }
}

pub type Description = LocalizedText;
pub type ProviderName = LocalizedText;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Icon {
    pub src: String,
    /// MIME type, e.g. "image/svg".
    #[serde(rename = "type")]
    pub media_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Link {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    pub name: ProviderName,
}

/// Presentation metadata shown in model catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Descriptor {
    pub description: Description,
    pub display: String,
    pub icon: Icon,
    #[serde(default)]
    pub links: Vec<Link>,
    pub provider: Provider,
    #[serde(default)]
    pub tags: Vec<ModelSpecTag>,
}

impl Descriptor {
    pub fn has_tag(&self, tag: ModelSpecTag) -> bool {
        self.tags.contains(&tag)
    }
}
