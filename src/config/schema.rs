use serde::{Deserialize, Serialize};

/// Credentials and endpoint override for a single LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default, rename = "apiBase")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
}

/// Provider/model pair for one logical task. Each task is independently
/// overridable via config or `AARYA_<TASK>_PROVIDER` / `AARYA_<TASK>_MODEL`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskModel {
    pub provider: String,
    pub model: String,
}

impl TaskModel {
    fn groq_default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "TaskModel::groq_default")]
    pub classification: TaskModel,
    #[serde(default = "TaskModel::groq_default")]
    pub extraction: TaskModel,
    #[serde(default = "TaskModel::groq_default")]
    pub confirmation: TaskModel,
    #[serde(default = "TaskModel::groq_default")]
    pub general: TaskModel,
    #[serde(default = "TaskModel::groq_default", rename = "finalMessage")]
    pub final_message: TaskModel,
    #[serde(default = "default_image_task")]
    pub image: TaskModel,
}

/// Image understanding always defaults to OpenAI (vision support).
fn default_image_task() -> TaskModel {
    TaskModel {
        provider: "openai".to_string(),
        model: "gpt-4o-mini".to_string(),
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            classification: TaskModel::groq_default(),
            extraction: TaskModel::groq_default(),
            confirmation: TaskModel::groq_default(),
            general: TaskModel::groq_default(),
            final_message: TaskModel::groq_default(),
            image: default_image_task(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_qa_port", rename = "qaPort")]
    pub qa_port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8002
}

fn default_qa_port() -> u16 {
    8082
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            qa_port: default_qa_port(),
        }
    }
}

/// Source document and persisted vector index for the QA service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default, rename = "documentPath")]
    pub document_path: String,
    /// SQLite file holding chunk text and embeddings. Checked for
    /// existence-and-non-emptiness at startup; rebuilt only when absent.
    #[serde(default, rename = "indexPath")]
    pub index_path: Option<String>,
    #[serde(default = "default_chunk_size", rename = "chunkSize")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap", rename = "chunkOverlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k", rename = "topK")]
    pub top_k: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            document_path: String::new(),
            index_path: None,
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

/// Out-of-band "still processing" notifications during image extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_notify_interval", rename = "intervalSecs")]
    pub interval_secs: u64,
}

fn default_notify_interval() -> u64 {
    2
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: default_notify_interval(),
        }
    }
}

/// Semantic cache for general-conversation answers: prompts within the
/// similarity threshold of a previous prompt reuse its answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_threshold")]
    pub threshold: f32,
}

fn default_cache_threshold() -> f32 {
    0.9
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: default_cache_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default, rename = "knowledgeBase")]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Canonicalize a provider name: lowercase, `claude` treated as `anthropic`.
pub fn normalize_provider(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if lower == "claude" {
        "anthropic".to_string()
    } else {
        lower
    }
}
