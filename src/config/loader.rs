use crate::config::schema::{Config, TaskModel};
use crate::utils::get_aarya_home;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_aarya_home()?.join("config.json"))
}

/// Load config from the given path (or `~/.aarya/config.json`), then apply
/// environment overrides. A missing file yields the defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Environment variables win over file values. API keys fall back to the
/// conventional provider variables; each logical task accepts
/// `AARYA_<TASK>_PROVIDER` and `AARYA_<TASK>_MODEL`.
fn apply_env_overrides(config: &mut Config) {
    if config.providers.groq.api_key.is_empty()
        && let Ok(key) = std::env::var("GROQ_API_KEY")
    {
        config.providers.groq.api_key = key;
    }
    if config.providers.openai.api_key.is_empty()
        && let Ok(key) = std::env::var("OPENAI_API_KEY")
    {
        config.providers.openai.api_key = key;
    }
    if config.providers.anthropic.api_key.is_empty()
        && let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
    {
        config.providers.anthropic.api_key = key;
    }

    override_task(&mut config.tasks.classification, "CLASSIFICATION");
    override_task(&mut config.tasks.extraction, "EXTRACTION");
    override_task(&mut config.tasks.confirmation, "CONFIRMATION");
    override_task(&mut config.tasks.general, "GENERAL");
    override_task(&mut config.tasks.final_message, "FINAL_MESSAGE");
    override_task(&mut config.tasks.image, "IMAGE");
}

fn override_task(task: &mut TaskModel, name: &str) {
    if let Ok(provider) = std::env::var(format!("AARYA_{name}_PROVIDER")) {
        task.provider = provider;
    }
    if let Ok(model) = std::env::var(format!("AARYA_{name}_MODEL")) {
        task.model = model;
    }
}
