use super::*;
use crate::config::schema::ProvidersConfig;

fn config_with_keys(groq: &str, openai: &str, anthropic: &str) -> Config {
    Config {
        providers: ProvidersConfig {
            groq: ProviderConfig {
                api_key: groq.to_string(),
                api_base: None,
            },
            openai: ProviderConfig {
                api_key: openai.to_string(),
                api_base: None,
            },
            anthropic: ProviderConfig {
                api_key: anthropic.to_string(),
                api_base: None,
            },
        },
        ..Config::default()
    }
}

fn task(provider: &str, model: &str) -> TaskModel {
    TaskModel {
        provider: provider.to_string(),
        model: model.to_string(),
    }
}

#[test]
fn test_create_groq_provider() {
    let factory = ProviderFactory::new(&config_with_keys("gsk", "", ""));
    let provider = factory
        .create(&task("groq", "llama-3.3-70b-versatile"))
        .unwrap();
    assert_eq!(provider.default_model(), "llama-3.3-70b-versatile");
}

#[test]
fn test_create_claude_alias_resolves_to_anthropic() {
    let factory = ProviderFactory::new(&config_with_keys("", "", "sk-ant"));
    let provider = factory.create(&task("claude", "claude-sonnet-4-5")).unwrap();
    assert_eq!(provider.default_model(), "claude-sonnet-4-5");
}

#[test]
fn test_missing_api_key_fails_at_construction() {
    let factory = ProviderFactory::new(&config_with_keys("", "", ""));
    let err = match factory.create(&task("openai", "gpt-4o")) {
        Ok(_) => panic!("expected construction to fail without a key"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("no OpenAI API key"));
}

#[test]
fn test_unknown_provider_rejected() {
    let factory = ProviderFactory::new(&config_with_keys("gsk", "sk", "sk-ant"));
    let err = match factory.create(&task("mistral", "mistral-large")) {
        Ok(_) => panic!("expected an unknown provider to be rejected"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("unknown provider"));
}

#[test]
fn test_build_tasks_constructs_all_providers() {
    let factory = ProviderFactory::new(&config_with_keys("gsk", "sk", ""));
    let tasks = TasksConfig::default();
    let providers = factory.build_tasks(&tasks).unwrap();
    assert_eq!(
        providers.extraction.default_model(),
        "llama-3.3-70b-versatile"
    );
    assert_eq!(providers.image.default_model(), "gpt-4o-mini");
}
