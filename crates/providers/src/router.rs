//! Provider router: selects the generation backend based on config.

use crate::gemini::{self, GeminiProvider};
use crate::openai_compat::OpenAiCompatProvider;
use medimind_config::AppConfig;
use medimind_core::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the configured providers and knows which one is the default.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

fn build_provider(name: &str, base_url: Option<&str>, api_key: &str) -> Arc<dyn Provider> {
    match name {
        "gemini" | "google" => Arc::new(GeminiProvider::with_base_url(
            base_url.unwrap_or(gemini::DEFAULT_BASE_URL),
            api_key,
        )),
        "ollama" => Arc::new(OpenAiCompatProvider::ollama(base_url)),
        _ => {
            let url = base_url
                .map(String::from)
                .unwrap_or_else(|| default_base_url(name));
            Arc::new(OpenAiCompatProvider::new(name, url, api_key))
        }
    }
}

/// Build providers from configuration.
///
/// The default provider is always registered, even if it has no
/// `[providers.<name>]` section.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();
        let provider = build_provider(name, provider_config.api_url.as_deref(), &api_key);
        router.register(name.clone(), provider);
    }

    if router.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        let provider = build_provider(&config.default_provider, None, &api_key);
        router.register(config.default_provider.clone(), provider);
    }

    router
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
