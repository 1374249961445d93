//! Validated per-session settings.

use pcommon::GenerationOptions;
use pprovider::{SecretString, parse_endpoint_url};

use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "grok-3";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "請用繁體中文回應所有問題。使用台灣常用的詞彙和表達方式。";

/// Everything an exchange needs to reach the endpoint.
///
/// Only [`SettingsBuilder::build`] produces one, so a `Settings` value always
/// holds a non-empty key, an absolute http(s) URL, a non-empty model, a
/// positive token limit and an in-range temperature.
#[derive(Debug, Clone)]
pub struct Settings {
    api_key: SecretString,
    api_url: String,
    model: String,
    generation: GenerationOptions,
    system_prompt: String,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.generation.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.generation.temperature
    }

    pub fn generation(&self) -> GenerationOptions {
        self.generation
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Fixes the model picked at startup.
    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self, ConfigError> {
        let model = model.into().trim().to_string();
        if model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        self.model = model;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    api_key: Option<SecretString>,
    api_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
}

impl SettingsBuilder {
    pub fn api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .to_string();
        parse_endpoint_url(&api_url).map_err(|err| ConfigError::InvalidApiUrl {
            url: api_url.clone(),
            reason: match err {
                pprovider::ProviderError::InvalidRequest(reason) => reason,
                other => other.to_string(),
            },
        })?;

        let model = self
            .model
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
            .trim()
            .to_string();
        if model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        let mut generation = GenerationOptions::default();
        if let Some(max_tokens) = self.max_tokens {
            generation = generation.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            generation = generation.with_temperature(temperature);
        }

        if !generation.has_valid_max_tokens() {
            return Err(ConfigError::InvalidMaxTokens);
        }
        if !generation.has_valid_temperature() {
            return Err(ConfigError::InvalidTemperature(generation.temperature));
        }

        let system_prompt = self
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Settings {
            api_key,
            api_url,
            model,
            generation,
            system_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, Settings};
    use crate::ConfigError;

    #[test]
    fn build_applies_defaults_around_the_api_key() {
        let settings = Settings::builder()
            .api_key("xai-123")
            .build()
            .expect("settings should build");

        assert_eq!(settings.api_key().expose(), "xai-123");
        assert_eq!(settings.api_url(), DEFAULT_API_URL);
        assert_eq!(settings.model(), DEFAULT_MODEL);
        assert_eq!(settings.max_tokens(), 1000);
        assert_eq!(settings.system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn missing_or_blank_api_key_is_fatal() {
        let missing = Settings::builder().build().expect_err("no key must fail");
        assert_eq!(missing, ConfigError::MissingApiKey);

        let blank = Settings::builder()
            .api_key("   ")
            .build()
            .expect_err("blank key must fail");
        assert_eq!(blank, ConfigError::MissingApiKey);
    }

    #[test]
    fn invalid_url_is_rejected_with_reason() {
        let error = Settings::builder()
            .api_key("xai-123")
            .api_url("not a url")
            .build()
            .expect_err("bad url must fail");

        assert!(matches!(
            error,
            ConfigError::InvalidApiUrl { ref url, .. } if url == "not a url"
        ));
    }

    #[test]
    fn generation_limits_are_enforced() {
        let zero = Settings::builder()
            .api_key("xai-123")
            .max_tokens(0)
            .build()
            .expect_err("zero tokens must fail");
        assert_eq!(zero, ConfigError::InvalidMaxTokens);

        let hot = Settings::builder()
            .api_key("xai-123")
            .temperature(2.5)
            .build()
            .expect_err("temperature above range must fail");
        assert_eq!(hot, ConfigError::InvalidTemperature(2.5));

        let negative = Settings::builder()
            .api_key("xai-123")
            .temperature(-0.1)
            .build();
        assert!(negative.is_err());
    }

    #[test]
    fn blank_model_is_rejected_and_selection_replaces_model() {
        let blank = Settings::builder()
            .api_key("xai-123")
            .model("  ")
            .build()
            .expect_err("blank model must fail");
        assert_eq!(blank, ConfigError::EmptyModel);

        let settings = Settings::builder()
            .api_key("xai-123")
            .build()
            .expect("settings should build")
            .with_model(" grok-3-mini ")
            .expect("model should be accepted");
        assert_eq!(settings.model(), "grok-3-mini");

        let error = settings.with_model("").expect_err("empty selection must fail");
        assert_eq!(error, ConfigError::EmptyModel);
    }

    #[test]
    fn blank_system_prompt_falls_back_to_default() {
        let settings = Settings::builder()
            .api_key("xai-123")
            .system_prompt("  ")
            .build()
            .expect("settings should build");
        assert_eq!(settings.system_prompt(), DEFAULT_SYSTEM_PROMPT);

        let custom = Settings::builder()
            .api_key("xai-123")
            .system_prompt("Answer in English.")
            .build()
            .expect("settings should build");
        assert_eq!(custom.system_prompt(), "Answer in English.");
    }

    #[test]
    fn debug_output_never_shows_the_key() {
        let settings = Settings::builder()
            .api_key("xai-very-secret")
            .build()
            .expect("settings should build");

        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("xai-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
