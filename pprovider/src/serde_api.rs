//! Chat-completions HTTP payload serde models.

use pcommon::GenerationOptions;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{ProviderError, Turn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestBody {
    pub fn new(model: impl Into<String>, turns: &[Turn], options: GenerationOptions) -> Self {
        Self {
            model: model.into(),
            messages: turns.iter().map(RequestMessage::from).collect(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        let options = GenerationOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        if !options.has_valid_max_tokens() {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if !options.has_valid_temperature() {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ProviderError> {
        serde_json::to_vec(self).map_err(|err| ProviderError::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

impl From<&Turn> for RequestMessage {
    fn from(value: &Turn) -> Self {
        Self {
            role: value.role.as_str().to_string(),
            content: value.content.clone(),
        }
    }
}

/// Decoded response. Only the first choice is kept, and `usage` is read on a
/// best-effort basis; neither the other choices nor a malformed `usage` can
/// fail an otherwise usable response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default, deserialize_with = "first_choice_only")]
    pub choices: Option<Vec<ResponseChoice>>,
    #[serde(default, deserialize_with = "lenient_usage")]
    pub usage: Option<ResponseUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResponseChoice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ResponseUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

fn first_choice_only<'de, D>(deserializer: D) -> Result<Option<Vec<ResponseChoice>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.into_iter()
        .take(1)
        .map(|choice| serde_json::from_value(choice).map_err(D::Error::custom))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn lenient_usage<'de, D>(deserializer: D) -> Result<Option<ResponseUsage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|usage| {
        let object = usage.as_object()?;
        let count = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|count| u32::try_from(count).ok())
        };

        Some(ResponseUsage {
            prompt_tokens: count("prompt_tokens"),
            completion_tokens: count("completion_tokens"),
            total_tokens: count("total_tokens"),
        })
    }))
}

impl ResponseBody {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProviderError> {
        serde_json::from_slice(bytes).map_err(|err| ProviderError::parse(err.to_string()))
    }

    /// Text of the first choice. `Ok(None)` means the choice exists but
    /// carries no usable text.
    pub fn into_first_content(self) -> Result<Option<String>, ProviderError> {
        let choice = self
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::parse("no choices returned"))?;

        Ok(choice
            .message
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty()))
    }
}
