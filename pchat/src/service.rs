//! One request/response exchange against the chat-completions endpoint.

use std::sync::Arc;
use std::time::Instant;

use pprovider::{ChatTransport, Endpoint, RequestBody, ResponseBody, Turn};

use crate::{ConversationStore, ExchangeError, Settings};

/// Reply text used when the endpoint answers without any content.
pub const NO_CONTENT_PLACEHOLDER: &str = "AI 沒有回應內容";

#[derive(Clone)]
pub struct ChatExchanger {
    transport: Arc<dyn ChatTransport>,
}

impl std::fmt::Debug for ChatExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatExchanger")
            .field("transport", &self.transport)
            .finish()
    }
}

impl ChatExchanger {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    pub async fn send<S>(
        &self,
        settings: &Settings,
        store: &mut S,
        user_text: &str,
    ) -> Result<String, ExchangeError>
    where
        S: ConversationStore + ?Sized,
    {
        self.send_with_model(settings, store, user_text, None).await
    }

    /// Runs one exchange, using `model_override` instead of the configured
    /// model when it is present and not blank.
    ///
    /// The user turn is appended before the request goes out and stays in the
    /// store when the exchange fails. The assistant turn is appended only on
    /// success.
    pub async fn send_with_model<S>(
        &self,
        settings: &Settings,
        store: &mut S,
        user_text: &str,
        model_override: Option<&str>,
    ) -> Result<String, ExchangeError>
    where
        S: ConversationStore + ?Sized,
    {
        if user_text.trim().is_empty() {
            return Err(ExchangeError::invalid_request(
                "user message must not be empty",
            ));
        }

        if store.is_empty() {
            store.append(Turn::system(settings.system_prompt()));
        }
        store.append(Turn::user(user_text));

        let model = model_override
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(settings.model());
        let request = RequestBody::new(model, &store.snapshot(), settings.generation());
        let endpoint = Endpoint::new(settings.api_url(), settings.api_key());
        let started = Instant::now();

        tracing::debug!(
            phase = "exchange",
            event = "request",
            model,
            turns = request.messages.len()
        );

        let outcome = self
            .transport
            .complete(endpoint, request)
            .await
            .and_then(extract_reply);

        let reply = match outcome {
            Ok(reply) => reply,
            Err(error) => {
                let error = ExchangeError::from(error);
                tracing::debug!(
                    phase = "exchange",
                    event = "failure",
                    model,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error_kind = ?error.kind(),
                    retryable = error.is_retryable(),
                    error = %error
                );
                return Err(error);
            }
        };

        store.append(Turn::assistant(reply.clone()));

        tracing::info!(
            phase = "exchange",
            event = "success",
            model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            turns = store.len()
        );

        Ok(reply)
    }
}

fn extract_reply(response: ResponseBody) -> Result<String, pprovider::ProviderError> {
    if let Some(usage) = response.usage {
        tracing::debug!(
            phase = "exchange",
            event = "usage",
            prompt_tokens = ?usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = ?usage.total_tokens
        );
    }

    Ok(response
        .into_first_content()?
        .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string()))
}
