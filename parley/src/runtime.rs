//! Wiring from validated settings to a ready chat session.

use std::sync::Arc;
use std::time::Duration;

use pchat::{ChatExchanger, ChatSession, Settings};
use pcommon::SessionId;
use pprovider::{ChatTransport, HttpChatTransport, ProviderError};

/// Sent on every request so the endpoint sees the binary, not the library.
pub const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));

pub fn http_transport(timeout: Option<Duration>) -> Result<Arc<dyn ChatTransport>, ProviderError> {
    let transport = HttpChatTransport::with_timeout(timeout)?.with_user_agent(USER_AGENT);
    tracing::debug!(
        phase = "runtime",
        event = "transport_ready",
        user_agent = transport.user_agent(),
        timeout_ms = timeout.map(|timeout| timeout.as_millis() as u64)
    );

    Ok(Arc::new(transport))
}

pub fn chat_session(settings: Settings, transport: Arc<dyn ChatTransport>) -> ChatSession {
    ChatSession::new(
        SessionId::for_process(),
        settings,
        ChatExchanger::new(transport),
    )
}

pub fn build_session(
    settings: Settings,
    timeout: Option<Duration>,
) -> Result<ChatSession, ProviderError> {
    let transport = http_transport(timeout)?;
    Ok(chat_session(settings, transport))
}
