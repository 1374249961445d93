//! Wire layer for OpenAI-compatible `chat/completions` endpoints.
//!
//! ```rust
//! use pcommon::GenerationOptions;
//! use pprovider::{RequestBody, Turn};
//!
//! let turns = vec![Turn::system("be brief"), Turn::user("hello")];
//! let body = RequestBody::new("grok-3-mini", &turns, GenerationOptions::default());
//!
//! assert_eq!(body.messages.len(), 2);
//! assert_eq!(body.messages[1].role, "user");
//! assert!(body.validate().is_ok());
//! ```

mod credentials;
mod error;
mod serde_api;
mod transport;
mod types;

pub mod prelude {
    pub use crate::{
        ChatTransport, Endpoint, HttpChatTransport, ProviderError, ProviderErrorKind,
        RequestBody, ResponseBody, Role, SecretString, Turn,
    };
}

pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind, is_retryable_status};
pub use serde_api::{
    RequestBody, RequestMessage, ResponseBody, ResponseChoice, ResponseMessage, ResponseUsage,
};
pub use transport::{
    ChatTransport, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, Endpoint, HttpChatTransport,
    parse_endpoint_url,
};
pub use types::{Role, Turn};
