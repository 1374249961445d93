//! Conversation state and the request/response exchange built on top of it.
//!
//! ```rust
//! use pchat::{ConversationStore, InMemoryConversationStore};
//! use pprovider::Turn;
//!
//! let mut store = InMemoryConversationStore::new();
//! store.append(Turn::system("be brief"));
//! store.append(Turn::user("hello"));
//! assert_eq!(store.len(), 2);
//!
//! store.reset();
//! assert!(store.is_empty());
//! ```

mod error;
mod service;
mod settings;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChatExchanger, ChatSession, ConfigError, ConversationStore, ExchangeError,
        ExchangeErrorKind, InMemoryConversationStore, Settings, SettingsBuilder,
    };
    pub use pcommon::{GenerationOptions, SessionId};
    pub use pprovider::{Role, Turn};
}

pub use error::{ConfigError, ExchangeError, ExchangeErrorKind};
pub use pcommon::SessionId;
pub use service::{ChatExchanger, NO_CONTENT_PLACEHOLDER};
pub use settings::{
    DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, Settings, SettingsBuilder,
};
pub use store::{ConversationStore, InMemoryConversationStore};
pub use types::ChatSession;
