//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use pcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::from("session-1");
//! let options = GenerationOptions::default().with_temperature(0.3).with_max_tokens(256);
//!
//! assert_eq!(session.as_str(), "session-1");
//! assert_eq!(options.max_tokens, 256);
//! assert!(options.is_valid());
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identifier newtypes shared across crates.
    //!
    //! ```rust
    //! use pcommon::SessionId;
    //!
    //! let session = SessionId::new("session-42");
    //! assert_eq!(session.to_string(), "session-42");
    //! ```

    use std::fmt::{Display, Formatter};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        /// Builds an id that is unique enough to tell sessions of one
        /// machine apart in logs.
        pub fn for_process() -> Self {
            let started = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or_default();

            Self(format!("session-{}-{started}", std::process::id()))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Generation settings sent with every completion request.
    //!
    //! ```rust
    //! use pcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, 0.2);
    //! assert_eq!(options.max_tokens, 128);
    //! ```

    use std::ops::RangeInclusive;

    pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
    pub const DEFAULT_MAX_TOKENS: u32 = 1000;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct GenerationOptions {
        pub max_tokens: u32,
        pub temperature: f32,
    }

    impl Default for GenerationOptions {
        fn default() -> Self {
            Self {
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            }
        }
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = temperature;
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = max_tokens;
            self
        }

        pub fn has_valid_max_tokens(&self) -> bool {
            self.max_tokens > 0
        }

        pub fn has_valid_temperature(&self) -> bool {
            TEMPERATURE_RANGE.contains(&self.temperature)
        }

        pub fn is_valid(&self) -> bool {
            self.has_valid_max_tokens() && self.has_valid_temperature()
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;
pub use model::GenerationOptions;
