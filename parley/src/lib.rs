//! Terminal chat client for OpenAI-compatible `chat/completions` endpoints.
//!
//! The binary wires [`config`] and [`runtime`] together and hands the
//! resulting session to [`repl::ChatRepl`]. The pieces are exposed here so
//! they can be reused and tested without a terminal.
//!
//! ```rust
//! use parley::repl::{Command, parse_command};
//!
//! assert_eq!(parse_command("QUIT"), Command::Exit);
//! assert_eq!(parse_command("重新開始"), Command::Clear);
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod repl;
pub mod runtime;

pub use pchat;
pub use pcommon;
pub use pprovider;

pub use cli::Cli;
pub use config::{ConfigFile, LoadedConfig, SettingsFile};
pub use repl::{ChatRepl, Command};
pub use runtime::{USER_AGENT, build_session, chat_session, http_transport};
