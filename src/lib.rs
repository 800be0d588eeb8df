// Library surface for headless/integration tests and reuse.
// Terminal setup and the CLI live in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;

pub use app::App;
pub use error::{HomerowError, Result};
pub use keys::HomeRowKey;
pub use session::{KeyOutcome, Phase, SessionConfig, TypingSession};
