//! SoundShift Backend Library
//!
//! This library is the backend-for-frontend of SoundShift. It signs users in
//! with Spotify through the OAuth 2.0 authorization code flow, issues a signed
//! session credential, and serves song recommendations generated from the
//! user's recent listening history and an optional mood.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the public routes
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and its HTTP mapping
//! - `gemini` - Generative-text client
//! - `recommend` - Prompt building and recommendation extraction
//! - `server` - Router, shared state and the HTTP server loop
//! - `session` - Signed, expiring session credentials
//! - `spotify` - Spotify Accounts and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use soundshift::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> soundshift::Res<()> {
//!     config::load_env()?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod gemini;
pub mod recommend;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports an [`Error`], which also
/// knows how to render itself as an HTTP response. Handlers can therefore
/// return `Res<T>` directly.
///
/// # Example
///
/// ```
/// use soundshift::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Used by the command-line front end for human-facing output; library code
/// logs through `tracing` instead.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the command-line front end where recovery is not
/// possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}
