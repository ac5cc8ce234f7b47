//! Configuration management for the SoundShift backend.
//!
//! This module loads configuration values from environment variables and
//! `.env` files and folds them into a single [`Config`] value that is built
//! once at process start and handed to every component by reference.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! Credentials (`SPOTIFY_CLIENT_SECRET`, `GEMINI_API_KEY`, `SESSION_SECRET`)
//! never have defaults and are redacted from `Debug` output.

use std::{env, fmt, path::PathBuf, time::Duration};

use crate::{Res, error::Error};

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Scopes requested on the authorize redirect.
pub const DEFAULT_SCOPES: [&str; 8] = [
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-read-recently-played",
];

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the working directory first and then in the
/// platform-specific local data directory under `soundshift/.env`. Values
/// already present in the process environment are never overwritten, and a
/// missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/soundshift/.env`
/// - macOS: `~/Library/Application Support/soundshift/.env`
/// - Windows: `%LOCALAPPDATA%/soundshift/.env`
///
/// # Errors
///
/// Returns [`Error::Config`] if a `.env` file exists but cannot be parsed.
pub fn load_env() -> Res<()> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(mut path) = dirs::data_local_dir() {
        path.push("soundshift/.env");
        candidates.push(path);
    }

    for path in candidates.into_iter().filter(|p| p.is_file()) {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    Ok(())
}

/// Runtime configuration for the backend.
///
/// All endpoints are overridable so the whole upstream surface can be pointed
/// at local mock servers.
#[derive(Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub server_addr: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    /// Redirect URI registered with Spotify; sent on authorize and exchange.
    pub spotify_redirect_uri: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    /// Base URL of the Spotify Web API, without trailing slash.
    pub spotify_api_url: String,
    pub spotify_scopes: Vec<String>,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    /// The single origin allowed to make credentialed cross-origin requests.
    pub frontend_origin: String,
    /// HMAC secret for session credentials.
    pub session_secret: String,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Deadline applied to every outbound HTTP call.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Call [`load_env`] first to pull in `.env` files.
    ///
    /// # Required variables
    ///
    /// - `SPOTIFY_CLIENT_ID`
    /// - `SPOTIFY_CLIENT_SECRET`
    /// - `GEMINI_API_KEY`
    /// - `SESSION_SECRET`
    ///
    /// # Optional variables
    ///
    /// - `SERVER_ADDRESS` (default `127.0.0.1:8000`)
    /// - `SPOTIFY_REDIRECT_URI`, `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`,
    ///   `SPOTIFY_API_URL`
    /// - `SPOTIFY_SCOPES`: space or comma separated scope list
    /// - `GEMINI_API_URL`, `GEMINI_MODEL`
    /// - `FRONTEND_ORIGIN` (default `http://localhost:3000`)
    /// - `SECURE_COOKIES`: `false`/`0` disables the `Secure` attribute
    /// - `UPSTREAM_TIMEOUT_SECS` (default 10)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or empty,
    /// or an optional one cannot be parsed.
    pub fn from_env() -> Res<Self> {
        let upstream_timeout = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    Error::Config(format!("UPSTREAM_TIMEOUT_SECS: invalid value '{raw}'"))
                })?,
            Err(_) => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let spotify_scopes = match env::var("SPOTIFY_SCOPES") {
            Ok(raw) => parse_scopes(&raw),
            Err(_) => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        let secure_cookies = !matches!(
            env::var("SECURE_COOKIES").as_deref().map(str::trim),
            Ok("0") | Ok("false") | Ok("FALSE") | Ok("no")
        );

        let frontend_origin =
            cors_origin(optional("FRONTEND_ORIGIN", DEFAULT_FRONTEND_ORIGIN))?;

        Ok(Self {
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: optional("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            spotify_auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            spotify_token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            spotify_api_url: trim_base(optional("SPOTIFY_API_URL", DEFAULT_API_URL)),
            spotify_scopes,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_api_url: trim_base(optional("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)),
            gemini_model: optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            frontend_origin,
            session_secret: required("SESSION_SECRET")?,
            secure_cookies,
            upstream_timeout,
        })
    }

    /// Space-joined scope string as Spotify expects it.
    pub fn scope(&self) -> String {
        self.spotify_scopes.join(" ")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_client_secret", &"<redacted>")
            .field("spotify_redirect_uri", &self.spotify_redirect_uri)
            .field("spotify_auth_url", &self.spotify_auth_url)
            .field("spotify_token_url", &self.spotify_token_url)
            .field("spotify_api_url", &self.spotify_api_url)
            .field("spotify_scopes", &self.spotify_scopes)
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_api_url", &self.gemini_api_url)
            .field("gemini_model", &self.gemini_model)
            .field("frontend_origin", &self.frontend_origin)
            .field("session_secret", &"<redacted>")
            .field("secure_cookies", &self.secure_cookies)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

fn required(key: &str) -> Res<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{key} must be set"))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Credentialed CORS needs one concrete origin; a wildcard is refused.
fn cors_origin(raw: String) -> Res<String> {
    let origin = trim_base(raw.trim().to_string());
    if origin == "*" {
        return Err(Error::Config(
            "FRONTEND_ORIGIN: '*' cannot be combined with credentialed requests".into(),
        ));
    }

    Ok(origin)
}

fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
