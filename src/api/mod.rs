//! # API Module
//!
//! HTTP endpoints exposed to the SoundShift web client.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /auth/spotify/login`, redirects to Spotify consent with
//!   a fresh state nonce held in an `oauth_state` cookie
//! - [`callback`] - `GET /auth/spotify/callback`, checks the state, exchanges
//!   the code, sets the `session_token` cookie and returns the token JSON
//! - [`refresh`] - `POST /auth/spotify/refresh`, renews the access token
//! - [`session`] - `GET /auth/session`, reports the claims of the session
//!   cookie
//!
//! ### Recommendations
//!
//! - [`recommendations`] - `GET /recommendations`, bearer-protected
//!
//! ### Monitoring
//!
//! - [`root`] - static welcome payload
//! - [`health`] - status and crate version
//!
//! ## Cookies
//!
//! | Name | Path | Lifetime |
//! |---|---|---|
//! | `session_token` | `/` | 24 hours |
//! | `oauth_state` | `/auth/spotify` | 10 minutes |
//!
//! Both are `HttpOnly` and `SameSite=Lax`; `Secure` follows configuration.
//!
//! ## Errors
//!
//! Handlers return [`crate::Res`]; [`crate::error::Error`] renders the status
//! code and a `{"detail": ...}` body.

mod auth;
mod cookies;
mod health;
mod recommendations;

pub use auth::{callback, login, refresh, session};
pub use cookies::{SESSION_COOKIE_NAME, STATE_COOKIE_NAME};
pub use health::{health, root};
pub use recommendations::recommendations;
