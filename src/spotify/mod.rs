//! # Spotify Integration Module
//!
//! This module is the integration layer between SoundShift and Spotify. It
//! covers the two halves of the provider relationship:
//!
//! ```text
//! HTTP Entry Layer (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code, client secret)
//!     └── Player & Profile (recently played, /me)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Accounts service / Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Confidential-client authorization code flow:
//! - **Authorize Redirect**: builds the consent URL with a fresh state nonce
//! - **Code Exchange**: trades the callback code for a token set
//! - **Refresh**: renews an access token from a refresh token
//!
//! ### Player Module
//!
//! [`player`] - Listening data used to seed recommendations:
//! - **Recently Played**: `GET /me/player/recently-played`
//! - **Profile**: `GET /me`, whose `id` becomes the session subject
//!
//! ## Error Types
//!
//! Everything returns [`crate::Res`]. Token endpoint rejections map to
//! `ExchangeFailed` / `RefreshFailed`; data endpoint failures map to
//! `Upstream` carrying the cause.
//!
//! ## Timeouts
//!
//! Functions take the shared `reqwest::Client` built by the server, which
//! carries the configured per-request timeout. Nothing here retries.

pub mod auth;
pub mod player;
