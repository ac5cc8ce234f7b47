use std::time::Duration;

use crate::config::Config;

/// Configuration whose Spotify endpoints live under `spotify_base` and whose
/// Gemini endpoint is `gemini_base`.
pub(crate) fn test_config(spotify_base: &str, gemini_base: &str) -> Config {
    Config {
        server_addr: "127.0.0.1:0".into(),
        spotify_client_id: "test-client".into(),
        spotify_client_secret: "test-secret".into(),
        spotify_redirect_uri: "http://localhost:3000/callback".into(),
        spotify_auth_url: format!("{spotify_base}/authorize"),
        spotify_token_url: format!("{spotify_base}/api/token"),
        spotify_api_url: format!("{spotify_base}/v1"),
        spotify_scopes: vec!["user-read-email".into(), "user-read-recently-played".into()],
        gemini_api_key: "test-gemini-key".into(),
        gemini_api_url: gemini_base.into(),
        gemini_model: "gemini-test".into(),
        frontend_origin: "http://localhost:3000".into(),
        session_secret: "test-session-secret".into(),
        secure_cookies: true,
        upstream_timeout: Duration::from_secs(5),
    }
}
