use reqwest::{Client, header};
use url::Url;

use crate::{
    Res,
    config::Config,
    error::Error,
    types::ProviderTokenSet,
    utils,
};

/// Authorize redirect together with the state nonce embedded in it.
#[derive(Debug, Clone)]
pub struct AuthorizeRedirect {
    pub url: String,
    pub state: String,
}

/// Builds the Spotify authorize URL for a new login.
///
/// Generates a fresh state nonce and appends the standard authorization-code
/// parameters to the configured authorize endpoint. The caller is responsible
/// for remembering `state` so the callback can be checked against it.
///
/// # Arguments
///
/// * `config` - Runtime configuration providing client id, redirect URI,
///   scopes and the authorize endpoint
///
/// # Returns
///
/// Returns an [`AuthorizeRedirect`] with the full URL and its state value.
///
/// # Query Parameters
///
/// - `response_type=code`
/// - `client_id`
/// - `scope` (space-joined)
/// - `redirect_uri`
/// - `state`
///
/// # Errors
///
/// Returns [`Error::Config`] if the configured authorize URL does not parse.
///
/// # Example
///
/// ```
/// let redirect = build_authorize_redirect(&config)?;
/// assert!(redirect.url.contains("response_type=code"));
/// ```
pub fn build_authorize_redirect(config: &Config) -> Res<AuthorizeRedirect> {
    let state = utils::generate_state();

    let mut url = Url::parse(&config.spotify_auth_url)
        .map_err(|e| Error::Config(format!("SPOTIFY_AUTH_URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.spotify_client_id)
        .append_pair("scope", &config.scope())
        .append_pair("redirect_uri", &config.spotify_redirect_uri)
        .append_pair("state", &state);

    Ok(AuthorizeRedirect {
        url: url.into(),
        state,
    })
}

/// Exchanges an authorization code for a provider token set.
///
/// Completes the authorization-code flow by posting the code to the token
/// endpoint with client credentials in a `Basic` authorization header.
///
/// # Arguments
///
/// * `http` - Shared HTTP client (carries the upstream timeout)
/// * `config` - Runtime configuration
/// * `code` - Authorization code received on the callback
///
/// # Returns
///
/// Returns the token set exactly as Spotify issued it. `refresh_token` is
/// optional.
///
/// # Errors
///
/// - [`Error::ExchangeFailed`] - Spotify answered with a non-success status
///   or an unreadable body
/// - [`Error::Upstream`] - the token endpoint could not be reached
pub async fn exchange_code(http: &Client, config: &Config, code: &str) -> Res<ProviderTokenSet> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.spotify_redirect_uri.as_str()),
    ];

    request_tokens(http, config, &form, Error::ExchangeFailed).await
}

/// Refreshes an access token using a refresh token.
///
/// Same transport as [`exchange_code`] with `grant_type=refresh_token`.
/// Spotify may or may not rotate the refresh token; callers must treat the
/// returned `refresh_token` as optional and keep the old one when absent.
///
/// # Errors
///
/// - [`Error::RefreshFailed`] - Spotify answered with a non-success status
///   or an unreadable body
/// - [`Error::Upstream`] - the token endpoint could not be reached
pub async fn refresh(http: &Client, config: &Config, refresh_token: &str) -> Res<ProviderTokenSet> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    request_tokens(http, config, &form, Error::RefreshFailed).await
}

async fn request_tokens(
    http: &Client,
    config: &Config,
    form: &[(&str, &str)],
    rejected: Error,
) -> Res<ProviderTokenSet> {
    let res = http
        .post(&config.spotify_token_url)
        .header(
            header::AUTHORIZATION,
            utils::basic_auth_header(&config.spotify_client_id, &config.spotify_client_secret),
        )
        .form(form)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token endpoint unreachable");
            Error::Upstream(format!("Token endpoint unreachable: {e}"))
        })?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(%status, body = %body, "Token endpoint rejected request");
        return Err(rejected);
    }

    res.json::<ProviderTokenSet>().await.map_err(|e| {
        tracing::warn!(error = %e, "Token endpoint returned an unreadable body");
        rejected
    })
}
