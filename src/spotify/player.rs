use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    Res,
    config::Config,
    error::Error,
    types::{PlayRecord, Profile, RecentlyPlayedResponse},
};

/// Retrieves the user's recently played tracks, most recent first.
///
/// # Arguments
///
/// * `http` - Shared HTTP client (carries the upstream timeout)
/// * `config` - Runtime configuration providing the Web API base URL
/// * `access_token` - Spotify access token supplied by the client
///
/// # API Endpoint
///
/// `GET /me/player/recently-played` (requires `user-read-recently-played`)
///
/// # Errors
///
/// Returns [`Error::Upstream`] with the underlying cause on any transport
/// failure, non-2xx status or unreadable body. No retry is attempted.
pub async fn fetch_recent_plays(
    http: &Client,
    config: &Config,
    access_token: &str,
) -> Res<Vec<PlayRecord>> {
    tracing::info!("Fetching recent tracks");
    let url = format!("{}/me/player/recently-played", config.spotify_api_url);
    let res: RecentlyPlayedResponse = get_json(http, &url, access_token, "recent tracks").await?;

    Ok(res.items)
}

/// Retrieves the current user's profile (`GET /me`).
///
/// # Errors
///
/// Same contract as [`fetch_recent_plays`].
pub async fn fetch_profile(http: &Client, config: &Config, access_token: &str) -> Res<Profile> {
    tracing::info!("Fetching user profile");
    let url = format!("{}/me", config.spotify_api_url);

    get_json(http, &url, access_token, "user profile").await
}

async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    access_token: &str,
    what: &str,
) -> Res<T> {
    let upstream = |e: reqwest::Error| {
        tracing::error!(error = %e, "Error fetching {what}");
        Error::Upstream(format!("Error fetching {what}: {e}"))
    };

    let res = http
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(upstream)?;
    tracing::info!(status = %res.status(), "{what} status");

    res.error_for_status()
        .map_err(upstream)?
        .json::<T>()
        .await
        .map_err(upstream)
}
