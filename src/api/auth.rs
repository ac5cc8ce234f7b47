use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::{WithRejection, cookie::CookieJar};

use super::cookies;
use crate::{
    Res,
    error::Error,
    server::AppState,
    session::Claims,
    spotify::{auth, player},
    types::{CallbackParams, ProviderTokenSet, RefreshRequest},
};

/// `GET /auth/spotify/login`
///
/// Redirects (302) to the Spotify consent page and remembers the state nonce
/// in a short-lived cookie for the callback to check.
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> Res<impl IntoResponse> {
    let redirect = auth::build_authorize_redirect(&state.config)?;
    let jar = jar.add(cookies::state_cookie(
        redirect.state,
        state.config.secure_cookies,
    ));

    Ok((StatusCode::FOUND, jar, [(header::LOCATION, redirect.url)]))
}

/// `GET /auth/spotify/callback?code=..&state=..`
///
/// Validates the state against the login cookie, exchanges the code, and
/// mints a session credential for the Spotify user. Responds with the
/// provider's token JSON.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(params), _): WithRejection<Query<CallbackParams>, Error>,
) -> Res<(CookieJar, Json<ProviderTokenSet>)> {
    let expected = cookies::get_state(&jar).ok_or_else(|| {
        tracing::warn!("OAuth callback without a pending login");
        Error::InvalidState
    })?;
    if params.state.as_deref() != Some(expected.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Err(Error::InvalidState);
    }

    let tokens = auth::exchange_code(&state.http, &state.config, &params.code).await?;
    let profile = player::fetch_profile(&state.http, &state.config, &tokens.access_token).await?;
    let session_token = state.codec.issue_for_subject(&profile.id)?;
    tracing::info!(spotify_id = %profile.id, "Session issued");

    let jar = jar
        .add(cookies::clear_state_cookie())
        .add(cookies::session_cookie(
            session_token,
            state.config.secure_cookies,
        ));

    Ok((jar, Json(tokens)))
}

/// `POST /auth/spotify/refresh` with body `{"refresh_token": ".."}`
pub async fn refresh(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RefreshRequest>, Error>,
) -> Res<Json<ProviderTokenSet>> {
    let tokens = auth::refresh(&state.http, &state.config, &body.refresh_token).await?;

    Ok(Json(tokens))
}

/// `GET /auth/session`
///
/// Returns the claims of the session cookie, or 401 when it is missing,
/// expired or forged.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Res<Json<Claims>> {
    let token = cookies::get_session(&jar)
        .ok_or_else(|| Error::Unauthorized("Missing session cookie".into()))?;

    Ok(Json(state.codec.verify(&token)?))
}
