use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header},
};

use axum_extra::extract::WithRejection;

use crate::{
    Res,
    error::Error,
    recommend,
    server::AppState,
    types::{RecommendationItem, RecommendationParams},
};

/// `GET /recommendations?mood=..` with `Authorization: Bearer <spotify token>`
pub async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Query(params), _): WithRejection<Query<RecommendationParams>, Error>,
) -> Res<Json<Vec<RecommendationItem>>> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| Error::Unauthorized("Malformed authorization header".into()))
        })
        .transpose()?;

    let items = recommend::get_personalized_recommendations(
        &state,
        authorization,
        params.mood.as_deref(),
    )
    .await?;

    Ok(Json(items))
}
