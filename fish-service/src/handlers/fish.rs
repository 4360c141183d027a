use crate::models::{parse_fish_id, Fish};
use crate::startup::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use service_core::error::{AppError, MessageBody};

/// `GET /fish`: the whole collection wrapped as `{"message": [...]}`.
pub async fn list_fish(
    State(state): State<AppState>,
) -> Result<Json<MessageBody<Vec<Fish>>>, AppError> {
    let fish = state.repo.list().await?;
    tracing::debug!(count = fish.len(), "Listed fish");
    Ok(Json(MessageBody { message: fish }))
}

/// `GET /fish/:id`: a single document, unwrapped.
pub async fn get_fish(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Fish>, AppError> {
    // Undecodable segments (e.g. `%FF`) still answer with the JSON envelope.
    let Path(id) = id.map_err(|rejection| {
        AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
    })?;
    let id = parse_fish_id(&id)?;

    let fish = state
        .repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("no documents in result")))?;

    Ok(Json(fish))
}
