//! Category route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::store::Category;

/// List all categories, ordered by name.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.store().list_categories().await?;
    Ok(Json(categories))
}
