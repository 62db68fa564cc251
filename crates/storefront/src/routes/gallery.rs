//! Gallery route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::store::GalleryItem;

/// List gallery items, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<GalleryItem>>> {
    let items = state.store().gallery_items().await?;
    Ok(Json(items))
}
