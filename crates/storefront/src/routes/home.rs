//! Home route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::store::{Category, Product};

/// Home payload: featured products plus the category list.
#[derive(Debug, Serialize)]
pub struct HomePayload {
    pub featured_products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Home payload handler.
///
/// Both reads are independent, so they run concurrently.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePayload>> {
    let (featured_products, categories) = tokio::try_join!(
        state.store().featured_products(),
        state.store().list_categories(),
    )?;

    Ok(Json(HomePayload {
        featured_products,
        categories,
    }))
}
