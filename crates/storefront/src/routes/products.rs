//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::Product;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Category slug to filter by. An unknown slug lists everything.
    pub category: Option<String>,
}

/// List products, optionally filtered to a category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .store()
        .list_products(query.category.as_deref())
        .await?;
    Ok(Json(products))
}

/// Product detail by slug.
#[instrument(skip(state), fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = state
        .store()
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {slug}")))?;
    Ok(Json(product))
}
