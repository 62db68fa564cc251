//! Order tracking route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::Order;

/// Look up an order by its order number.
///
/// An unknown order number is a normal outcome and maps to 404 with a
/// user-facing message; a store failure maps to 502 with a retry message.
/// The two are never conflated.
#[instrument(skip(state), fields(order_number = %order_number))]
pub async fn track(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<Order>> {
    let order = state
        .store()
        .order_by_number(&order_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Order not found. Please check your order number.".to_owned())
        })?;
    Ok(Json(order))
}
