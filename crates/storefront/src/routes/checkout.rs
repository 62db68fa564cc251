//! Checkout route handler.

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::{CheckoutForm, place_order};
use crate::state::AppState;
use crate::store::Order;

/// Place an order from the session cart.
///
/// The cart is cleared only after the store confirms the order; the
/// cleared (or untouched, on failure) cart is written back to the session.
#[instrument(skip(state, session, form), fields(email = %form.customer_email))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<Order>> {
    let mut cart = load_cart(&session).await;

    let order = place_order(state.store(), &mut cart, form).await?;

    // The order exists; a session write failure must not fail the response
    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!(error = %e, order_number = %order.order_number, "failed to clear session cart after checkout");
    }

    tracing::info!(order_number = %order.order_number, "order placed");
    Ok(Json(order))
}
