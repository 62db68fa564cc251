//! Cart route handlers.
//!
//! The cart lives in the session: handlers load it, mutate it in memory,
//! and write it back. No cart operation touches the hosted backend.

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use inkpress_core::{Cart, CartItem, Customization, ProductId};

use crate::error::{AppError, Result};

/// Session key holding the serialized cart.
const CART_KEY: &str = "cart";

/// Load the session cart, falling back to an empty cart.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(CART_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(CART_KEY, cart).await.map_err(|e| {
        tracing::error!(error = %e, "failed to persist session cart");
        AppError::Internal("failed to persist session cart".to_owned())
    })
}

/// Cart payload returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().cloned().collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub customization: Customization,
    pub unit_price: Decimal,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: ProductId,
}

/// Show the session cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::from(&cart))
}

/// Add a line to the cart, merging with an existing line for the same
/// product.
#[instrument(skip(session, request), fields(product_id = %request.product_id))]
pub async fn add(session: Session, Json(request): Json<AddItemRequest>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;

    cart.add_item(CartItem {
        product_id: request.product_id,
        product_name: request.product_name,
        quantity: request.quantity.unwrap_or(1),
        customization: request.customization,
        unit_price: request.unit_price,
    })?;

    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Set the quantity of an existing cart line.
#[instrument(skip(session, request), fields(product_id = %request.product_id))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(request.product_id, request.quantity)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart. No-op if the product is absent.
#[instrument(skip(session, request), fields(product_id = %request.product_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(request.product_id);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Total unit count for the cart badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = load_cart(&session).await;
    Json(CartCount {
        count: cart.total_items(),
    })
}
