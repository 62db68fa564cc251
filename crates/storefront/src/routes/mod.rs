//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home payload (featured products + categories)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the data store)
//!
//! # Catalog
//! GET  /categories             - Category listing
//! GET  /products               - Product listing (?category=slug to filter)
//! GET  /products/{slug}        - Product detail
//! GET  /gallery                - Gallery items, newest first
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Current cart
//! POST /cart/items             - Add a line (merges with an existing line)
//! POST /cart/items/update      - Set a line's quantity
//! POST /cart/items/remove      - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout & tracking
//! POST /checkout               - Place order from the session cart
//! GET  /orders/{order_number}  - Order tracking lookup
//!
//! # Quotes
//! POST /quotes                 - Multipart quote submission with artwork
//! ```

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod gallery;
pub mod home;
pub mod orders;
pub mod products;
pub mod quotes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Multipart ceiling for quote submissions: several 1 MB artwork files
/// plus the text fields.
const QUOTE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/update", post(cart::update))
        .route("/items/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home payload
        .route("/", get(home::home))
        // Catalog routes
        .route("/categories", get(categories::index))
        .nest("/products", product_routes())
        .route("/gallery", get(gallery::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout and order tracking
        .route("/checkout", post(checkout::submit))
        .route("/orders/{order_number}", get(orders::track))
        // Quote requests (multipart with artwork files)
        .route(
            "/quotes",
            post(quotes::submit).layer(DefaultBodyLimit::max(QUOTE_BODY_LIMIT)),
        )
}
