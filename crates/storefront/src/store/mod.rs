//! Clients for the hosted backend-as-a-service.
//!
//! # Architecture
//!
//! - The hosted store is the source of truth - no local database, direct
//!   REST calls
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL); order
//!   and quote operations are never cached
//! - File uploads go to the backend's object storage through
//!   [`StorageClient`]
//!
//! # Example
//!
//! ```rust,ignore
//! use inkpress_storefront::store::StoreClient;
//!
//! let store = StoreClient::new(&config.store);
//!
//! // Catalog reads
//! let products = store.list_products(Some("business-cards")).await?;
//! let product = store.product_by_slug("flyers-a5").await?;
//!
//! // Order submission and tracking
//! let order = store.create_order(&new_order).await?;
//! let found = store.order_by_number(&order.order_number).await?;
//! ```

mod cache;
mod client;
pub mod storage;
pub mod types;

pub use client::StoreClient;
pub use storage::{StorageClient, StorageError};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the hosted data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success status.
    #[error("store error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An insert reported success but returned no record. This is an
    /// invariant violation, distinguished from transport failures in logs.
    #[error("insert into {0} returned no record")]
    MissingRecord(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Api {
            status: 503,
            message: "upstream unavailable".to_owned(),
        };
        assert_eq!(err.to_string(), "store error: 503 - upstream unavailable");

        let err = StoreError::MissingRecord("orders");
        assert_eq!(err.to_string(), "insert into orders returned no record");
    }
}
