//! Hosted data store client implementation.
//!
//! Speaks the store's REST interface (`/rest/v1/{collection}`) with
//! `reqwest`. Catalog reads are cached using `moka` (5-minute TTL); order
//! and quote operations hit the store directly.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use inkpress_core::CategoryId;

use crate::config::DataStoreConfig;
use crate::store::StoreError;
use crate::store::cache::CacheValue;
use crate::store::types::{Category, GalleryItem, NewOrder, NewQuote, Order, Product, Quote};

/// How many featured products the home page shows.
const FEATURED_LIMIT: &str = "6";

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the hosted data store.
///
/// Provides typed access to the catalog collections and the order/quote
/// collections. Catalog responses are cached for 5 minutes.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    rest_endpoint: String,
    api_key: String,
    cache: Cache<String, CacheValue>,
}

impl StoreClient {
    /// Create a new data store client.
    #[must_use]
    pub fn new(config: &DataStoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let rest_endpoint = format!("{}/rest/v1", config.api_url.trim_end_matches('/'));

        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                rest_endpoint,
                api_key: config.api_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Fetch rows from a collection.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/{collection}", self.inner.rest_endpoint);

        let response = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.api_key)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                collection = %collection,
                body = %response_text.chars().take(500).collect::<String>(),
                "store returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                collection = %collection,
                body = %response_text.chars().take(500).collect::<String>(),
                "failed to parse store response"
            );
            StoreError::Parse(e)
        })
    }

    /// Insert a record into a collection, returning the created record.
    ///
    /// The store is asked to echo the insert; an empty echo means "insert
    /// succeeded but returned no record" and is surfaced as
    /// [`StoreError::MissingRecord`], never as success.
    async fn insert_row<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: &'static str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = format!("{}/{collection}", self.inner.rest_endpoint);

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.api_key)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                collection = %collection,
                body = %response_text.chars().take(500).collect::<String>(),
                "store insert returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let rows: Vec<T> = serde_json::from_str(&response_text)?;
        rows.into_iter()
            .next()
            .ok_or(StoreError::MissingRecord(collection))
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get all categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .get_rows(
                "categories",
                &[("select", "*".to_owned()), ("order", "name.asc".to_owned())],
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Resolve a category slug to its id.
    async fn category_id_by_slug(&self, slug: &str) -> Result<Option<CategoryId>, StoreError> {
        #[derive(serde::Deserialize)]
        struct IdRow {
            id: CategoryId,
        }

        let rows: Vec<IdRow> = self
            .get_rows(
                "categories",
                &[
                    ("select", "id".to_owned()),
                    ("slug", format!("eq.{slug}")),
                    ("limit", "1".to_owned()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(|row| row.id))
    }

    /// Get products ordered by name, optionally filtered to a category.
    ///
    /// An unresolvable category slug degrades to "no filter": the full
    /// product list is returned rather than an error or an empty list.
    /// This is intentional policy, not an accident of error handling.
    ///
    /// # Errors
    ///
    /// Returns an error if the product fetch itself fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let cache_key = format!("products:{}", category_slug.unwrap_or(""));

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let category_id = match category_slug {
            Some(slug) => match self.category_id_by_slug(slug).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(slug = %slug, error = %e, "category resolution failed, listing unfiltered");
                    None
                }
            },
            None => None,
        };

        let mut query = vec![("select", "*".to_owned()), ("order", "name.asc".to_owned())];
        if let Some(id) = category_id {
            query.push(("category_id", format!("eq.{id}")));
        }

        let products: Vec<Product> = self.get_rows("products", &query).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get up to 6 featured products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        let cache_key = "products:featured".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .get_rows(
                "products",
                &[
                    ("select", "*".to_owned()),
                    ("is_featured", "eq.true".to_owned()),
                    ("order", "name.asc".to_owned()),
                    ("limit", FEATURED_LIMIT.to_owned()),
                ],
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its slug. Absence is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let rows: Vec<Product> = self
            .get_rows(
                "products",
                &[
                    ("select", "*".to_owned()),
                    ("slug", format!("eq.{slug}")),
                    ("limit", "1".to_owned()),
                ],
            )
            .await?;

        let product = rows.into_iter().next();

        if let Some(ref found) = product {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(found.clone())))
                .await;
        }

        Ok(product)
    }

    /// Get gallery items, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn gallery_items(&self) -> Result<Vec<GalleryItem>, StoreError> {
        let cache_key = "gallery".to_string();

        if let Some(CacheValue::Gallery(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for gallery");
            return Ok(items);
        }

        let items: Vec<GalleryItem> = self
            .get_rows(
                "gallery_items",
                &[
                    ("select", "*".to_owned()),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Gallery(items.clone()))
            .await;

        Ok(items)
    }

    // =========================================================================
    // Order and Quote Methods (not cached - mutable state)
    // =========================================================================

    /// Create an order, returning the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or returns no record.
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.insert_row("orders", order).await
    }

    /// Look up an order by its generated order number.
    ///
    /// Returns `Ok(None)` for an unknown order number; that is a normal
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self), fields(order_number = %order_number))]
    pub async fn order_by_number(&self, order_number: &str) -> Result<Option<Order>, StoreError> {
        let rows: Vec<Order> = self
            .get_rows(
                "orders",
                &[
                    ("select", "*".to_owned()),
                    ("order_number", format!("eq.{order_number}")),
                    ("limit", "1".to_owned()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Create a quote request, returning the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or returns no record.
    #[instrument(skip(self, quote), fields(email = %quote.customer_email))]
    pub async fn create_quote(&self, quote: &NewQuote) -> Result<Quote, StoreError> {
        self.insert_row("quotes", quote).await
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Cheap connectivity probe for the readiness endpoint. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the request.
    pub async fn ping(&self) -> Result<(), StoreError> {
        #[derive(serde::Deserialize)]
        struct IdRow {
            #[serde(rename = "id")]
            _id: CategoryId,
        }

        let _rows: Vec<IdRow> = self
            .get_rows(
                "categories",
                &[("select", "id".to_owned()), ("limit", "1".to_owned())],
            )
            .await?;

        Ok(())
    }
}
