//! Domain types for the hosted data store.
//!
//! These types mirror the store's collections (`categories`, `products`,
//! `orders`, `quotes`, `gallery_items`). Monetary amounts travel as decimal
//! strings on the wire and are `rust_decimal::Decimal` here.
//!
//! Insert payloads (`NewOrder`, `NewQuote`) serialize every optional field,
//! so "not provided" is persisted uniformly as an explicit null rather
//! than an omitted key.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use inkpress_core::{
    CategoryId, Customization, CustomizationOptions, GalleryItemId, OrderId, OrderStatus,
    ProductId, QuoteId, QuoteStatus,
};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product category. Immutable from the storefront's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-safe unique key, distinct from the opaque id.
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A printing product. Immutable from the storefront's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// "From" price in the store currency; quantity/finish options may
    /// raise the final line price client-side.
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub features: Option<Vec<String>>,
    pub customization_options: Option<CustomizationOptions>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// A showcase item for the gallery page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: GalleryItemId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Types
// =============================================================================

/// Shipping address embedded in an order. A plain value, no independent
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

/// One order line: a snapshot of the cart line at checkout time, so later
/// catalog changes never affect historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub customization: Customization,
}

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Generated human-readable identifier (`ORD-...`), unique per order.
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub items: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `orders` collection.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
}

// =============================================================================
// Quote Types
// =============================================================================

/// A persisted quote request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub company: Option<String>,
    pub project_description: String,
    pub quantity: Option<u32>,
    pub deadline: Option<NaiveDate>,
    pub status: QuoteStatus,
    pub file_urls: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `quotes` collection.
#[derive(Debug, Clone, Serialize)]
pub struct NewQuote {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub company: Option<String>,
    pub project_description: String,
    pub quantity: Option<u32>,
    pub deadline: Option<NaiveDate>,
    pub file_urls: Option<Vec<String>>,
    pub status: QuoteStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_deserializes_with_option_order() {
        let json = r#"{
            "id": "7f6c1d1e-9f6e-4e4b-8a4a-1c2d3e4f5a6b",
            "category_id": null,
            "name": "Business Cards",
            "slug": "business-cards",
            "description": "Premium cards",
            "base_price": "10.00",
            "image_url": null,
            "features": ["400gsm", "Matte or gloss"],
            "customization_options": {"sizes": ["85x55mm"], "quantities": [100, 250]},
            "is_featured": true,
            "created_at": "2026-01-12T09:30:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).expect("deserialize product");
        assert_eq!(product.base_price, Decimal::new(10_00, 2));

        let options = product.customization_options.expect("options present");
        let names: Vec<&str> = options.sets().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["sizes", "quantities"]);
    }

    #[test]
    fn test_new_quote_serializes_absent_fields_as_null() {
        let quote = NewQuote {
            customer_name: "Jo Bloggs".to_owned(),
            customer_email: "jo@example.com".to_owned(),
            customer_phone: None,
            company: None,
            project_description: "Exhibition banners for a spring trade show".to_owned(),
            quantity: None,
            deadline: None,
            file_urls: None,
            status: QuoteStatus::Pending,
        };

        let value = serde_json::to_value(&quote).expect("serialize quote");
        let object = value.as_object().expect("object");

        // "not provided" must be an explicit null, never an omitted key
        for field in ["customer_phone", "company", "quantity", "deadline", "file_urls"] {
            assert!(object.get(field).expect(field).is_null(), "{field} should be null");
        }
        assert_eq!(object.get("status").expect("status"), "pending");
    }

    #[test]
    fn test_new_order_serializes_pending_status_and_decimal_string() {
        let order = NewOrder {
            order_number: "ORD-1754560000000-K3M9QZT".to_owned(),
            customer_name: "Jo Bloggs".to_owned(),
            customer_email: "jo@example.com".to_owned(),
            customer_phone: None,
            shipping_address: ShippingAddress {
                address_line1: "123 Main Street".to_owned(),
                address_line2: None,
                city: "London".to_owned(),
                postcode: "SW1A 1AA".to_owned(),
                country: "United Kingdom".to_owned(),
            },
            items: Vec::new(),
            total_amount: Decimal::new(25_50, 2),
            status: OrderStatus::Pending,
        };

        let value = serde_json::to_value(&order).expect("serialize order");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["total_amount"], "25.50");
        assert!(value["shipping_address"]["address_line2"].is_null());
    }
}
