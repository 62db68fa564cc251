//! Checkout: turn the session cart plus shipping details into an order.
//!
//! The order is submitted with status `pending` and a generated
//! human-readable order number. The cart is cleared only after the store
//! confirms the write, so a failed submission never loses cart contents.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;

use inkpress_core::{Cart, Email, OrderStatus};

use crate::error::{AppError, ValidationErrors};
use crate::store::{NewOrder, Order, OrderLine, ShippingAddress, StoreClient, StoreError};

/// Country pre-filled on the checkout form; shipping is domestic only.
const DEFAULT_COUNTRY: &str = "United Kingdom";

/// The order-persistence seam.
///
/// [`StoreClient`] is the production implementation; tests substitute a
/// recording fake to simulate store success and failure.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Persist an order, returning the created record.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError>;
}

impl OrderStore for StoreClient {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        // Resolves to the inherent client method
        StoreClient::create_order(self, order).await
    }
}

/// Checkout form data as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// Validated checkout data.
#[derive(Debug, Clone)]
pub struct CheckoutData {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: Option<String>,
    pub shipping_address: ShippingAddress,
}

impl CheckoutForm {
    /// Validate the form, collecting every failed field.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<CheckoutData, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let customer_name = self.customer_name.trim().to_owned();
        if customer_name.chars().count() < 2 {
            errors.push("customer_name", "Name must be at least 2 characters");
        }

        let customer_email = match Email::parse(&self.customer_email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("customer_email", "Invalid email address");
                None
            }
        };

        let customer_phone = normalize_optional(self.customer_phone.as_deref());
        if let Some(phone) = &customer_phone
            && phone.chars().filter(char::is_ascii_digit).count() < 10
        {
            errors.push("customer_phone", "Phone number must be at least 10 digits");
        }

        let address_line1 = self.address_line1.trim().to_owned();
        if address_line1.chars().count() < 5 {
            errors.push("address_line1", "Address is required");
        }

        let city = self.city.trim().to_owned();
        if city.chars().count() < 2 {
            errors.push("city", "City is required");
        }

        let postcode = self.postcode.trim().to_owned();
        if postcode.chars().count() < 5 {
            errors.push("postcode", "Valid UK postcode is required");
        }

        let Some(customer_email) = customer_email else {
            return Err(errors);
        };
        errors.into_result()?;

        Ok(CheckoutData {
            customer_name,
            customer_email,
            customer_phone,
            shipping_address: ShippingAddress {
                address_line1,
                address_line2: normalize_optional(self.address_line2.as_deref()),
                city,
                postcode,
                country: normalize_optional(self.country.as_deref())
                    .unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
            },
        })
    }
}

/// Trim an optional field; blank becomes `None`.
fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Generate a human-readable order number.
///
/// Concatenates a fixed prefix, the millisecond timestamp, and a 7
/// character random alphanumeric suffix, so two orders created within the
/// same millisecond still get distinct numbers.
fn generate_order_number() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(7)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("ORD-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Place an order from the session cart and the checkout form.
///
/// On success the cart is cleared; on any failure it keeps its contents so
/// the customer can retry.
///
/// # Errors
///
/// Returns a validation error before any network call, a bad-request error
/// for an empty cart, or the propagated store failure.
pub async fn place_order<S: OrderStore>(
    store: &S,
    cart: &mut Cart,
    form: CheckoutForm,
) -> Result<Order, AppError> {
    let data = form.validate()?;

    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_owned()));
    }

    let items: Vec<OrderLine> = cart
        .items()
        .map(|item| OrderLine {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
            customization: item.customization.clone(),
        })
        .collect();

    let new_order = NewOrder {
        order_number: generate_order_number(),
        customer_name: data.customer_name,
        customer_email: data.customer_email.into_inner(),
        customer_phone: data.customer_phone,
        shipping_address: data.shipping_address,
        items,
        total_amount: cart.total_price(),
        status: OrderStatus::Pending,
    };

    let order = store.create_order(&new_order).await?;

    // Only clear once the store has confirmed the write
    cart.clear();

    Ok(order)
}
