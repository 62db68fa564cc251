//! Business logic services for the storefront.
//!
//! # Services
//!
//! - [`checkout`] - Order placement from the session cart
//! - [`quotes`] - Quote requests with artwork uploads
//!
//! Both services reach their collaborators through narrow traits
//! (`OrderStore`, `QuoteStore`, `ArtworkStorage`) implemented by the real
//! clients, so tests can simulate store success and failure with fakes.

pub mod checkout;
pub mod quotes;

pub use checkout::{CheckoutForm, place_order};
pub use quotes::{ArtworkFile, QuoteForm, submit_quote};
