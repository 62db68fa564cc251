//! Core types for Inkpress.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customization;
pub mod email;
pub mod id;
pub mod status;

pub use customization::{Customization, CustomizationOptions, OptionSet, OptionValue};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
