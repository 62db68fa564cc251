//! Quote request route handler.
//!
//! Quote submissions arrive as multipart form data so artwork files can
//! ride along with the text fields. Files are validated and uploaded by
//! the quote service; this handler only decodes the body.

use axum::{Json, extract::Multipart, extract::State};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, FieldError, Result, ValidationErrors};
use crate::services::{ArtworkFile, QuoteForm, submit_quote};
use crate::state::AppState;
use crate::store::Quote;

/// Submit a quote request with optional artwork files.
#[instrument(skip(state, multipart))]
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Quote>> {
    let mut form = QuoteForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "files" {
            let file_name = field
                .file_name()
                .map_or_else(|| "artwork".to_owned(), str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid file upload: {e}")))?;
            files.push(ArtworkFile {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid field {name}: {e}")))?;

        match name.as_str() {
            "customer_name" => form.customer_name = value,
            "customer_email" => form.customer_email = value,
            "customer_phone" => form.customer_phone = some_if_not_blank(value),
            "company" => form.company = some_if_not_blank(value),
            "project_description" => form.project_description = value,
            "quantity" => form.quantity = parse_quantity(&value)?,
            "deadline" => form.deadline = parse_deadline(&value)?,
            _ => {} // ignore unknown fields
        }
    }

    let quote = submit_quote(state.store(), state.storage(), form, files).await?;

    tracing::info!(email = %quote.customer_email, "quote request submitted");
    Ok(Json(quote))
}

fn some_if_not_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_quantity(value: &str) -> Result<Option<u32>> {
    let Some(value) = some_if_not_blank(value.to_owned()) else {
        return Ok(None);
    };

    value.parse::<u32>().map(Some).map_err(|_| {
        AppError::Validation(ValidationErrors(vec![FieldError::new(
            "quantity",
            "Quantity must be a whole number",
        )]))
    })
}

fn parse_deadline(value: &str) -> Result<Option<NaiveDate>> {
    let Some(value) = some_if_not_blank(value.to_owned()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            AppError::Validation(ValidationErrors(vec![FieldError::new(
                "deadline",
                "Deadline must be a date (YYYY-MM-DD)",
            )]))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_blank_is_absent() {
        assert_eq!(parse_quantity("").expect("blank ok"), None);
        assert_eq!(parse_quantity("  ").expect("blank ok"), None);
        assert_eq!(parse_quantity("250").expect("number ok"), Some(250));
        assert!(parse_quantity("lots").is_err());
    }

    #[test]
    fn test_parse_deadline() {
        assert_eq!(parse_deadline("").expect("blank ok"), None);
        let date = parse_deadline("2026-09-01").expect("date ok").expect("present");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date"));
        assert!(parse_deadline("next week").is_err());
    }
}
