//! Quote requests: free-form project inquiries with artwork uploads.
//!
//! Artwork files are validated before any storage call (name and size
//! checks short-circuit the whole submission), then uploaded concurrently.
//! The policy is all-or-nothing: any upload failure aborts the submission
//! and no quote record is created. Resulting URLs follow submission order,
//! not completion order.

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Deserialize;

use inkpress_core::{Email, QuoteStatus};

use crate::error::{AppError, ValidationErrors};
use crate::store::{NewQuote, Quote, StorageClient, StorageError, StoreClient, StoreError};

/// Per-file size ceiling in bytes (1 MB). Checked before upload.
pub const MAX_FILE_SIZE: usize = 1_048_576;

/// Storage folder receiving artwork uploads.
const ARTWORK_FOLDER: &str = "uploads";

/// The quote-persistence seam.
#[allow(async_fn_in_trait)]
pub trait QuoteStore {
    /// Persist a quote request, returning the created record.
    async fn create_quote(&self, quote: &NewQuote) -> Result<Quote, StoreError>;
}

impl QuoteStore for StoreClient {
    async fn create_quote(&self, quote: &NewQuote) -> Result<Quote, StoreError> {
        // Resolves to the inherent client method
        StoreClient::create_quote(self, quote).await
    }
}

/// The artwork-upload seam. Returns the public URL of the stored file.
#[allow(async_fn_in_trait)]
pub trait ArtworkStorage {
    /// Upload one artwork file and return its public URL.
    async fn upload_artwork(&self, file_name: &str, bytes: Vec<u8>)
    -> Result<String, StorageError>;
}

impl ArtworkStorage for StorageClient {
    async fn upload_artwork(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let path = self.upload(ARTWORK_FOLDER, file_name, bytes).await?;
        Ok(self.public_url(&path))
    }
}

/// One artwork file selected by the customer.
#[derive(Debug, Clone)]
pub struct ArtworkFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Quote request form data as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteForm {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub project_description: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Validated quote data.
#[derive(Debug, Clone)]
pub struct QuoteData {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: Option<String>,
    pub company: Option<String>,
    pub project_description: String,
    pub quantity: Option<u32>,
    pub deadline: Option<NaiveDate>,
}

impl QuoteForm {
    /// Validate the form, collecting every failed field.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<QuoteData, ValidationErrors> {
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

        let project_description = self.project_description.trim().to_owned();
        if project_description.chars().count() < 20 {
            errors.push(
                "project_description",
                "Please provide more details about your project",
            );
        }

        let Some(customer_email) = customer_email else {
            return Err(errors);
        };
        errors.into_result()?;

        Ok(QuoteData {
            customer_name,
            customer_email,
            customer_phone,
            company: normalize_optional(self.company.as_deref()),
            project_description,
            quantity: self.quantity,
            deadline: self.deadline,
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

/// Whether a file name is acceptable: the storage backend mangles CJK
/// ideographs in object keys, so names containing them are refused before
/// upload.
fn file_name_allowed(name: &str) -> bool {
    !name.chars().any(|c| matches!(c, '\u{4e00}'..='\u{9fa5}'))
}

/// Pre-flight validation of the selected files. Never touches storage.
fn validate_files(files: &[ArtworkFile]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for file in files {
        if !file_name_allowed(&file.file_name) {
            errors.push(
                "files",
                &format!(
                    "File name \"{}\" contains unsupported characters",
                    file.file_name
                ),
            );
        }
        if file.bytes.len() > MAX_FILE_SIZE {
            errors.push(
                "files",
                &format!("File \"{}\" exceeds the 1 MB limit", file.file_name),
            );
        }
    }

    errors.into_result()
}

/// Submit a quote request.
///
/// Validates the form and every file first, uploads all files concurrently
/// (all-or-nothing), then creates the quote record with status `pending`.
/// An empty file list persists as an explicit null.
///
/// # Errors
///
/// Returns a validation error before any network call, the first upload
/// failure, or the propagated store failure.
pub async fn submit_quote<Q: QuoteStore, A: ArtworkStorage>(
    store: &Q,
    storage: &A,
    form: QuoteForm,
    files: Vec<ArtworkFile>,
) -> Result<Quote, AppError> {
    let data = form.validate()?;
    validate_files(&files)?;

    let uploads = files.into_iter().map(|file| {
        let ArtworkFile { file_name, bytes } = file;
        async move { storage.upload_artwork(&file_name, bytes).await }
    });
    let urls: Vec<String> = try_join_all(uploads).await?;

    let new_quote = NewQuote {
        customer_name: data.customer_name,
        customer_email: data.customer_email.into_inner(),
        customer_phone: data.customer_phone,
        company: data.company,
        project_description: data.project_description,
        quantity: data.quantity,
        deadline: data.deadline,
        file_urls: if urls.is_empty() { None } else { Some(urls) },
        status: QuoteStatus::Pending,
    };

    let quote = store.create_quote(&new_quote).await?;
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use inkpress_core::QuoteId;

    use super::*;

    struct FakeQuoteStore {
        quotes: Mutex<Vec<NewQuote>>,
    }

    impl FakeQuoteStore {
        fn new() -> Self {
            Self {
                quotes: Mutex::new(Vec::new()),
            }
        }
    }

    impl QuoteStore for FakeQuoteStore {
        async fn create_quote(&self, quote: &NewQuote) -> Result<Quote, StoreError> {
            self.quotes.lock().expect("lock").push(quote.clone());

            Ok(Quote {
                id: QuoteId::new(Uuid::new_v4()),
                customer_name: quote.customer_name.clone(),
                customer_email: quote.customer_email.clone(),
                customer_phone: quote.customer_phone.clone(),
                company: quote.company.clone(),
                project_description: quote.project_description.clone(),
                quantity: quote.quantity,
                deadline: quote.deadline,
                status: quote.status,
                file_urls: quote.file_urls.clone(),
                created_at: Utc::now(),
            })
        }
    }

    struct FakeStorage {
        uploads: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl FakeStorage {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(file_name: &str) -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_on: Some(file_name.to_owned()),
            }
        }
    }

    impl ArtworkStorage for FakeStorage {
        async fn upload_artwork(
            &self,
            file_name: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, StorageError> {
            if self.fail_on.as_deref() == Some(file_name) {
                return Err(StorageError::Api {
                    status: 500,
                    message: "upload rejected".to_owned(),
                });
            }

            self.uploads.lock().expect("lock").push(file_name.to_owned());
            Ok(format!("https://cdn.example.co/artwork/{file_name}"))
        }
    }

    fn valid_form() -> QuoteForm {
        QuoteForm {
            customer_name: "Jo Bloggs".to_owned(),
            customer_email: "jo@example.com".to_owned(),
            customer_phone: Some("07123456789".to_owned()),
            company: None,
            project_description: "Exhibition banners for a spring trade show".to_owned(),
            quantity: Some(4),
            deadline: None,
        }
    }

    fn file(name: &str, size: usize) -> ArtworkFile {
        ArtworkFile {
            file_name: name.to_owned(),
            bytes: vec![0; size],
        }
    }

    #[tokio::test]
    async fn test_cjk_file_name_rejected_before_any_upload() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::new();

        let files = vec![file("artwork.pdf", 512), file("设计稿.pdf", 512)];
        let err = submit_quote(&store, &storage, valid_form(), files)
            .await
            .expect_err("forbidden file name");

        assert!(matches!(err, AppError::Validation(_)));
        assert!(storage.uploads.lock().expect("lock").is_empty());
        assert!(store.quotes.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_file_at_size_ceiling_accepted_one_byte_over_rejected() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::new();

        let at_limit = vec![file("banner.pdf", MAX_FILE_SIZE)];
        submit_quote(&store, &storage, valid_form(), at_limit)
            .await
            .expect("exactly the ceiling is accepted");

        let over_limit = vec![file("banner.pdf", MAX_FILE_SIZE + 1)];
        let err = submit_quote(&store, &storage, valid_form(), over_limit)
            .await
            .expect_err("one byte over is rejected");

        assert!(matches!(err, AppError::Validation(_)));
        // Only the first submission reached storage
        assert_eq!(storage.uploads.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_whole_submission() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::failing_on("b.pdf");

        let files = vec![file("a.pdf", 128), file("b.pdf", 128), file("c.pdf", 128)];
        let err = submit_quote(&store, &storage, valid_form(), files)
            .await
            .expect_err("upload failure");

        assert!(matches!(err, AppError::Storage(_)));
        assert!(
            store.quotes.lock().expect("lock").is_empty(),
            "no quote record on partial upload failure"
        );
    }

    #[tokio::test]
    async fn test_file_urls_follow_submission_order() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::new();

        let files = vec![file("a.pdf", 128), file("b.pdf", 128), file("c.pdf", 128)];
        let quote = submit_quote(&store, &storage, valid_form(), files)
            .await
            .expect("quote created");

        assert_eq!(
            quote.file_urls.expect("urls present"),
            vec![
                "https://cdn.example.co/artwork/a.pdf",
                "https://cdn.example.co/artwork/b.pdf",
                "https://cdn.example.co/artwork/c.pdf",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_files_persists_explicit_null() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::new();

        let quote = submit_quote(&store, &storage, valid_form(), Vec::new())
            .await
            .expect("quote created");
        assert!(quote.file_urls.is_none());
        assert_eq!(quote.status, QuoteStatus::Pending);

        let submitted = store.quotes.lock().expect("lock");
        assert!(submitted.first().expect("one quote").file_urls.is_none());
    }

    #[tokio::test]
    async fn test_short_description_rejected() {
        let store = FakeQuoteStore::new();
        let storage = FakeStorage::new();

        let mut form = valid_form();
        form.project_description = "banners".to_owned();

        let err = submit_quote(&store, &storage, form, Vec::new())
            .await
            .expect_err("short description");

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.0.first().expect("one error").field,
            "project_description"
        );
    }
}
