use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Serialize;

use crate::domain::types::PriceCents;
use crate::forms::{FieldErrors, push_error};

/// Multipart form posted by both the create- and edit-product pages.
#[derive(MultipartForm)]
pub struct ProductForm {
    pub name: Text<String>,
    pub description: Text<String>,
    pub price_in_cents: Text<String>,
    #[multipart(limit = "100MB")]
    pub file: Option<TempFile>,
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
}

/// Raw text fields echoed back into the form when validation fails.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub price_in_cents: String,
}

/// An uploaded blob read out of its temporary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Validated input for creating a product. File and image are mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub name: String,
    pub description: String,
    pub price_in_cents: PriceCents,
    pub file: UploadedBlob,
    pub image: UploadedBlob,
}

/// Validated input for updating a product. An absent or empty upload keeps
/// the currently stored blob.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductPayload {
    pub name: String,
    pub description: String,
    pub price_in_cents: PriceCents,
    pub file: Option<UploadedBlob>,
    pub image: Option<UploadedBlob>,
}

impl ProductForm {
    /// Snapshot of the text fields, taken before validation consumes the form.
    pub fn values(&self) -> ProductFormValues {
        ProductFormValues {
            name: self.name.0.clone(),
            description: self.description.0.clone(),
            price_in_cents: self.price_in_cents.0.clone(),
        }
    }

    pub fn into_create_payload(self) -> Result<CreateProductPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let price = parse_price(&self.price_in_cents, &mut errors);
        let file = validate_upload(self.file, "file", true, false, &mut errors);
        let image = validate_upload(self.image, "image", true, true, &mut errors);

        let (Some(price), Some(file), Some(image)) = (price, file, image) else {
            return Err(errors);
        };

        Ok(CreateProductPayload {
            name: self.name.0,
            description: self.description.0,
            price_in_cents: price,
            file,
            image,
        })
    }

    pub fn into_update_payload(self) -> Result<UpdateProductPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let price = parse_price(&self.price_in_cents, &mut errors);
        let file = validate_upload(self.file, "file", false, false, &mut errors);
        let image = validate_upload(self.image, "image", false, true, &mut errors);

        match price {
            Some(price) if errors.is_empty() => Ok(UpdateProductPayload {
                name: self.name.0,
                description: self.description.0,
                price_in_cents: price,
                file,
                image,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_price(raw: &str, errors: &mut FieldErrors) -> Option<PriceCents> {
    let value = match raw.trim().parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            push_error(errors, "price_in_cents", "must be a whole number of cents");
            return None;
        }
    };

    let value = match i32::try_from(value) {
        Ok(value) => value,
        Err(_) => {
            push_error(errors, "price_in_cents", "is out of range");
            return None;
        }
    };

    match PriceCents::new(value) {
        Ok(price) => Some(price),
        Err(_) => {
            push_error(errors, "price_in_cents", "must be at least 1");
            None
        }
    }
}

/// Check one uploaded file, returning its contents when acceptable.
///
/// An upload of size zero counts as absent, matching what browsers submit
/// for an untouched file input.
fn validate_upload(
    file: Option<TempFile>,
    field: &'static str,
    required: bool,
    must_be_image: bool,
    errors: &mut FieldErrors,
) -> Option<UploadedBlob> {
    let Some(file) = file.filter(|f| f.size > 0) else {
        if required {
            push_error(errors, field, "is required");
        }
        return None;
    };

    if must_be_image
        && !file
            .content_type
            .as_ref()
            .is_some_and(|mime| mime.essence_str().starts_with("image/"))
    {
        push_error(errors, field, "must be an image");
        return None;
    }

    match read_blob(file) {
        Ok(blob) => Some(blob),
        Err(e) => {
            log::error!("Failed to read uploaded {field}: {e}");
            push_error(errors, field, "could not be read");
            None
        }
    }
}

fn read_blob(mut file: TempFile) -> std::io::Result<UploadedBlob> {
    let file_name = file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());

    let handle = file.file.as_file_mut();
    handle.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::with_capacity(file.size);
    handle.read_to_end(&mut bytes)?;

    Ok(UploadedBlob { file_name, bytes })
}
