use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PriceCents, ProductId};

/// A digital product offered in the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price_in_cents: PriceCents,
    /// Location of the downloadable file in the private file store.
    pub file_path: String,
    /// Public URL path of the preview image.
    pub image_path: String,
    pub is_available_for_purchase: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to insert a new [`Product`].
///
/// New products always start out unavailable for purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_in_cents: PriceCents,
    pub file_path: String,
    pub image_path: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field values applied by a product update.
///
/// `file_path` and `image_path` carry the paths that should be stored after
/// the update, whether or not a replacement blob was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price_in_cents: PriceCents,
    pub file_path: String,
    pub image_path: String,
}
