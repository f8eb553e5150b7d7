use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{OrderId, PriceCents, ProductId, UserId};

/// A purchase made by a user.
///
/// Orders are written by the (external) payment confirmation flow; this
/// service only reads them for the admin sales listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub price_paid_in_cents: PriceCents,
    /// Payment status reported by the gateway, e.g. `pending` or `paid`.
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An order joined with the product and customer it references, as shown on
/// the admin sales page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    pub order: Order,
    pub product_name: String,
    pub user_email: String,
}
