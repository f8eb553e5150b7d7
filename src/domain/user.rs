use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
