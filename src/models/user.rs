use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User as DomainUser;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}
