use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::Order as DomainOrder;
use crate::domain::types::{OrderId, PriceCents, ProductId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub price_paid_in_cents: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Order> for DomainOrder {
    type Error = TypeConstraintError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(order.id)?,
            user_id: UserId::new(order.user_id)?,
            product_id: ProductId::new(order.product_id)?,
            price_paid_in_cents: PriceCents::new(order.price_paid_in_cents)?,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}
