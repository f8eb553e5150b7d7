use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductUpdate,
};
use crate::domain::types::{PriceCents, ProductId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
    pub is_available_for_purchase: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(product.id)?,
            name: product.name,
            description: product.description,
            price_in_cents: PriceCents::new(product.price_in_cents)?,
            file_path: product.file_path,
            image_path: product.image_path,
            is_available_for_purchase: product.is_available_for_purchase,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
    pub is_available_for_purchase: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            name: product.name,
            description: product.description,
            price_in_cents: product.price_in_cents.get(),
            file_path: product.file_path,
            image_path: product.image_path,
            is_available_for_purchase: false,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
}

impl From<ProductUpdate> for ProductChangeset {
    fn from(update: ProductUpdate) -> Self {
        Self {
            name: update.name,
            description: update.description,
            price_in_cents: update.price_in_cents.get(),
            file_path: update.file_path,
            image_path: update.image_path,
        }
    }
}
