use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::ProductId;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};
use crate::repository::errors::RepositoryResult;

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();
            if query.available_only {
                items = items.filter(products::is_available_for_purchase.eq(true));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order(products::name.asc())
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let total = products::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let affected = diesel::insert_into(products::table)
            .values(db_product)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changeset: ProductChangeset = update.clone().into();

        let affected =
            diesel::update(products::table.filter(products::id.eq(id.get())))
                .set((&changeset, products::updated_at.eq(diesel::dsl::now)))
                .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_product_availability(&self, id: ProductId, available: bool) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set((
                products::is_available_for_purchase.eq(available),
                products::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.filter(products::id.eq(id.get())))
            .get_result::<DbProduct>(&mut conn)
            .optional()?;

        let deleted = deleted.map(TryInto::try_into).transpose()?;
        Ok(deleted)
    }
}
