use diesel::prelude::*;

use crate::domain::order::SalesRow;
use crate::models::order::Order as DbOrder;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, OrderReader};

impl OrderReader for DieselRepository {
    fn list_sales(&self) -> RepositoryResult<Vec<SalesRow>> {
        use crate::schema::{orders, products, users};

        let mut conn = self.conn()?;

        let rows: Vec<(DbOrder, String, String)> = orders::table
            .inner_join(products::table)
            .inner_join(users::table)
            .select((orders::all_columns, products::name, users::email))
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        let mut sales = Vec::with_capacity(rows.len());
        for (order, product_name, user_email) in rows {
            sales.push(SalesRow {
                order: order.try_into()?,
                product_name,
                user_email,
            });
        }

        Ok(sales)
    }

    fn count_orders(&self) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let total = orders::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}
