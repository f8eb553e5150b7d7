use crate::db::{DbConnection, DbPool};
use crate::domain::order::SalesRow;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::ProductId;
use crate::domain::user::User;

pub mod errors;
pub mod order;
pub mod product;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Pagination parameters for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products available for purchase.
    pub available_only: bool,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn available(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Count all products.
    fn count_products(&self) -> RepositoryResult<usize>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product row.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<usize>;
    /// Overwrite name, description, price and blob paths of a product.
    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize>;
    /// Set the availability flag of a product.
    fn set_product_availability(&self, id: ProductId, available: bool) -> RepositoryResult<usize>;
    /// Delete a product row, returning the deleted row if one matched.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Read-only operations for order entities.
pub trait OrderReader {
    /// List orders joined with their product and customer, newest first.
    fn list_sales(&self) -> RepositoryResult<Vec<SalesRow>>;
    /// Count all orders.
    fn count_orders(&self) -> RepositoryResult<usize>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// List all users ordered by email.
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
    /// Count all users.
    fn count_users(&self) -> RepositoryResult<usize>;
}
