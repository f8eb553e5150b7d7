use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::order::SalesRow;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::ProductId;
use crate::domain::user::User;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    OrderReader, ProductListQuery, ProductReader, ProductWriter, UserReader,
};

/// Simple in-memory repository used for unit tests.
pub struct TestRepository {
    products: Mutex<Vec<Product>>,
    next_id: Mutex<i32>,
    sales: Vec<SalesRow>,
    users: Vec<User>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            sales: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        let max_id = products.iter().map(|p| p.id.get()).max().unwrap_or(0);
        *self.next_id.lock() = max_id + 1;
        *self.products.lock() = products;
        self
    }

    pub fn with_sales(mut self, sales: Vec<SalesRow>) -> Self {
        self.sales = sales;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut items: Vec<Product> = self.products.lock().clone();
        if query.available_only {
            items.retain(|p| p.is_available_for_purchase);
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        let total = items.len();
        if let Some(pagination) = &query.pagination {
            let start = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(start)
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.products.lock().iter().find(|p| p.id == id).cloned())
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        Ok(self.products.lock().len())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<usize> {
        let mut next_id = self.next_id.lock();
        let id = ProductId::new(*next_id)?;
        *next_id += 1;

        self.products.lock().push(Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price_in_cents: product.price_in_cents,
            file_path: product.file_path.clone(),
            image_path: product.image_path.clone(),
            is_available_for_purchase: false,
            created_at: product.created_at,
            updated_at: product.updated_at,
        });

        Ok(1)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize> {
        let mut products = self.products.lock();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        product.name = update.name.clone();
        product.description = update.description.clone();
        product.price_in_cents = update.price_in_cents;
        product.file_path = update.file_path.clone();
        product.image_path = update.image_path.clone();
        product.updated_at = Utc::now().naive_utc();
        Ok(1)
    }

    fn set_product_availability(&self, id: ProductId, available: bool) -> RepositoryResult<usize> {
        let mut products = self.products.lock();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        product.is_available_for_purchase = available;
        product.updated_at = Utc::now().naive_utc();
        Ok(1)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut products = self.products.lock();
        let position = products.iter().position(|p| p.id == id);
        Ok(position.map(|idx| products.remove(idx)))
    }
}

impl OrderReader for TestRepository {
    fn list_sales(&self) -> RepositoryResult<Vec<SalesRow>> {
        Ok(self.sales.clone())
    }

    fn count_orders(&self) -> RepositoryResult<usize> {
        Ok(self.sales.len())
    }
}

impl UserReader for TestRepository {
    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.clone())
    }

    fn count_users(&self) -> RepositoryResult<usize> {
        Ok(self.users.len())
    }
}
