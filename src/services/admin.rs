use serde::Serialize;

use crate::domain::order::SalesRow;
use crate::domain::user::User;
use crate::repository::{OrderReader, ProductReader, UserReader};

use super::{ServiceError, ServiceResult};

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub products: usize,
    pub customers: usize,
    pub sales: usize,
}

pub fn dashboard_stats<R>(repo: &R) -> ServiceResult<DashboardStats>
where
    R: ProductReader + OrderReader + UserReader,
{
    let products = repo.count_products();
    let customers = repo.count_users();
    let sales = repo.count_orders();

    match (products, customers, sales) {
        (Ok(products), Ok(customers), Ok(sales)) => Ok(DashboardStats {
            products,
            customers,
            sales,
        }),
        (products, customers, sales) => {
            for error in [products.err(), customers.err(), sales.err()]
                .into_iter()
                .flatten()
            {
                log::error!("Failed to load dashboard counters: {error}");
            }
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_customers<R>(repo: &R) -> ServiceResult<Vec<User>>
where
    R: UserReader,
{
    match repo.list_users() {
        Ok(users) => Ok(users),
        Err(e) => {
            log::error!("Failed to list customers: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_sales<R>(repo: &R) -> ServiceResult<Vec<SalesRow>>
where
    R: OrderReader,
{
    match repo.list_sales() {
        Ok(sales) => Ok(sales),
        Err(e) => {
            log::error!("Failed to list sales: {e}");
            Err(ServiceError::Internal)
        }
    }
}
