//! Framework-agnostic domain entities and their value objects.

pub mod order;
pub mod product;
pub mod types;
pub mod user;
