//! Diesel row types mirroring `src/schema.rs` and their conversions into
//! domain entities.

pub mod config;
pub mod order;
pub mod product;
pub mod user;
