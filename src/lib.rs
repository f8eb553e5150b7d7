//! Core library exports for the storefront service.
//!
//! This crate exposes the domain model, Diesel persistence layer, file store,
//! payment gateway client and the HTTP routes of the storefront web
//! application.

pub mod cache;
pub mod db;
pub mod domain;
pub mod files;
pub mod forms;
pub mod models;
pub mod payments;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
