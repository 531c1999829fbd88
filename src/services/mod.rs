// src/services/mod.rs
pub mod catalog_service;
pub mod pricing_service;
