// src/handlers/mod.rs
pub mod catalog_handler;
pub mod quote_handler;
