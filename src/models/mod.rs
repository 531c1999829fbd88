// src/models/mod.rs
pub mod catalog;
pub mod pricing;

pub use catalog::*;
pub use pricing::*;
