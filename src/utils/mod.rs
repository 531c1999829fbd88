// src/utils/mod.rs
pub mod geo;
