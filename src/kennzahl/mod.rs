// src/kennzahl/mod.rs
pub mod models;
pub mod registry;

pub use models::{DataPoint, Extraction};
