// src/workbook/mod.rs
pub mod reader;
pub mod sheet;

pub use reader::Workbook;
pub use sheet::{Cell, Sheet};
