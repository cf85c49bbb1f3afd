// src/core/mod.rs

pub mod label;
pub mod sanitize;

pub use label::{Label, parse_label};
