// src/lib.rs
//! Difficulty-balanced sampling of tune links.
//!
//! `specs::catalog` reads the tune list, `sampler` draws the picks,
//! `file` writes them out; `runner` wires the three together.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod csv;
pub mod data;
pub mod error;
pub mod file;
pub mod quota;
pub mod runner;
pub mod sampler;
pub mod specs;

#[cfg(feature = "cli")]
pub mod cli;

pub use data::{Catalog, Difficulty, Link, Pick, Tune};
pub use error::{Error, Result};
pub use quota::Quota;
pub use sampler::{SampleError, sample, sample_with};
