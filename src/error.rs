// src/error.rs
use thiserror::Error;

use crate::config::file::ConfigError;
use crate::file::ExportError;
use crate::sampler::SampleError;
use crate::specs::catalog::LoadError;

/// Anything a run can fail with. Each stage keeps its own error type;
/// this just lets `?` carry them to the entry point.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
