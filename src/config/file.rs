// src/config/file.rs
//! Optional TOML config. Every key is optional; present keys override the
//! built-in defaults and are in turn overridden by command-line flags.
//!
//! ```toml
//! source = "znelky.html"
//! seed = 42
//! quota = "1=15,2=7,3=3"      # or a table: [quota] 1 = 15
//!
//! [sampler]
//! strategy = "rejection"
//! max_consecutive_rejections = 100000
//!
//! [export]
//! format = "tsv"
//! out_dir = "out"
//! stem = "znelkator_export"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::consts::DEFAULT_CONFIG_FILE;
use super::options::{AppOptions, ExportFormat, Strategy};
use crate::data::Difficulty;
use crate::quota::{Quota, QuotaError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid quota")]
    Quota(#[from] QuotaError),

    #[error("max_consecutive_rejections must be at least 1")]
    ZeroRejectionLimit,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub seed: Option<u64>,
    pub quota: Option<QuotaSpec>,
    #[serde(default)]
    pub sampler: SamplerSection,
    #[serde(default)]
    pub export: ExportSection,
}

/// A quota as `"1=15,2=7"` (keeps order) or as a table (sorted by key).
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QuotaSpec {
    Text(String),
    Table(BTreeMap<String, usize>),
}

impl QuotaSpec {
    pub fn to_quota(&self) -> Result<Quota, QuotaError> {
        match self {
            QuotaSpec::Text(s) => s.parse(),
            QuotaSpec::Table(map) => {
                let mut q = Quota::new();
                for (k, v) in map {
                    q.insert(k.parse::<Difficulty>()?, *v)?;
                }
                Ok(q)
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    pub strategy: Option<Strategy>,
    pub max_consecutive_rejections: Option<usize>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub format: Option<ExportFormat>,
    pub out_dir: Option<PathBuf>,
    pub stem: Option<String>,
    pub out_file: Option<PathBuf>,
}

pub fn parse(text: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let cfg = parse(&text, path)?;
    logf!("Config: loaded {}", path.display());
    Ok(cfg)
}

/// `znelkator.toml` in the working directory, if there is one.
pub fn load_default() -> Result<Option<ConfigFile>, ConfigError> {
    let p = Path::new(DEFAULT_CONFIG_FILE);
    if !p.is_file() {
        return Ok(None);
    }
    load(p).map(Some)
}

impl ConfigFile {
    pub fn apply(self, opts: &mut AppOptions) -> Result<(), ConfigError> {
        if let Some(source) = self.source { opts.source = source; }
        if let Some(seed) = self.seed { opts.seed = Some(seed); }
        if let Some(q) = &self.quota { opts.quota = q.to_quota()?; }

        if let Some(s) = self.sampler.strategy { opts.sampler.strategy = s; }
        if let Some(n) = self.sampler.max_consecutive_rejections {
            if n == 0 { return Err(ConfigError::ZeroRejectionLimit); }
            opts.sampler.max_consecutive_rejections = n;
        }

        let export = self.export;
        if let Some(f) = export.format { opts.export.format = f; }
        if let Some(d) = export.out_dir { opts.export.out_dir = d; }
        if let Some(s) = export.stem { opts.export.stem = s; }
        if let Some(f) = export.out_file { opts.export.out_file = Some(f); }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str) -> Result<AppOptions, ConfigError> {
        let mut opts = AppOptions::default();
        parse(text, Path::new("test.toml"))?.apply(&mut opts)?;
        Ok(opts)
    }

    #[test]
    fn empty_config_keeps_defaults() {
        assert_eq!(apply("").unwrap(), AppOptions::default());
    }

    #[test]
    fn full_config_overrides() {
        let opts = apply(
            r#"
            source = "tunes.html"
            seed = 9
            quota = "2=1,1=4"

            [sampler]
            strategy = "rejection"
            max_consecutive_rejections = 50

            [export]
            format = "tsv"
            out_dir = "exports"
            stem = "week"
            "#,
        )
        .unwrap();
        assert_eq!(opts.source, PathBuf::from("tunes.html"));
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.quota.to_string(), "2=1,1=4");
        assert_eq!(opts.sampler.strategy, Strategy::Rejection);
        assert_eq!(opts.sampler.max_consecutive_rejections, 50);
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.out_dir, PathBuf::from("exports"));
        assert_eq!(opts.export.stem, "week");
        assert!(opts.export.out_file.is_none());
    }

    #[test]
    fn quota_table_form_uses_integer_like_keys() {
        let opts = apply("[quota]\n3 = 1\n1 = 2\n").unwrap();
        assert_eq!(opts.quota.to_string(), "1=2,3=1");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(apply("quota = \"x=1,x=2\""), Err(ConfigError::Quota(_))));
        assert!(matches!(apply("colour = 1"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            apply("[sampler]\nmax_consecutive_rejections = 0"),
            Err(ConfigError::ZeroRejectionLimit)
        ));
    }
}
