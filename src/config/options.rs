// src/config/options.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::consts::*;
use crate::data::Difficulty;
use crate::quota::Quota;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub source: PathBuf,
    pub quota: Quota,
    /// Fixed seed for reproducible runs; entropy otherwise.
    pub seed: Option<u64>,
    pub sampler: SamplerOptions,
    pub export: ExportOptions,
    /// Print the picks instead of writing a file.
    pub dry_run: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            quota: default_quota(),
            seed: None,
            sampler: SamplerOptions::default(),
            export: ExportOptions::default(),
            dry_run: false,
        }
    }
}

pub fn default_quota() -> Quota {
    let pairs = DEFAULT_QUOTA
        .iter()
        .filter_map(|&(c, n)| Difficulty::new(c).ok().map(|d| (d, n)));
    Quota::from_pairs(pairs).unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Pool,
    Rejection,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" => Ok(Strategy::Pool),
            "rejection" => Ok(Strategy::Rejection),
            other => Err(format!("Unknown strategy: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerOptions {
    pub strategy: Strategy,
    /// Rejection strategy only: rejected draws in a row before a level gives up.
    pub max_consecutive_rejections: usize,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Pool,
            max_consecutive_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    /// Excel workbook, one sheet.
    Xlsx,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
    /// Field separator of the text formats. `None` for the workbook.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Xlsx => None,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("Unknown format: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub out_dir: PathBuf,
    /// File name prefix; the timestamp and extension are appended.
    pub stem: String,
    /// Explicit destination. Overrides dir + stem + timestamp.
    pub out_file: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            stem: s!(DEFAULT_EXPORT_STEM),
            out_file: None,
        }
    }
}

impl ExportOptions {
    /// Interpret user text: a trailing separator or an existing directory
    /// sets the output directory, anything else is an explicit file.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() { return; }

        let p = Path::new(s);
        if s.ends_with('/') || s.ends_with('\\') || p.is_dir() {
            self.out_dir = p.to_path_buf();
            self.out_file = None;
        } else {
            self.out_file = Some(p.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quota_matches_consts() {
        let q = default_quota();
        assert_eq!(q.to_string(), "1=15,2=7,3=3");
        assert_eq!(q.total(), 25);
    }

    #[test]
    fn format_extension_and_separator() {
        assert_eq!(ExportFormat::Csv.delim(), Some(','));
        assert_eq!(ExportFormat::Tsv.delim(), Some('\t'));
        assert_eq!(ExportFormat::Xlsx.delim(), None);
        assert_eq!(ExportFormat::Xlsx.ext(), "xlsx");
    }

    #[test]
    fn set_path_dir_vs_file() {
        let mut e = ExportOptions::default();
        e.set_path("some/dir/");
        assert_eq!(e.out_dir, PathBuf::from("some/dir/"));
        assert!(e.out_file.is_none());

        e.set_path("picks.csv");
        assert_eq!(e.out_file, Some(PathBuf::from("picks.csv")));

        e.set_path("   ");
        assert_eq!(e.out_file, Some(PathBuf::from("picks.csv")));
    }

    #[test]
    fn parse_format_and_strategy() {
        assert_eq!("TSV".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("ods".parse::<ExportFormat>().is_err());
        assert_eq!("rejection".parse::<Strategy>().unwrap(), Strategy::Rejection);
        assert!("magic".parse::<Strategy>().is_err());
    }
}
