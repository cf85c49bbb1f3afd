// src/config/consts.rs

// Input
pub const DEFAULT_SOURCE: &str = "znelky.html";

// Quota, in draw order
pub const DEFAULT_QUOTA: &[(char, usize)] = &[('1', 15), ('2', 7), ('3', 3)];

// Sampling
pub const DEFAULT_MAX_REJECTIONS: usize = 1_000_000;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_EXPORT_STEM: &str = "znelkator_export";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.6f";

// Config file looked up in the working directory when --config is absent
pub const DEFAULT_CONFIG_FILE: &str = "znelkator.toml";
