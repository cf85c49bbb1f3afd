// src/cli.rs
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::file::{self as config_file, ConfigError};
use crate::config::options::{AppOptions, ExportFormat, Strategy};
use crate::quota::Quota;
use crate::runner;

/// Draw a difficulty-balanced random set of tune links and export it as a table.
#[derive(Debug, Parser)]
#[command(name = "znelkator", version)]
pub struct Args {
    /// HTML document with the tune list [default: znelky.html]
    pub source: Option<PathBuf>,

    /// TOML config file [default: ./znelkator.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Picks per difficulty, in draw order, e.g. 1=15,2=7,3=3
    #[arg(short, long)]
    pub quota: Option<Quota>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// pool | rejection
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Rejection strategy: rejected draws in a row before giving up
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_rejections: Option<u64>,

    /// csv | tsv | xlsx
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Directory for timestamped exports
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// File name prefix for timestamped exports
    #[arg(long)]
    pub stem: Option<String>,

    /// Exact output file (or a directory when it ends with a separator)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Print the picks instead of writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn into_options(self) -> Result<AppOptions, ConfigError> {
        let mut opts = AppOptions::default();

        let cfg = match &self.config {
            Some(p) => Some(config_file::load(p)?),
            None => config_file::load_default()?,
        };
        if let Some(cfg) = cfg {
            cfg.apply(&mut opts)?;
        }

        if let Some(s) = self.source { opts.source = s; }
        if let Some(q) = self.quota { opts.quota = q; }
        if let Some(seed) = self.seed { opts.seed = Some(seed); }
        if let Some(s) = self.strategy { opts.sampler.strategy = s; }
        if let Some(n) = self.max_rejections {
            opts.sampler.max_consecutive_rejections = usize::try_from(n).unwrap_or(usize::MAX);
        }
        if let Some(f) = self.format { opts.export.format = f; }
        if let Some(d) = self.out_dir { opts.export.out_dir = d; }
        if let Some(s) = self.stem { opts.export.stem = s; }
        if let Some(o) = self.out { opts.export.set_path(&o); }
        opts.dry_run = self.dry_run;

        Ok(opts)
    }
}

pub fn run() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    crate::log::init(args.verbose);

    let opts = args.into_options()?;
    let summary = runner::run(&opts)?;

    match &summary.written {
        Some(path) => println!("Wrote {} picks to {}", summary.picks.len(), path.display()),
        None => {
            for p in &summary.picks {
                println!("{p}");
            }
        }
    }
    Ok(())
}
