// src/runner.rs
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::options::AppOptions;
use crate::data::{Catalog, Pick};
use crate::error::Result;
use crate::{file, sampler, specs};

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub picks: Vec<Pick>,
    /// `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Load → sample → export, everything taken from `opts`.
pub fn run(opts: &AppOptions) -> Result<RunSummary> {
    let catalog = specs::catalog::load(&opts.source)?;
    let mut rng = make_rng(opts.seed);
    run_with(&catalog, opts, &mut rng)
}

/// The part of [`run`] after loading, with the catalog and RNG injected.
pub fn run_with<R: Rng + ?Sized>(
    catalog: &Catalog,
    opts: &AppOptions,
    rng: &mut R,
) -> Result<RunSummary> {
    logf!(
        "Run: quota={} strategy={:?} seed={:?}",
        opts.quota,
        opts.sampler.strategy,
        opts.seed
    );

    let picks = sampler::sample_with(catalog, &opts.quota, rng, &opts.sampler)?;

    if opts.dry_run {
        logd!("Run: dry run, skipping export");
        return Ok(RunSummary { picks, written: None });
    }

    let path = file::export(&picks, &opts.export)?;
    Ok(RunSummary { picks, written: Some(path) })
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
