// src/sampler.rs
//! Difficulty-balanced sampling.
//!
//! Each quota level is filled in caller order from one shared set of used
//! URLs, so no link appears twice anywhere in the output. Both strategies
//! check the remaining supply of a level before drawing from it and fail
//! with [`SampleError::InsufficientSupply`] instead of spinning.
//!
//! - [`Strategy::Pool`] draws without replacement from the eligible links of
//!   a level. Every distinct link has the same chance.
//! - [`Strategy::Rejection`] draws a tune, then one of its links, and throws
//!   away anything that does not fit. Links of tunes with few links are
//!   favoured. The loop gives up after a bounded run of rejections.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::options::{SamplerOptions, Strategy};
use crate::data::{Catalog, Difficulty, Link, Pick, Tune};
use crate::quota::Quota;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error(
        "difficulty {difficulty}: {requested} picks requested but only {available} unused links are tagged with it"
    )]
    InsufficientSupply {
        difficulty: Difficulty,
        requested: usize,
        available: usize,
    },

    #[error(
        "difficulty {difficulty}: gave up after {attempts} rejected draws in a row ({picked} of {requested} picked)"
    )]
    RetriesExhausted {
        difficulty: Difficulty,
        picked: usize,
        requested: usize,
        attempts: usize,
    },
}

/// Sample with the default options (pool strategy).
pub fn sample<R: Rng + ?Sized>(
    catalog: &Catalog,
    quota: &Quota,
    rng: &mut R,
) -> Result<Vec<Pick>, SampleError> {
    sample_with(catalog, quota, rng, &SamplerOptions::default())
}

pub fn sample_with<R: Rng + ?Sized>(
    catalog: &Catalog,
    quota: &Quota,
    rng: &mut R,
    opts: &SamplerOptions,
) -> Result<Vec<Pick>, SampleError> {
    // quota counts are unbounded; never reserve more than the catalog holds
    let mut draw = Draw::new(catalog, quota.total().min(catalog.link_count()));

    for (difficulty, count) in quota.iter() {
        match opts.strategy {
            Strategy::Pool => draw.fill_from_pool(difficulty, count, rng)?,
            Strategy::Rejection => {
                draw.fill_by_rejection(difficulty, count, opts.max_consecutive_rejections, rng)?
            }
        }
    }

    logf!(picks = draw.picks.len(), levels = quota.len(), "sampling done");
    Ok(draw.picks)
}

/// Counters for one level, logged at debug.
#[derive(Debug, Default)]
struct LevelStats {
    draws: usize,
    empty_tune: usize,
    other_level: usize,
    duplicate: usize,
}

struct Draw<'c> {
    catalog: &'c Catalog,
    used: HashSet<&'c str>,
    picks: Vec<Pick>,
}

impl<'c> Draw<'c> {
    fn new(catalog: &'c Catalog, capacity: usize) -> Self {
        Self {
            catalog,
            used: HashSet::with_capacity(capacity),
            picks: Vec::with_capacity(capacity),
        }
    }

    /// [`Catalog::tagged`] minus URLs an earlier pick already took.
    fn eligible(&self, d: Difficulty) -> Vec<(&'c Tune, &'c Link)> {
        let mut pool = self.catalog.tagged(d);
        pool.retain(|(_, link)| !self.used.contains(link.url.as_str()));
        pool
    }

    fn check_supply(d: Difficulty, requested: usize, available: usize) -> Result<(), SampleError> {
        if available < requested {
            loge!(difficulty = %d, requested, available, "not enough links for quota");
            return Err(SampleError::InsufficientSupply { difficulty: d, requested, available });
        }
        Ok(())
    }

    fn push(&mut self, tune: &'c Tune, link: &'c Link, d: Difficulty) {
        self.used.insert(link.url.as_str());
        self.picks.push(Pick::from_link(tune, link, d));
    }

    fn fill_from_pool<R: Rng + ?Sized>(
        &mut self,
        d: Difficulty,
        count: usize,
        rng: &mut R,
    ) -> Result<(), SampleError> {
        if count == 0 { return Ok(()); }

        let mut pool = self.eligible(d);
        Self::check_supply(d, count, pool.len())?;

        let (chosen, _) = pool.partial_shuffle(rng, count);
        for &(tune, link) in chosen.iter() {
            self.push(tune, link, d);
        }
        logd!(difficulty = %d, count, pool = pool.len(), "level filled from pool");
        Ok(())
    }

    fn fill_by_rejection<R: Rng + ?Sized>(
        &mut self,
        d: Difficulty,
        count: usize,
        max_misses: usize,
        rng: &mut R,
    ) -> Result<(), SampleError> {
        if count == 0 { return Ok(()); }
        Self::check_supply(d, count, self.eligible(d).len())?;

        let catalog = self.catalog;
        let tunes = catalog.tunes();
        let mut stats = LevelStats::default();
        let mut picked = 0usize;
        let mut misses = 0usize;

        while picked < count {
            if misses >= max_misses {
                loge!(difficulty = %d, picked, requested = count, "rejection limit reached");
                return Err(SampleError::RetriesExhausted {
                    difficulty: d,
                    picked,
                    requested: count,
                    attempts: misses,
                });
            }
            stats.draws += 1;

            // empty catalog
            let Some(tune) = tunes.choose(rng) else {
                return Err(SampleError::InsufficientSupply {
                    difficulty: d,
                    requested: count,
                    available: 0,
                });
            };

            let Some(link) = tune.links.choose(rng) else {
                stats.empty_tune += 1;
                misses += 1;
                continue;
            };

            if link.difficulty != Some(d) {
                stats.other_level += 1;
                misses += 1;
                continue;
            }

            if self.used.contains(link.url.as_str()) {
                logd!("Link {} already used, trying again", link.name);
                stats.duplicate += 1;
                misses += 1;
                continue;
            }

            self.push(tune, link, d);
            picked += 1;
            misses = 0;
        }

        logd!(
            difficulty = %d,
            count,
            draws = stats.draws,
            empty_tune = stats.empty_tune,
            other_level = stats.other_level,
            duplicate = stats.duplicate,
            "level filled by rejection"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn d(c: char) -> Difficulty {
        Difficulty::new(c).unwrap()
    }

    fn link(name: &str, url: &str, diff: char) -> Link {
        Link { name: s!(name), url: s!(url), difficulty: Some(d(diff)) }
    }

    fn two_tunes() -> Catalog {
        Catalog::new(vec![
            Tune::new("A", vec![link("L1", "url1", '1'), link("L2", "url2", '2')]),
            Tune::new("B", vec![]),
        ])
    }

    fn rejection() -> SamplerOptions {
        SamplerOptions { strategy: Strategy::Rejection, ..SamplerOptions::default() }
    }

    #[test]
    fn two_tune_scenario_both_strategies() {
        let cat = two_tunes();
        let quota: Quota = "1=1,2=1".parse().unwrap();
        for opts in [SamplerOptions::default(), rejection()] {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let picks = sample_with(&cat, &quota, &mut rng, &opts).unwrap();
            assert_eq!(picks.len(), 2);
            assert_eq!(picks[0].link_url, "url1");
            assert_eq!(picks[0].difficulty, d('1'));
            assert_eq!(picks[1].link_url, "url2");
            assert_eq!(picks[1].difficulty, d('2'));
            assert!(picks.iter().all(|p| p.tune_name == "A"));
        }
    }

    #[test]
    fn insufficient_supply_fails_fast() {
        let cat = two_tunes();
        let quota: Quota = "1=2".parse().unwrap();
        for opts in [SamplerOptions::default(), rejection()] {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let err = sample_with(&cat, &quota, &mut rng, &opts).unwrap_err();
            assert_eq!(
                err,
                SampleError::InsufficientSupply { difficulty: d('1'), requested: 2, available: 1 }
            );
        }
    }

    #[test]
    fn shared_url_counts_once_across_levels() {
        // same URL tagged 1 in one tune and 2 in another
        let cat = Catalog::new(vec![
            Tune::new("A", vec![link("a", "shared", '1')]),
            Tune::new("B", vec![link("b", "shared", '2')]),
        ]);
        let quota: Quota = "1=1,2=1".parse().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = sample(&cat, &quota, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SampleError::InsufficientSupply { difficulty: d('2'), requested: 1, available: 0 }
        );
    }

    #[test]
    fn zero_count_and_empty_catalog() {
        let quota: Quota = "1=0".parse().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sample(&Catalog::default(), &quota, &mut rng).unwrap().is_empty());
        assert!(sample(&two_tunes(), &Quota::new(), &mut rng).unwrap().is_empty());

        let quota: Quota = "1=1".parse().unwrap();
        let err = sample_with(&Catalog::default(), &quota, &mut rng, &rejection()).unwrap_err();
        assert!(matches!(err, SampleError::InsufficientSupply { available: 0, .. }));
    }

    #[test]
    fn huge_quota_is_a_supply_error() {
        let cat = two_tunes();
        for text in [format!("1={}", usize::MAX), format!("2={},1=1", usize::MAX)] {
            let quota: Quota = text.parse().unwrap();
            for opts in [SamplerOptions::default(), rejection()] {
                let mut rng = ChaCha8Rng::seed_from_u64(9);
                let err = sample_with(&cat, &quota, &mut rng, &opts).unwrap_err();
                assert!(
                    matches!(err, SampleError::InsufficientSupply { requested: usize::MAX, available: 1, .. }),
                    "{text}: {err:?}"
                );
            }
        }
    }

    #[test]
    fn rejection_limit_is_reported() {
        // one eligible link hidden among many empty tunes; a limit of 1 cannot reach it reliably
        let mut tunes: Vec<Tune> = (0..50).map(|i| Tune::new(format!("T{i}"), vec![])).collect();
        tunes.push(Tune::new("X", vec![link("x", "ux", '1')]));
        let cat = Catalog::new(tunes);
        let quota: Quota = "1=1".parse().unwrap();
        let opts = SamplerOptions { strategy: Strategy::Rejection, max_consecutive_rejections: 1 };

        let mut failures = 0;
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match sample_with(&cat, &quota, &mut rng, &opts) {
                Err(SampleError::RetriesExhausted { attempts, picked, .. }) => {
                    assert_eq!(attempts, 1);
                    assert_eq!(picked, 0);
                    failures += 1;
                }
                Ok(picks) => assert_eq!(picks[0].link_url, "ux"),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let tunes = (0..20)
            .map(|i| {
                Tune::new(
                    format!("T{i}"),
                    (0..4)
                        .map(|j| {
                            let diff = char::from_digit(1 + (j % 3), 10).unwrap();
                            link(&format!("L{j}"), &format!("u{i}-{j}"), diff)
                        })
                        .collect(),
                )
            })
            .collect();
        let cat = Catalog::new(tunes);
        let quota: Quota = "1=10,2=5,3=3".parse().unwrap();

        for opts in [SamplerOptions::default(), rejection()] {
            let a = sample_with(&cat, &quota, &mut ChaCha8Rng::seed_from_u64(42), &opts).unwrap();
            let b = sample_with(&cat, &quota, &mut ChaCha8Rng::seed_from_u64(42), &opts).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.len(), 18);
        }
    }
}
