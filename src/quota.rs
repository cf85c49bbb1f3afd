// src/quota.rs
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::data::{Difficulty, InvalidDifficulty};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuotaError {
    #[error(transparent)]
    Difficulty(#[from] InvalidDifficulty),

    #[error("quota entry {0:?} is not of the form <difficulty>=<count>")]
    MissingSeparator(String),

    #[error("quota entry {0:?} has an invalid count")]
    InvalidCount(String),

    #[error("difficulty {0} appears more than once in the quota")]
    Duplicate(Difficulty),
}

/// How many picks to draw per difficulty, in the order the caller gave them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quota {
    entries: Vec<(Difficulty, usize)>,
}

impl Quota {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level. Rejects a difficulty that is already present.
    pub fn insert(&mut self, d: Difficulty, count: usize) -> Result<(), QuotaError> {
        if self.get(d).is_some() {
            return Err(QuotaError::Duplicate(d));
        }
        self.entries.push((d, count));
        Ok(())
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, QuotaError>
    where
        I: IntoIterator<Item = (Difficulty, usize)>,
    {
        let mut q = Self::new();
        for (d, c) in pairs {
            q.insert(d, c)?;
        }
        Ok(q)
    }

    pub fn get(&self, d: Difficulty) -> Option<usize> {
        self.entries.iter().find(|(k, _)| *k == d).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of all counts, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.entries.iter().fold(0usize, |acc, (_, c)| acc.saturating_add(*c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"1=15, 2=7,3=3"`. Empty segments are skipped.
impl FromStr for Quota {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut q = Quota::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() { continue; }

            let (d, c) = part
                .split_once(['=', ':'])
                .ok_or_else(|| QuotaError::MissingSeparator(s!(part)))?;
            let d: Difficulty = d.parse()?;
            let c: usize = c
                .trim()
                .parse()
                .map_err(|_| QuotaError::InvalidCount(s!(part)))?;
            q.insert(d, c)?;
        }
        Ok(q)
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(|(d, c)| format!("{d}={c}")).collect();
        write!(f, "{}", parts.join(","))
    }
}
