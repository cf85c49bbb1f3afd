// src/data.rs
//! In-memory shapes shared by the loader, the sampler and the exporter.
//!
//! `Catalog` is what the loader produces and the sampler reads; it is never
//! mutated after construction. `Pick` is what the sampler produces and the
//! exporter writes: an owned copy, so it never borrows from the catalog.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Skill level tag of a link.
///
/// One alphanumeric character. Quota keys and link markers are both parsed
/// into this type, so `"1"`, `" 1 "` and the integer `1` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Difficulty(char);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid difficulty {0:?}: expected a single letter or digit")]
pub struct InvalidDifficulty(pub String);

impl Difficulty {
    pub fn new(c: char) -> Result<Self, InvalidDifficulty> {
        if c.is_alphanumeric() {
            Ok(Self(c))
        } else {
            Err(InvalidDifficulty(c.to_string()))
        }
    }

    /// Integer levels as they appear in config files. Only `0..=9` fit.
    pub fn from_level(n: i64) -> Result<Self, InvalidDifficulty> {
        u32::try_from(n)
            .ok()
            .and_then(|n| char::from_digit(n, 10))
            .map(Self)
            .ok_or_else(|| InvalidDifficulty(n.to_string()))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl FromStr for Difficulty {
    type Err = InvalidDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c).map_err(|_| InvalidDifficulty(s!(s))),
            _ => Err(InvalidDifficulty(s!(s))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub url: String,
    pub difficulty: Option<Difficulty>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tune {
    pub name: String,
    /// May be empty; such a tune is kept but never yields a pick.
    pub links: Vec<Link>,
}

impl Tune {
    pub fn new(name: impl Into<String>, links: Vec<Link>) -> Self {
        Self { name: name.into(), links }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    tunes: Vec<Tune>,
}

impl Catalog {
    pub fn new(tunes: Vec<Tune>) -> Self {
        Self { tunes }
    }

    pub fn tunes(&self) -> &[Tune] {
        &self.tunes
    }

    pub fn len(&self) -> usize {
        self.tunes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tunes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tune> {
        self.tunes.iter()
    }

    pub fn link_count(&self) -> usize {
        self.tunes.iter().map(|t| t.links.len()).sum()
    }

    /// Links tagged `d`, one entry per URL (first occurrence in catalog order).
    pub fn tagged(&self, d: Difficulty) -> Vec<(&Tune, &Link)> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for tune in &self.tunes {
            for link in &tune.links {
                if link.difficulty == Some(d) && seen.insert(link.url.as_str()) {
                    out.push((tune, link));
                }
            }
        }
        out
    }

    /// Number of distinct URLs tagged `d` anywhere in the catalog.
    pub fn supply(&self, d: Difficulty) -> usize {
        self.tagged(d).len()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Tune;
    type IntoIter = std::slice::Iter<'a, Tune>;

    fn into_iter(self) -> Self::IntoIter {
        self.tunes.iter()
    }
}

/// One sampled row: a link plus the name of the tune that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pick {
    pub tune_name: String,
    pub link_name: String,
    pub link_url: String,
    pub difficulty: Difficulty,
}

impl Pick {
    pub const HEADERS: [&'static str; 4] = ["tune_name", "link_name", "link_url", "difficulty"];

    pub fn from_link(tune: &Tune, link: &Link, difficulty: Difficulty) -> Self {
        Self {
            tune_name: tune.name.clone(),
            link_name: link.name.clone(),
            link_url: link.url.clone(),
            difficulty,
        }
    }

    /// Flat row in `HEADERS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.tune_name.clone(),
            self.link_name.clone(),
            self.link_url.clone(),
            self.difficulty.to_string(),
        ]
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}) - {}",
            self.tune_name, self.link_name, self.difficulty, self.link_url
        )
    }
}
