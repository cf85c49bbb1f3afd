// src/specs/catalog.rs
//! Reading spec for the tune list document.
//!
//! Shape:
//! ```text
//! <ol>                                 outer list, first <ol> in the document
//!   <li>Tune name                      one tune per direct <li>
//!     <ol>                             optional, first nested <ol>
//!       <li><a href="URL">Label</a> 2  one link per direct <li>
//!     </ol>
//!   </li>
//! </ol>
//! ```
//!
//! The tune name is the first non-empty line of the tune entry's own text
//! (text of nested lists excluded). A link label is read the same way and
//! split into name and difficulty by `core::label`.
//!
//! Blank lines are skipped, not taken as the name: an entry that opens with
//! `<br>` or an empty line is named by the first line that has text, and
//! only an entry with no text at all gets an empty name.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::{ElementRef, Html};
use thiserror::Error;

use crate::core::label::parse_label;
use crate::core::sanitize::first_line;
use crate::data::{Catalog, Link, Tune};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedCatalogError {
    #[error("no <ol> tune list found in the document")]
    MissingOuterList,

    #[error("tune {tune:?}: link entry #{position} has no <a href>")]
    MissingHref { tune: String, position: usize },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: MalformedCatalogError,
    },
}

pub fn load(path: &Path) -> Result<Catalog, LoadError> {
    let html = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let catalog = parse_document(&html)
        .map_err(|source| LoadError::Malformed { path: path.to_path_buf(), source })?;

    logf!(
        "Catalog: {} tunes, {} links from {}",
        catalog.len(),
        catalog.link_count(),
        path.display()
    );
    Ok(catalog)
}

pub fn parse_document(html: &str) -> Result<Catalog, MalformedCatalogError> {
    let doc = Html::parse_document(html);
    let outer = first_descendant(doc.root_element(), "ol")
        .ok_or(MalformedCatalogError::MissingOuterList)?;

    let mut tunes = Vec::new();
    for li in child_elements(outer, "li") {
        let name = first_line(&own_text(li));
        let links = match first_descendant(li, "ol") {
            Some(inner) => read_links(inner, &name)?,
            None => Vec::new(),
        };
        if links.is_empty() {
            logd!("Catalog: tune {name:?} has no links");
        }
        tunes.push(Tune::new(name, links));
    }

    Ok(Catalog::new(tunes))
}

fn read_links(inner: ElementRef<'_>, tune: &str) -> Result<Vec<Link>, MalformedCatalogError> {
    let mut links = Vec::new();

    for (i, li) in child_elements(inner, "li").enumerate() {
        let url = first_descendant(li, "a")
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| MalformedCatalogError::MissingHref { tune: s!(tune), position: i + 1 })?;

        let label = parse_label(&first_line(&own_text(li)));
        if label.difficulty.is_none() {
            logw!("Catalog: {tune:?} link {:?} has no difficulty marker", label.name);
        }

        links.push(Link { name: label.name, url: s!(url), difficulty: label.difficulty });
    }

    Ok(links)
}

/* ---------- helpers ---------- */

/// First element named `tag` strictly below `el`, in document order.
fn first_descendant<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == tag)
}

fn child_elements<'a>(el: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == tag)
}

/// Text of `el` without the text of nested lists.
fn own_text(el: ElementRef<'_>) -> String {
    let mut out = s!();
    collect_own_text(el, &mut out);
    out
}

fn collect_own_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(e) = ElementRef::wrap(child) {
            match e.value().name() {
                "ol" | "ul" => {}
                "br" => out.push('\n'),
                _ => collect_own_text(e, out),
            }
        }
    }
}
