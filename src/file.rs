// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::config::consts::{DEFAULT_EXPORT_STEM, TIMESTAMP_FORMAT};
use crate::config::options::ExportOptions;
use crate::core::sanitize::sanitize_file_stem;
use crate::csv::write_table;
use crate::data::Pick;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("could not write export {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write workbook {path}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io { path: path.to_path_buf(), source }
}

/// Write `picks` as one table. Returns the final path written to.
pub fn export(picks: &[Pick], export: &ExportOptions) -> Result<PathBuf, ExportError> {
    export_at(picks, export, Local::now().naive_local())
}

/// Same as [`export`] with the clock supplied by the caller.
pub fn export_at(
    picks: &[Pick],
    export: &ExportOptions,
    now: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let path = out_path(export, now)?;

    logf!("Export: Begin rows={}, path={}", picks.len(), path.display());

    let rows: Vec<Vec<String>> = picks.iter().map(Pick::to_row).collect();
    match export.format.delim() {
        Some(sep) => write_delimited(&path, &rows, sep)?,
        None => write_workbook(&path, &rows)?,
    }

    logf!("Export: OK {}", path.display());
    Ok(path)
}

/// Destination of an export at `now`, with its parent directory created.
///
/// The explicit `out_file` is used as is (an existing file is overwritten).
/// Otherwise `<out_dir>/<stem>_<timestamp>.<ext>` with a sanitized stem,
/// numbered when that name is taken.
pub fn out_path(export: &ExportOptions, now: NaiveDateTime) -> Result<PathBuf, ExportError> {
    let path = match &export.out_file {
        Some(p) => p.clone(),
        None => {
            ensure_directory(&export.out_dir)?;
            let stem = sanitize_file_stem(&export.stem, DEFAULT_EXPORT_STEM);
            let stem = join!(&stem, "_", &timestamp(now));
            resolve_unique_filename(&export.out_dir, &stem, export.format.ext())
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(path)
}

fn write_delimited(path: &Path, rows: &[Vec<String>], sep: char) -> Result<(), ExportError> {
    let file = File::create(path).map_err(io_err(path))?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_table(&mut out, &Pick::HEADERS, rows, sep).map_err(io_err(path))?;
    out.flush().map_err(io_err(path))
}

/// One sheet: bold header row, then one row per pick, all cells as text.
fn write_workbook(path: &Path, rows: &[Vec<String>]) -> Result<(), ExportError> {
    let xlsx_err = |source| ExportError::Xlsx { path: path.to_path_buf(), source };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (c, h) in Pick::HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, cell_col(c), *h, &bold).map_err(xlsx_err)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r + 1).unwrap_or(u32::MAX);
        for (c, cell) in row.iter().enumerate() {
            sheet.write_string(r, cell_col(c), cell).map_err(xlsx_err)?;
        }
    }

    workbook.save(path).map_err(xlsx_err)
}

fn cell_col(c: usize) -> u16 {
    u16::try_from(c).unwrap_or(u16::MAX)
}

/// ISO 8601 local time with `:` swapped for `-`, safe in file names everywhere.
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.as_os_str().is_empty() { return Ok(()); }
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() { fs::create_dir_all(dir).map_err(io_err(dir))?; }
    Ok(())
}

/// `<stem>.ext`, or `<stem> (N).ext` with N from 2 when earlier runs left that name behind.
pub fn resolve_unique_filename(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.{ext}"));
    if !first.exists() {
        return first;
    }
    (2usize..)
        .map(|n| dir.join(format!("{stem} ({n}).{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::ExportFormat;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(12, 30, 5, 250)
            .unwrap()
    }

    #[test]
    fn timestamp_has_no_colons() {
        assert_eq!(timestamp(noon()), "2024-03-09T12-30-05.000250");
    }

    #[test]
    fn unique_filename_counts_up() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = resolve_unique_filename(dir.path(), "run", "csv");
        assert_eq!(p1, dir.path().join("run.csv"));
        fs::write(&p1, "").unwrap();

        let p2 = resolve_unique_filename(dir.path(), "run", "csv");
        assert_eq!(p2, dir.path().join("run (2).csv"));
        fs::write(&p2, "").unwrap();

        assert_eq!(resolve_unique_filename(dir.path(), "run", "csv"), dir.path().join("run (3).csv"));
    }

    #[test]
    fn out_path_sanitizes_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let export = ExportOptions {
            format: ExportFormat::Tsv,
            out_dir: dir.path().join("nested"),
            stem: s!("weekly: set?"),
            out_file: None,
        };
        let first = out_path(&export, noon()).unwrap();
        assert!(dir.path().join("nested").is_dir());
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(!name.contains(':') && !name.contains('?'), "{name}");
        assert!(name.ends_with("_2024-03-09T12-30-05.000250.tsv"), "{name}");

        fs::write(&first, "").unwrap();
        let second = out_path(&export, noon()).unwrap();
        assert!(second.to_string_lossy().ends_with("_2024-03-09T12-30-05.000250 (2).tsv"));

        let blank = ExportOptions { stem: s!("   "), ..export.clone() };
        let p = out_path(&blank, noon()).unwrap();
        assert!(p.file_name().unwrap().to_string_lossy().starts_with(DEFAULT_EXPORT_STEM));

        let fixed = ExportOptions { out_file: Some(dir.path().join("x").join("picks.csv")), ..export };
        assert_eq!(out_path(&fixed, noon()).unwrap(), dir.path().join("x").join("picks.csv"));
        assert!(dir.path().join("x").is_dir());
    }

    #[test]
    fn workbook_is_a_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picks.xlsx");
        let rows = vec![vec![s!("Tune"), s!("Score"), s!("http://x"), s!("1")]];
        write_workbook(&path, &rows).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("plain");
        fs::write(&f, "x").unwrap();
        assert!(matches!(ensure_directory(&f), Err(ExportError::NotADirectory(_))));

        let nested = dir.path().join("a").join("b");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
