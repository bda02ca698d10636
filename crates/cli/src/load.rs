//! File → raw rows. The engine owns no file formats; this is the row
//! extractor the CLI hands datasets through.

use std::path::{Path, PathBuf};

use tally_recon::{RawRow, RawValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: expected a JSON array of row objects")]
    NotAnArray { path: PathBuf },
    #[error("{path}: element {index} is not an object")]
    NotAnObject { path: PathBuf, index: usize },
    #[error("{path}: file appears to be empty (no data rows)")]
    Empty { path: PathBuf },
    #[error("{path}: unsupported file type (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    /// What the user can do about it, where there is something to say.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LoadError::UnsupportedFormat { .. } => {
                Some("export the data as .csv (with a header row) or .json")
            }
            LoadError::NotAnArray { .. } | LoadError::NotAnObject { .. } => {
                Some("JSON input must look like [{\"id\": \"1\", \"amount\": 10}, ...]")
            }
            LoadError::Empty { path } => match Format::from_path(path) {
                Some(Format::Json) => Some("the top-level JSON array needs at least one row object"),
                _ => Some("a CSV file needs a header row and at least one data row"),
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Load one dataset. Fails if the file yields no rows at all.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = match format {
        Format::Csv => parse_csv(path, &data)?,
        Format::Json => parse_json(path, &data)?,
    };

    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), ?format, rows = rows.len(), "loaded dataset");
    Ok(rows)
}

/// Header row gives column names; every cell stays a string. Only truly
/// empty lines are skipped: a line like `,` is a row of empty cells. Short
/// rows simply lack the trailing columns, extra cells past the header are
/// dropped.
pub fn parse_csv(path: &Path, data: &str) -> Result<Vec<RawRow>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(csv_err)?;

        let mut row = RawRow::new();
        for (name, value) in headers.iter().zip(record.iter()) {
            row.insert(name.to_string(), RawValue::String(value.to_string()));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// A top-level array whose elements are all objects.
pub fn parse_json(path: &Path, data: &str) -> Result<Vec<RawRow>, LoadError> {
    let value: RawValue = serde_json::from_str(data).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let RawValue::Array(items) = value else {
        return Err(LoadError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            RawValue::Object(row) => Ok(row),
            _ => Err(LoadError::NotAnObject {
                path: path.to_path_buf(),
                index,
            }),
        })
        .collect()
}

/// The name a dataset is reported under: its file name, or the path as given.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
