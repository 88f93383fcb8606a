use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use super::model::{BusTable, Cell};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that abort a directory load. A missing directory or a directory
/// without CSV files is *not* an error; it yields [`BusTable::empty`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl LoadError {
    /// The file or directory the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Text encodings tried, in order, when parsing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Single-byte fallback: every byte value decodes to some character.
    Windows1252,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Windows1252 => write!(f, "Windows-1252"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every `.csv` file in `dir` and concatenate them into one table.
///
/// * `dir` missing, not a directory, or without CSV files → empty table.
/// * Files are read in file-name order; row order inside a file is kept.
/// * The first file that fails under both encodings aborts the load.
pub fn load_directory(dir: &Path) -> Result<BusTable, LoadError> {
    if !dir.is_dir() {
        log::warn!("Data directory {} does not exist", dir.display());
        return Ok(BusTable::empty());
    }

    let files = list_csv_files(dir)?;
    if files.is_empty() {
        log::warn!("No CSV files found in {}", dir.display());
        return Ok(BusTable::empty());
    }

    let tables = files
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let table = BusTable::concat(tables);
    log::info!(
        "Loaded {} rows from {} files in {} ({} columns)",
        table.len(),
        files.len(),
        dir.display(),
        table.columns().len()
    );
    Ok(table)
}

/// Load a single CSV file, retrying with the Windows-1252 fallback when the
/// UTF-8 attempt fails to decode or parse.
pub fn load_file(path: &Path) -> Result<BusTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (table, encoding) = match parse_bytes(&bytes, TextEncoding::Utf8) {
        Ok(table) => (table, TextEncoding::Utf8),
        Err(first) => {
            log::warn!(
                "{}: {first}; retrying as {}",
                path.display(),
                TextEncoding::Windows1252
            );
            let table = parse_bytes(&bytes, TextEncoding::Windows1252).map_err(|reason| {
                LoadError::Parse {
                    path: path.to_path_buf(),
                    reason,
                }
            })?;
            (table, TextEncoding::Windows1252)
        }
    };

    log::info!(
        "{}: {} rows, {} columns ({encoding})",
        path.display(),
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

/// Decode `bytes` with `encoding` and parse the text as a headed CSV table.
pub fn parse_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<BusTable, String> {
    let text = decode(bytes, encoding)?;
    parse_text(&text)
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !is_csv_name(&path) {
            continue;
        }
        if !path.is_file() {
            log::debug!("Skipping {}: not a regular file", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn is_csv_name(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

// ---------------------------------------------------------------------------
// Decoding + parsing
// ---------------------------------------------------------------------------

fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<Cow<'_, str>, String> {
    match encoding {
        TextEncoding::Utf8 => {
            let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
            std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| format!("invalid UTF-8: {e}"))
        }
        TextEncoding::Windows1252 => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            Ok(text)
        }
    }
}

/// The first record is the header. Short records are padded with missing
/// cells; a record wider than the header is rejected.
fn parse_text(text: &str) -> Result<BusTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| e.to_string())?,
        None => return Err("no columns to parse from file".to_string()),
    };
    let columns = header_names(header.iter());

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| e.to_string())?;
        if record.len() > columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(format!(
                "expected {} fields in line {line}, saw {}",
                columns.len(),
                record.len()
            ));
        }
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Ok(BusTable::new(columns, rows))
}

/// Name blank headers `Unnamed: <i>` and disambiguate duplicates with a
/// numeric suffix (`Price`, `Price.1`, ...).
fn header_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (i, h) in raw.enumerate() {
        let base = if h.is_empty() {
            format!("Unnamed: {i}")
        } else {
            h.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while names.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        names.push(name);
    }
    names
}
