//! Streaming reader for NCBI taxdump tables (`nodes.dmp`, `names.dmp`).
//!
//! # File Format
//! Fields are separated by `|` and padded with tab characters; lines end
//! with `\t|`. Tabs are stripped before splitting:
//! ```text
//! 9606	|	9605	|	species	|	HS	|	5	|	...	|
//! 9606	|	Homo sapiens	|		|	scientific name	|
//! ```
//! A line with too few fields means the dump is truncated or corrupt, and is
//! reported as [`TaxforestError::MalformedRecord`] rather than skipped.

use super::types::TaxonId;
use crate::{Result, TaxforestError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const NODES_FILE: &str = "nodes.dmp";
pub const NAMES_FILE: &str = "names.dmp";
pub const SCIENTIFIC_NAME: &str = "scientific name";

/// One row of `nodes.dmp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonRecord {
    pub id: TaxonId,
    pub parent_id: TaxonId,
    pub division: String,
}

impl TaxonRecord {
    pub fn new(id: u32, parent_id: u32, division: &str) -> Self {
        Self {
            id: TaxonId(id),
            parent_id: TaxonId(parent_id),
            division: division.to_string(),
        }
    }

    /// A record that names itself as parent marks a root
    pub fn is_root(&self) -> bool {
        self.id == self.parent_id
    }
}

/// One row of `names.dmp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub id: TaxonId,
    pub name: String,
    pub name_class: String,
}

impl NameRecord {
    pub fn new(id: u32, name: &str, name_class: &str) -> Self {
        Self {
            id: TaxonId(id),
            name: name.to_string(),
            name_class: name_class.to_string(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.name_class == class
    }

    pub fn is_scientific(&self) -> bool {
        self.has_class(SCIENTIFIC_NAME)
    }
}

/// A typed row that can be built from the fields of one dump line
pub trait DumpRow: Sized {
    /// Minimum number of `|`-separated fields a valid line carries
    const MIN_FIELDS: usize;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self>;
}

fn parse_id(field: &str, what: &str, line: usize) -> Result<TaxonId> {
    field.parse().map_err(|_| TaxforestError::MalformedRecord {
        line,
        reason: format!("invalid {}: '{}'", what, field),
    })
}

impl DumpRow for TaxonRecord {
    const MIN_FIELDS: usize = 3;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self> {
        Ok(Self {
            id: parse_id(fields[0], "tax_id", line)?,
            parent_id: parse_id(fields[1], "parent tax_id", line)?,
            division: fields[2].to_string(),
        })
    }
}

impl DumpRow for NameRecord {
    const MIN_FIELDS: usize = 4;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self> {
        Ok(Self {
            id: parse_id(fields[0], "tax_id", line)?,
            name: fields[1].to_string(),
            name_class: fields[3].to_string(),
        })
    }
}

/// Lazy, line-at-a-time reader over a dump table
///
/// Stops after the first error; reopen the source to restart.
pub struct DumpReader<R, T> {
    reader: R,
    raw: String,
    cleaned: String,
    line: usize,
    done: bool,
    _row: PhantomData<T>,
}

pub type NodeReader<R> = DumpReader<R, TaxonRecord>;
pub type NameReader<R> = DumpReader<R, NameRecord>;

impl<R: BufRead, T: DumpRow> DumpReader<R, T> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            raw: String::new(),
            cleaned: String::new(),
            line: 0,
            done: false,
            _row: PhantomData,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// The line the last row was parsed from, exactly as read
    pub fn raw_line(&self) -> &str {
        &self.raw
    }

    fn next_row(&mut self) -> Option<Result<T>> {
        loop {
            self.raw.clear();
            match self.reader.read_line(&mut self.raw) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let trimmed = self.raw.trim_end_matches(['\n', '\r']);
            if trimmed.is_empty() {
                continue;
            }

            self.cleaned.clear();
            self.cleaned.extend(trimmed.chars().filter(|&c| c != '\t'));

            let fields: Vec<&str> = self.cleaned.split('|').collect();
            if fields.len() < T::MIN_FIELDS {
                return Some(Err(TaxforestError::MalformedRecord {
                    line: self.line,
                    reason: format!(
                        "expected at least {} fields, got {}",
                        T::MIN_FIELDS,
                        fields.len()
                    ),
                }));
            }

            return Some(T::from_fields(&fields, self.line));
        }
    }
}

impl<R: BufRead, T: DumpRow> Iterator for DumpReader<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_row();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Open a dump table for reading, decompressing `*.gz` files on the fly
pub fn open_dump<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TaxforestError::NotFound(path.display().to_string()),
        _ => TaxforestError::Io(e),
    })?;
    debug!("Opened dump {}", path.display());

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_nodes<P: AsRef<Path>>(path: P) -> Result<NodeReader<Box<dyn BufRead>>> {
    Ok(DumpReader::new(open_dump(path)?))
}

pub fn read_names<P: AsRef<Path>>(path: P) -> Result<NameReader<Box<dyn BufRead>>> {
    Ok(DumpReader::new(open_dump(path)?))
}

/// Location of the two taxdump tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxdumpFiles {
    pub nodes: PathBuf,
    pub names: PathBuf,
}

impl TaxdumpFiles {
    /// Look up `nodes.dmp` / `names.dmp` in `dir`, falling back to `.gz` copies
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            nodes: locate(dir, NODES_FILE)?,
            names: locate(dir, NAMES_FILE)?,
        })
    }
}

fn locate(dir: &Path, file: &str) -> Result<PathBuf> {
    let plain = dir.join(file);
    if plain.exists() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{}.gz", file));
    if gz.exists() {
        return Ok(gz);
    }
    Err(TaxforestError::NotFound(format!(
        "{} (looked in {})",
        file,
        dir.display()
    )))
}

/// Unpack `nodes.dmp` and `names.dmp` from a `taxdump.tar.gz` archive into `dest`
pub fn extract_taxdump<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, dest: Q) -> Result<TaxdumpFiles> {
    use tar::Archive;

    let archive_path = archive.as_ref();
    let dest = dest.as_ref();
    std::fs::create_dir_all(dest)?;

    let file = File::open(archive_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            TaxforestError::NotFound(archive_path.display().to_string())
        }
        _ => TaxforestError::Io(e),
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut found_nodes = false;
    let mut found_names = false;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let file_name = entry
            .path()?
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned);

        match file_name.as_deref() {
            Some(NODES_FILE) => {
                entry.unpack(dest.join(NODES_FILE))?;
                found_nodes = true;
            }
            Some(NAMES_FILE) => {
                entry.unpack(dest.join(NAMES_FILE))?;
                found_names = true;
            }
            _ => {}
        }
    }

    if !found_nodes || !found_names {
        return Err(TaxforestError::NotFound(format!(
            "{} and {} in {}",
            NODES_FILE,
            NAMES_FILE,
            archive_path.display()
        )));
    }
    debug!("Extracted taxdump into {}", dest.display());

    Ok(TaxdumpFiles {
        nodes: dest.join(NODES_FILE),
        names: dest.join(NAMES_FILE),
    })
}
