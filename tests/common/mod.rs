//! Shared fixtures for the integration tests: a small taxdump written to a
//! temporary directory in NCBI's `\t|\t` layout.
#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use taxforest::bio::taxonomy::TaxdumpFiles;
use taxforest::core::config::TaxonomyConfig;
use taxforest::Taxonomy;
use tempfile::TempDir;

/// (taxID, parent taxID, division), children listed before their parents in
/// places so loading has to cope with forward references
pub const SAMPLE_NODES: &[(u32, u32, &str)] = &[
    (9606, 9605, "species"),
    (1, 1, "no rank"),
    (9605, 2759, "genus"),
    (131567, 1, "no rank"),
    (1423, 1386, "species"),
    (1396, 1386, "species"),
    (1386, 1239, "genus"),
    (1239, 2, "phylum"),
    (2, 131567, "superkingdom"),
    (2759, 131567, "superkingdom"),
    (6656, 2759, "phylum"),
    (55087, 6656, "genus"),
    (13132, 55087, "species"),
    (10239, 1, "superkingdom"),
];

/// (taxID, name, name class). "Bacillus" names both a bacterial genus and a
/// genus of stick insects.
pub const SAMPLE_NAMES: &[(u32, &str, &str)] = &[
    (1, "root", "scientific name"),
    (131567, "cellular organisms", "scientific name"),
    (2, "Bacteria", "scientific name"),
    (2, "eubacteria", "genbank common name"),
    (1239, "Bacillota", "scientific name"),
    (1239, "Firmicutes", "synonym"),
    (1386, "Bacillus", "scientific name"),
    (1423, "Bacillus subtilis", "scientific name"),
    (1396, "Bacillus cereus", "scientific name"),
    (2759, "Eukaryota", "scientific name"),
    (6656, "Arthropoda", "scientific name"),
    (55087, "Bacillus", "scientific name"),
    (13132, "Bacillus rossius", "scientific name"),
    (9605, "Homo", "scientific name"),
    (9606, "Homo sapiens", "scientific name"),
    (9606, "human", "genbank common name"),
    (10239, "Viruses", "scientific name"),
];

pub fn nodes_line(id: u32, parent: u32, division: &str) -> String {
    format!("{}\t|\t{}\t|\t{}\t|\t\t|\t0\t|\n", id, parent, division)
}

pub fn names_line(id: u32, name: &str, class: &str) -> String {
    format!("{}\t|\t{}\t|\t\t|\t{}\t|\n", id, name, class)
}

pub fn nodes_text(nodes: &[(u32, u32, &str)]) -> String {
    nodes
        .iter()
        .map(|(id, parent, division)| nodes_line(*id, *parent, division))
        .collect()
}

pub fn names_text(names: &[(u32, &str, &str)]) -> String {
    names
        .iter()
        .map(|(id, name, class)| names_line(*id, name, class))
        .collect()
}

/// A taxdump directory that lives as long as the fixture
pub struct TaxdumpFixture {
    dir: TempDir,
}

impl TaxdumpFixture {
    pub fn new(nodes: &[(u32, u32, &str)], names: &[(u32, &str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("nodes.dmp"), nodes_text(nodes)).unwrap();
        std::fs::write(dir.path().join("names.dmp"), names_text(names)).unwrap();
        Self { dir }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_NODES, SAMPLE_NAMES)
    }

    /// Same tables, gzip-compressed as `nodes.dmp.gz` / `names.dmp.gz`
    pub fn gzipped(nodes: &[(u32, u32, &str)], names: &[(u32, &str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_gz(&dir.path().join("nodes.dmp.gz"), &nodes_text(nodes));
        write_gz(&dir.path().join("names.dmp.gz"), &names_text(names));
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn files(&self) -> TaxdumpFiles {
        TaxdumpFiles::in_dir(self.path()).unwrap()
    }

    pub fn load(&self) -> Taxonomy {
        Taxonomy::load_files(&self.files(), &TaxonomyConfig::default()).unwrap()
    }
}

pub fn write_gz(path: &Path, contents: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Build a `taxdump.tar.gz` holding the given files
pub fn write_taxdump_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}
