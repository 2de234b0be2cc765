//! Write the original dump lines of selected taxa into filtered copies of
//! nodes.dmp / names.dmp.
//!
//! Input lines go through the same reader as the forest build, so a
//! truncated line fails with
//! [`MalformedRecord`](crate::TaxforestError::MalformedRecord) instead of
//! being copied. Output is ordered by taxID; lines sharing a taxID keep
//! their dump order.
use crate::bio::taxonomy::records::{open_dump, DumpReader, DumpRow, TaxdumpFiles};
use crate::bio::taxonomy::{NameRecord, TaxonId, TaxonRecord};
use crate::core::config::{OutputConfig, TaxonomyConfig};
use crate::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub nodes_path: PathBuf,
    pub names_path: PathBuf,
    pub nodes_written: usize,
    pub names_written: usize,
}

/// Copy every node line, and every scientific-name line, whose taxID is in
/// `selected`. Line formatting is kept byte for byte.
pub fn write_filtered_dumps(
    input: &TaxdumpFiles,
    selected: &[TaxonId],
    out_dir: &Path,
    taxonomy: &TaxonomyConfig,
    output: &OutputConfig,
) -> Result<FilterSummary> {
    std::fs::create_dir_all(out_dir)?;
    let selected: HashSet<TaxonId> = selected.iter().copied().collect();

    let nodes = select_lines(open_dump(&input.nodes)?, |record: &TaxonRecord| {
        selected.contains(&record.id).then_some(record.id)
    })?;
    let nodes_path = out_dir.join(&output.nodes_file);
    let nodes_written = write_lines(&nodes_path, nodes)?;

    let class = taxonomy.scientific_name_class.as_str();
    let names = select_lines(open_dump(&input.names)?, |record: &NameRecord| {
        (record.has_class(class) && selected.contains(&record.id)).then_some(record.id)
    })?;
    let names_path = out_dir.join(&output.names_file);
    let names_written = write_lines(&names_path, names)?;

    info!(
        "Wrote {} node lines to {} and {} name lines to {}",
        nodes_written,
        nodes_path.display(),
        names_written,
        names_path.display()
    );

    Ok(FilterSummary {
        nodes_path,
        names_path,
        nodes_written,
        names_written,
    })
}

/// Raw lines of the rows `keep` maps to a taxID, sorted by that taxID
fn select_lines<R, T, F>(reader: R, mut keep: F) -> Result<Vec<String>>
where
    R: BufRead,
    T: DumpRow,
    F: FnMut(&T) -> Option<TaxonId>,
{
    let mut rows: DumpReader<R, T> = DumpReader::new(reader);
    let mut kept: Vec<(TaxonId, String)> = Vec::new();

    while let Some(row) = rows.next() {
        if let Some(id) = keep(&row?) {
            let mut line = rows.raw_line().to_string();
            if !line.ends_with('\n') {
                line.push('\n');
            }
            kept.push((id, line));
        }
    }

    kept.sort_by_key(|(id, _)| *id);
    Ok(kept.into_iter().map(|(_, line)| line).collect())
}

fn write_lines(dest: &Path, lines: Vec<String>) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(dest)?);
    for line in &lines {
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(lines.len())
}
