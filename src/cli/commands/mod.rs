pub mod config;
pub mod descendants;
pub mod extract;
pub mod filter;
pub mod lca;
pub mod lineage;
pub mod resolve;

use crate::core::selection::QuerySet;
use std::io::BufReader;
use std::path::Path;

/// Read queries from a file, or stdin when the path is `-`
pub(crate) fn read_queries(path: &Path, numeric_as_id: bool) -> anyhow::Result<QuerySet> {
    if path.as_os_str() == "-" {
        let stdin = std::io::stdin();
        return Ok(QuerySet::parse(BufReader::new(stdin.lock()), numeric_as_id)?);
    }
    Ok(QuerySet::from_file(path, numeric_as_id)?)
}
