pub mod commands;
pub mod output;

use crate::bio::taxonomy::{
    Disambiguator, PromptDisambiguator, RejectAmbiguous, SelectionFile, TaxdumpFiles, TaxonId,
    Taxonomy,
};
use crate::core::config::Config;
use crate::core::selection::{resolve_query, Query};
use crate::utils::progress::spinner_or_hidden;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "taxforest",
    version,
    about = "Query the NCBI taxonomy: descendants, lineages and common ancestors",
    long_about = "taxforest loads nodes.dmp and names.dmp from an NCBI taxdump, builds the \
                  taxonomy tree in memory and answers descendant, lineage and common-ancestor \
                  queries. Ambiguous scientific names are resolved interactively or from a \
                  selections file, never by guessing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing nodes.dmp and names.dmp (plain or .gz)
    #[arg(long, global = true, env = "TAXFOREST_TAXDUMP_DIR", default_value = ".")]
    pub taxdump: PathBuf,

    /// Configuration file (defaults to ./taxforest.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Hide progress spinners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every descendant taxID of the taxa in a query file
    Descendants(commands::descendants::DescendantsArgs),

    /// Write filtered nodes.dmp / names.dmp holding only the queried subtrees
    Filter(commands::filter::FilterArgs),

    /// Show the lineage of a taxon up to the root
    Lineage(commands::lineage::LineageArgs),

    /// Find the lowest common ancestor of several taxa
    Lca(commands::lca::LcaArgs),

    /// Look up a scientific name
    Resolve(commands::resolve::ResolveArgs),

    /// Unpack nodes.dmp and names.dmp from taxdump.tar.gz
    Extract(commands::extract::ExtractArgs),

    /// Manage the configuration file
    Config(commands::config::ConfigArgs),
}

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub taxdump: PathBuf,
    pub quiet: bool,
}

impl Context {
    pub fn load_taxonomy(&self) -> anyhow::Result<Taxonomy> {
        let files = TaxdumpFiles::in_dir(&self.taxdump)?;
        let spinner = spinner_or_hidden(
            &format!("Loading taxonomy from {}", self.taxdump.display()),
            !self.quiet,
        );
        let taxonomy = Taxonomy::load_files(&files, &self.config.taxonomy)
            .with_context(|| format!("Failed to load taxonomy from {}", self.taxdump.display()));
        spinner.finish_and_clear();
        let taxonomy = taxonomy?;

        if !self.quiet {
            output::success(&format!(
                "Loaded {} taxa ({} names)",
                output::format_number(taxonomy.forest().len()),
                output::format_number(taxonomy.names().len())
            ));
        }
        Ok(taxonomy)
    }
}

/// Pick how homonyms get resolved: a selections file if given, a prompt when
/// attached to a terminal, otherwise refuse
pub fn make_disambiguator(selections: Option<&Path>) -> anyhow::Result<Box<dyn Disambiguator>> {
    if let Some(path) = selections {
        let file = SelectionFile::load(path)
            .with_context(|| format!("Failed to read selections from {}", path.display()))?;
        return Ok(Box::new(file));
    }
    if std::io::stdin().is_terminal() {
        Ok(Box::new(PromptDisambiguator::new()))
    } else {
        Ok(Box::new(RejectAmbiguous))
    }
}

/// Resolve a command-line taxon argument (taxID or name) to taxIDs
pub fn resolve_taxon_arg(
    taxonomy: &Taxonomy,
    arg: &str,
    numeric_as_id: bool,
    chooser: &mut dyn Disambiguator,
) -> anyhow::Result<Vec<TaxonId>> {
    let query = Query::parse(arg, numeric_as_id).ok_or(crate::TaxforestError::EmptyQuery)?;
    Ok(resolve_query(taxonomy, &query, chooser)?)
}
