use crate::bio::taxonomy::TaxdumpFiles;
use crate::cli::{make_disambiguator, output, Context};
use crate::core::filter::write_filtered_dumps;
use crate::core::selection::{select_descendants, SelectionOptions};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct FilterArgs {
    /// Query file: one taxID or scientific name per line ("-" for stdin)
    #[arg(value_name = "QUERIES")]
    pub queries: PathBuf,

    /// Directory for the filtered dumps
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Keep only taxa of this division code
    #[arg(short, long)]
    pub division: Option<String>,

    /// TOML file mapping ambiguous names to the chosen taxIDs
    #[arg(short, long, value_name = "FILE")]
    pub selections: Option<PathBuf>,

    /// Skip names missing from names.dmp instead of failing
    #[arg(long)]
    pub skip_unresolved: bool,
}

pub fn run(args: FilterArgs, ctx: &Context) -> anyhow::Result<()> {
    let queries = super::read_queries(&args.queries, ctx.config.query.numeric_as_id)?;
    if queries.is_empty() {
        anyhow::bail!(crate::TaxforestError::EmptyQuery);
    }

    let files = TaxdumpFiles::in_dir(&ctx.taxdump)?;
    let taxonomy = ctx.load_taxonomy()?;
    let mut chooser = make_disambiguator(args.selections.as_deref())?;
    let options = SelectionOptions {
        division: args.division.clone(),
        terminal_only: false,
        skip_unresolved: args.skip_unresolved || ctx.config.query.skip_unresolved,
    };
    let report = select_descendants(&taxonomy, &queries, chooser.as_mut(), &options)?;
    for skipped in &report.skipped {
        output::warning(&format!("Skipped '{}': {}", skipped.query, skipped.reason));
    }

    let summary = write_filtered_dumps(
        &files,
        &report.taxa,
        &args.out_dir,
        &ctx.config.taxonomy,
        &ctx.config.output,
    )?;

    output::section_header("Filtered taxonomy");
    output::tree_item(false, "Taxa selected", Some(&output::format_number(report.taxa.len())));
    output::tree_item(
        false,
        &summary.nodes_path.display().to_string(),
        Some(&format!("{} lines", output::format_number(summary.nodes_written))),
    );
    output::tree_item(
        true,
        &summary.names_path.display().to_string(),
        Some(&format!("{} lines", output::format_number(summary.names_written))),
    );
    Ok(())
}
