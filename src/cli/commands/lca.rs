use crate::cli::{make_disambiguator, output, resolve_taxon_arg, Context};
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct LcaArgs {
    /// TaxIDs or scientific names
    #[arg(required = true, num_args = 1..)]
    pub taxa: Vec<String>,

    /// TOML file mapping ambiguous names to the chosen taxIDs
    #[arg(short, long, value_name = "FILE")]
    pub selections: Option<PathBuf>,
}

pub fn run(args: LcaArgs, ctx: &Context) -> anyhow::Result<()> {
    let taxonomy = ctx.load_taxonomy()?;
    let mut chooser = make_disambiguator(args.selections.as_deref())?;

    let mut ids = Vec::new();
    for taxon in &args.taxa {
        ids.extend(resolve_taxon_arg(
            &taxonomy,
            taxon,
            ctx.config.query.numeric_as_id,
            chooser.as_mut(),
        )?);
    }

    let lca = taxonomy.forest().lowest_common_ancestor(&ids)?;
    if !ctx.quiet {
        output::info(&format!(
            "Lowest common ancestor of {} taxa",
            output::format_number(ids.len())
        ));
    }
    println!("{}\t{}", lca, taxonomy.name_of(lca).bold());
    Ok(())
}
