use crate::cli::{make_disambiguator, resolve_taxon_arg, Context};
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct LineageArgs {
    /// TaxID or scientific name
    pub taxon: String,

    /// TOML file mapping ambiguous names to the chosen taxIDs
    #[arg(short, long, value_name = "FILE")]
    pub selections: Option<PathBuf>,

    /// Print only the taxIDs, one per line, from the taxon up to the root
    #[arg(long)]
    pub ids_only: bool,
}

pub fn run(args: LineageArgs, ctx: &Context) -> anyhow::Result<()> {
    let taxonomy = ctx.load_taxonomy()?;
    let mut chooser = make_disambiguator(args.selections.as_deref())?;
    let ids = resolve_taxon_arg(
        &taxonomy,
        &args.taxon,
        ctx.config.query.numeric_as_id,
        chooser.as_mut(),
    )?;

    for (n, id) in ids.iter().enumerate() {
        if args.ids_only {
            for ancestor in taxonomy.forest().genealogy(*id)? {
                println!("{}", ancestor);
            }
            continue;
        }

        if n > 0 {
            println!();
        }
        let lineage = taxonomy.lineage_names(*id)?;
        for (depth, (ancestor, name)) in lineage.iter().enumerate() {
            let division = taxonomy
                .forest()
                .try_get(*ancestor)
                .and_then(|node| taxonomy.forest().division_of(node))
                .unwrap_or("-");
            let indent = "  ".repeat(depth);
            let label = if depth + 1 == lineage.len() {
                name.bold().green().to_string()
            } else {
                name.to_string()
            };
            println!(
                "{}{} {} {}",
                indent,
                label,
                format!("[{}]", ancestor).dimmed(),
                division.dimmed()
            );
        }
    }
    Ok(())
}
