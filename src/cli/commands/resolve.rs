use crate::bio::taxonomy::{Resolution, Taxonomy};
use crate::cli::{output, Context};
use clap::Args;
use comfy_table::Cell;

#[derive(Args)]
pub struct ResolveArgs {
    /// Scientific name to look up
    #[arg(required_unless_present = "homonyms")]
    pub name: Option<String>,

    /// List every scientific name shared by more than one taxon
    #[arg(long, conflicts_with = "name")]
    pub homonyms: bool,

    /// Output format (text, json); defaults to the configured format
    #[arg(long)]
    pub format: Option<String>,
}

pub fn run(args: ResolveArgs, ctx: &Context) -> anyhow::Result<()> {
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| ctx.config.output.format.clone());
    let taxonomy = ctx.load_taxonomy()?;

    if args.homonyms {
        return print_homonyms(&taxonomy, &format);
    }

    let name = args.name.as_deref().unwrap_or_default();
    let resolution = taxonomy.resolve(name)?;

    match (&resolution, format.as_str()) {
        (Resolution::Unique(id), "json") => {
            println!("{}", serde_json::json!({ "name": name, "ids": [id] }));
        }
        (Resolution::Unique(id), _) => {
            println!("{}\t{}", id, name);
        }
        (Resolution::Ambiguous { name, candidates }, "json") => {
            let ambiguity = taxonomy.ambiguity(name, candidates);
            println!("{}", serde_json::to_string_pretty(&ambiguity)?);
        }
        (Resolution::Ambiguous { name, candidates }, _) => {
            let ambiguity = taxonomy.ambiguity(name, candidates);
            output::warning(&format!(
                "'{}' is shared by {} taxa",
                name,
                ambiguity.candidates.len()
            ));
            let mut table = output::create_standard_table();
            table.set_header(vec![
                output::header_cell("TaxID"),
                output::header_cell("Division"),
                output::header_cell("Parent"),
            ]);
            for candidate in &ambiguity.candidates {
                table.add_row(vec![
                    Cell::new(candidate.id),
                    Cell::new(candidate.division.as_deref().unwrap_or("-")),
                    Cell::new(candidate.parent_name.as_deref().unwrap_or("-")),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn print_homonyms(taxonomy: &Taxonomy, format: &str) -> anyhow::Result<()> {
    let homonyms: Vec<(&str, &[crate::TaxonId])> = taxonomy.names().homonyms().collect();

    if format == "json" {
        let map: serde_json::Map<String, serde_json::Value> = homonyms
            .iter()
            .map(|(name, ids)| (name.to_string(), serde_json::json!(ids)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    let mut table = output::create_standard_table();
    table.set_header(vec![output::header_cell("Name"), output::header_cell("TaxIDs")]);
    for (name, ids) in &homonyms {
        let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        table.add_row(vec![Cell::new(name), Cell::new(ids.join(", "))]);
    }
    println!("{table}");
    output::info(&format!(
        "{} homonyms among {} names",
        output::format_number(homonyms.len()),
        output::format_number(taxonomy.names().distinct_names())
    ));
    Ok(())
}
