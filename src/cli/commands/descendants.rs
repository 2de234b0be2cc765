use crate::cli::{make_disambiguator, output, Context};
use crate::core::selection::{select_descendants, SelectionOptions, SelectionReport};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct DescendantsArgs {
    /// Query file: one taxID or scientific name per line ("-" for stdin)
    #[arg(value_name = "QUERIES")]
    pub queries: PathBuf,

    /// Keep only taxa of this division code
    #[arg(short, long)]
    pub division: Option<String>,

    /// Keep only terminal taxa (no children)
    #[arg(short, long)]
    pub terminal: bool,

    /// TOML file mapping ambiguous names to the chosen taxIDs
    #[arg(short, long, value_name = "FILE")]
    pub selections: Option<PathBuf>,

    /// Skip names missing from names.dmp instead of failing
    #[arg(long)]
    pub skip_unresolved: bool,

    /// Output format (text, json); defaults to the configured format
    #[arg(long)]
    pub format: Option<String>,

    /// Write results here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: DescendantsArgs, ctx: &Context) -> anyhow::Result<()> {
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| ctx.config.output.format.clone());
    if !matches!(format.as_str(), "text" | "json") {
        anyhow::bail!("Unknown output format: {}", format);
    }

    let queries = super::read_queries(&args.queries, ctx.config.query.numeric_as_id)?;
    if queries.is_empty() {
        anyhow::bail!(crate::TaxforestError::EmptyQuery);
    }

    let taxonomy = ctx.load_taxonomy()?;
    let mut chooser = make_disambiguator(args.selections.as_deref())?;
    let options = SelectionOptions {
        division: args.division.clone(),
        terminal_only: args.terminal,
        skip_unresolved: args.skip_unresolved || ctx.config.query.skip_unresolved,
    };

    let report = select_descendants(&taxonomy, &queries, chooser.as_mut(), &options)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    match format.as_str() {
        "json" => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        _ => {
            for id in &report.taxa {
                writeln!(out, "{}", id)?;
            }
        }
    }
    out.flush()?;

    if !ctx.quiet {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &SelectionReport) {
    for skipped in &report.skipped {
        output::warning(&format!("Skipped '{}': {}", skipped.query, skipped.reason));
    }
    output::success(&format!(
        "{} queries resolved, {} taxa selected",
        report.resolved.len(),
        output::format_number(report.taxa.len())
    ));
}
