use crate::bio::taxonomy::extract_taxdump;
use crate::cli::{output, Context};
use crate::utils::progress::spinner_or_hidden;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExtractArgs {
    /// taxdump.tar.gz archive downloaded from NCBI
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory (defaults to --taxdump)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, ctx: &Context) -> anyhow::Result<()> {
    let dest = args.out_dir.unwrap_or_else(|| ctx.taxdump.clone());
    let spinner = spinner_or_hidden(
        &format!("Extracting {}", args.archive.display()),
        !ctx.quiet,
    );
    let extracted = extract_taxdump(&args.archive, &dest);
    spinner.finish_and_clear();
    let files = extracted?;

    output::success(&format!("Extracted taxonomy dumps to {}", dest.display()));
    output::tree_item(false, "nodes", Some(&files.nodes.display().to_string()));
    output::tree_item(true, "names", Some(&files.names.display().to_string()));
    Ok(())
}
