use clap::Parser;
use colored::*;
use std::process;
use taxforest::cli::{commands, Cli, Commands, Context};
use taxforest::core::config::{find_config, resolve_config};
use taxforest::TaxforestError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // TAXFOREST_LOG sets the default level; RUST_LOG takes precedence
    let log_level = match cli.verbose {
        0 => std::env::var("TAXFOREST_LOG").unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<TaxforestError>() {
            Some(TaxforestError::Config(_)) => 2,
            Some(TaxforestError::Io(_)) | Some(TaxforestError::NotFound(_)) => 3,
            Some(TaxforestError::MalformedRecord { .. })
            | Some(TaxforestError::ConflictingParent { .. })
            | Some(TaxforestError::ConflictingDivision { .. })
            | Some(TaxforestError::CycleDetected(_)) => 4,
            Some(TaxforestError::NameNotFound(_))
            | Some(TaxforestError::AmbiguousName { .. })
            | Some(TaxforestError::NoSelectionMade(_))
            | Some(TaxforestError::InvalidSelection { .. })
            | Some(TaxforestError::InvalidSelectionInput { .. })
            | Some(TaxforestError::IdentifierNotFound(_))
            | Some(TaxforestError::NoCommonAncestor)
            | Some(TaxforestError::EmptyQuery) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = taxforest::utils::parallel::configure_thread_pool(cli.threads)?;
    if cli.verbose > 0 {
        eprintln!("Using {} threads", num_threads);
    }

    let config_path = find_config(cli.config.as_deref());
    let config = resolve_config(cli.config.as_deref())?;
    let ctx = Context {
        config,
        config_path,
        taxdump: cli.taxdump,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Descendants(args) => commands::descendants::run(args, &ctx),
        Commands::Filter(args) => commands::filter::run(args, &ctx),
        Commands::Lineage(args) => commands::lineage::run(args, &ctx),
        Commands::Lca(args) => commands::lca::run(args, &ctx),
        Commands::Resolve(args) => commands::resolve::run(args, &ctx),
        Commands::Extract(args) => commands::extract::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    }
}
