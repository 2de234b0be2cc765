use crate::cli::{output, Context};
use crate::core::config::{default_config, save_config};
use crate::core::paths;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default settings
    Init {
        /// Where to write it (defaults to the user config directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

pub fn run(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(paths::user_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            save_config(&path, &default_config())?;
            output::success(&format!("Wrote default configuration to {}", path.display()));
        }
        ConfigCommands::Show => {
            match &ctx.config_path {
                Some(path) => output::info(&format!("Using {}", path.display())),
                None => output::info("Using built-in defaults"),
            }
            print!("{}", toml::to_string_pretty(&ctx.config)?);
        }
    }
    Ok(())
}
