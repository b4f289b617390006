use anyhow::Result;
use clap::{Parser, Subcommand};
use migrate::{commands, load_config, logging};
use migration_config::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "migrate")]
#[command(about = "Model migration - export a model's state as a snapshot")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the model to a snapshot file
    Export {
        /// Output file (standard output if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json or yaml
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Record missing instance data, agent binaries and relation scope instead of failing
        #[arg(long)]
        ignore_incomplete: bool,
    },

    /// Export the model and print entity counts
    Summary,

    /// Validate configuration file
    Validate,

    /// Write a small demonstration model into the configured store
    SeedDemo,
}

fn main() -> Result<()> {
    smol::block_on(async {
        let cli = Cli::parse();
        let mut config = load_config(cli.config.as_deref())?;

        let level = cli
            .log_level
            .clone()
            .or_else(|| config.settings.log_level.clone())
            .unwrap_or_else(|| logging::DEFAULT_LOG_LEVEL.to_string());
        logging::init(&level);

        match cli.command {
            Commands::Export {
                output,
                format,
                ignore_incomplete,
            } => {
                if ignore_incomplete {
                    config.export.ignore_incomplete_model = true;
                }
                commands::export::run(&config, output.as_deref(), format).await
            }
            Commands::Summary => commands::summary::run(&config).await,
            Commands::Validate => commands::validate::run(cli.config.as_deref(), &config),
            Commands::SeedDemo => commands::seed_demo::run(&config).await,
        }
    })
}
