//! compdb CLI - Compilation databases for resolved build graphs.

mod colors;
mod generate;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "compdb")]
#[command(about = "Generate compile_commands.json from a resolved build graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a compilation database from a build graph manifest
    Generate {
        /// Path to the build graph manifest (.json)
        manifest: PathBuf,

        /// Source root (overrides the manifest's root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directory to write compile_commands.json to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Directory to link compile_commands.json into (overrides LINK_COMPDB_TO)
        #[arg(long)]
        link_to: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        debug: bool,

        /// Generate even when GEN_COMPDB is not set
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect an existing compilation database
    Show {
        /// Path to compile_commands.json
        database: PathBuf,

        /// Print the arguments for a single source file
        #[arg(long)]
        file: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format compdb-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(compdb_err) = err.downcast_ref::<compdb_core::Error>() {
            anyhow::anyhow!("{}", compdb_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Generate {
            manifest,
            root,
            output_dir,
            link_to,
            debug,
            force,
        } => {
            let options = generate::GenerateOptions {
                root,
                output_dir,
                link_to,
                debug,
                force,
            };
            generate::execute(&manifest, options).map_err(format_error)?;
        }

        Commands::Show { database, file } => {
            show::execute(&database, file.as_deref()).map_err(format_error)?;
        }
    }

    Ok(())
}
