use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use spaceport::{validate_mode, Config, ModeFlags};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod prompt;

#[derive(Parser, Debug)]
#[command(name = "spaceport")]
#[command(about = "Move Kibana saved objects between instances, space by space")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value_os_t = spaceport::config::default_config_path())]
    config: PathBuf,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Instance URL, e.g. http://localhost:5601
    #[arg(long, env = "SPACEPORT_URL")]
    pub url: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, env = "SPACEPORT_USERNAME")]
    pub username: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the spaces on an instance
    Spaces {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Export saved objects, one NDJSON bundle per space
    Export {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Directory to write bundles and the manifest to
        #[arg(short, long)]
        dir: PathBuf,

        /// Spaces to export (comma-separated, default: all)
        #[arg(short, long, value_delimiter = ',')]
        spaces: Vec<String>,

        /// Object types to export (comma-separated, default: all)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Also export every object referenced by an exported object
        #[arg(long)]
        include_references_deep: bool,

        /// Show what would be exported without exporting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Recreate spaces and import bundles from an export directory
    Import {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Directory holding the manifest and bundles
        #[arg(short, long)]
        dir: PathBuf,

        /// Spaces to import (comma-separated, default: all in the manifest)
        #[arg(short, long, value_delimiter = ',')]
        spaces: Vec<String>,

        /// Import every object under a new id; cannot be combined with
        /// --overwrite or --compatibility-mode
        #[arg(long)]
        create_new_copies: bool,

        /// Replace objects that already exist on the destination
        #[arg(long)]
        overwrite: bool,

        /// Apply compatibility adjustments to imported objects
        #[arg(long)]
        compatibility_mode: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_logging(config: &Config, level: Option<&str>, format: Option<&str>) {
    let level = level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format.unwrap_or(&config.logging.format) == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Conflict flags are checked before anything is read, prompted or sent.
    let mode = match &cli.command {
        Commands::Import {
            create_new_copies,
            overwrite,
            compatibility_mode,
            ..
        } => Some(validate_mode(ModeFlags {
            create_new_copies: *create_new_copies,
            overwrite: *overwrite,
            compatibility_mode: *compatibility_mode,
        })?),
        _ => None,
    };

    let config = Config::load_or_default(&cli.config)?;
    init_logging(&config, cli.log_level.as_deref(), cli.log_format.as_deref());

    match cli.command {
        Commands::Spaces { connection } => {
            commands::run_spaces(&config, &connection).await?;
        }
        Commands::Export {
            connection,
            dir,
            spaces,
            types,
            include_references_deep,
            dry_run,
        } => {
            let options = commands::ExportOptions {
                dir,
                spaces,
                types,
                include_references_deep,
                dry_run,
            };
            commands::run_export(&config, &connection, options).await?;
        }
        Commands::Import {
            connection,
            dir,
            spaces,
            yes,
            ..
        } => {
            // Validated before the config was loaded.
            let mode = mode.unwrap_or(spaceport::ConflictMode::Default);
            commands::run_import(&config, &connection, &dir, &spaces, mode, yes).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_lists_split_on_commas() {
        let cli = Cli::try_parse_from([
            "spaceport",
            "export",
            "--url",
            "http://localhost:5601",
            "-u",
            "elastic",
            "--dir",
            "out",
            "--spaces",
            "default,marketing",
            "--types",
            "dashboard",
        ])
        .unwrap();

        match cli.command {
            Commands::Export { spaces, types, dry_run, .. } => {
                assert_eq!(spaces, vec!["default", "marketing"]);
                assert_eq!(types, vec!["dashboard"]);
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_import_mode_flags() {
        let cli = Cli::try_parse_from([
            "spaceport",
            "import",
            "--dir",
            "out",
            "--create-new-copies",
            "--overwrite",
        ])
        .unwrap();

        match cli.command {
            Commands::Import {
                create_new_copies,
                overwrite,
                compatibility_mode,
                yes,
                ..
            } => {
                assert!(!yes);
                let err = validate_mode(ModeFlags {
                    create_new_copies,
                    overwrite,
                    compatibility_mode,
                })
                .unwrap_err();
                assert!(err.is_config());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
