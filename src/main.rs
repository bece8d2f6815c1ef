//! Filevault CLI - import, browse and export files kept in a local vault

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use filevault::config::{self, VaultConfig};
use filevault::{FileVault, StoreGateway, StoreLocation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use filevault::output::{emit_error, emit_success, OutputMode};

#[derive(Parser)]
#[command(name = "filevault")]
#[command(version)]
#[command(about = "Local file vault - keep files in a single embedded store and get them back out")]
#[command(long_about = r#"
Filevault keeps arbitrary files in one local database:
  • Import files or whole directories
  • Browse, preview and read text files
  • Export single files or everything as a tar archive

Example usage:
  filevault init
  filevault import notes.txt photos/ --recursive
  filevault list
  filevault cat 3
  filevault export-all --out backup.tar
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the vault
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Import files into the vault
    Import {
        /// Files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Walk directories recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// List stored files, newest first
    List,

    /// Show metadata of one file
    Show {
        /// File id
        id: i64,
    },

    /// Print the text content of one file
    Cat {
        /// File id
        id: i64,
    },

    /// Describe how a file would be previewed
    Preview {
        /// File id
        id: i64,
    },

    /// Write one file back to disk
    Export {
        /// File id
        id: i64,

        /// Target directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Pack every stored file into a tar archive
    ExportAll {
        /// Archive path
        #[arg(short, long, default_value = filevault::archive::DEFAULT_ARCHIVE_NAME)]
        out: PathBuf,
    },

    /// Delete one file
    Delete {
        /// File id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every file
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show vault statistics
    Stats,

    /// Resolve a YouTube link to its embed URL
    Youtube {
        /// Watch, short or embed URL
        url: String,
    },

    /// Scratch text buffer kept beside the vault
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Replace the buffer with text or with a stored text file
    Save {
        /// Text to save
        #[arg(conflicts_with = "from", required_unless_present = "from")]
        text: Option<String>,

        /// Load the text content of this file id
        #[arg(long)]
        from: Option<i64>,
    },

    /// Print the buffer
    Show,

    /// Write the buffer to a .txt file
    Export {
        /// Target file
        #[arg(short, long, default_value = filevault::scratch::DEFAULT_EXPORT_NAME)]
        out: PathBuf,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Import { .. } => "import",
            Commands::List => "list",
            Commands::Show { .. } => "show",
            Commands::Cat { .. } => "cat",
            Commands::Preview { .. } => "preview",
            Commands::Export { .. } => "export",
            Commands::ExportAll { .. } => "export-all",
            Commands::Delete { .. } => "delete",
            Commands::Clear { .. } => "clear",
            Commands::Stats => "stats",
            Commands::Youtube { .. } => "youtube",
            Commands::Note { .. } => "note",
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout stays reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flag(cli.json);
    let command_name = cli.command.name();

    if let Err(e) = run(cli, mode).await {
        emit_error(mode, command_name, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))?;
    let vault_config = loaded.unwrap_or_default();

    let base = std::env::current_dir()?;
    let db_path = vault_config.database_path(cli.database.as_deref(), &base);
    let classifier = vault_config.classifier()?;
    tracing::debug!("Using database {}", db_path.display());

    let vault = FileVault::new(
        StoreGateway::new(StoreLocation::file(&db_path)),
        classifier,
    );
    let ctx = commands::Context {
        vault,
        db_path,
        mode,
    };

    match cli.command {
        Commands::Init { force } => {
            let to_write = VaultConfig {
                database: Some(ctx.db_path.to_string_lossy().to_string()),
                max_nul_ratio: Some(classifier.max_nul_ratio()),
            };
            commands::run_init(&ctx, &config_path, &to_write, force).await
        }
        Commands::Import { paths, recursive } => commands::run_import(&ctx, &paths, recursive).await,
        Commands::List => commands::run_list(&ctx).await,
        Commands::Show { id } => commands::run_show(&ctx, id).await,
        Commands::Cat { id } => commands::run_cat(&ctx, id).await,
        Commands::Preview { id } => commands::run_preview(&ctx, id).await,
        Commands::Export { id, out, force } => commands::run_export(&ctx, id, &out, force).await,
        Commands::ExportAll { out } => commands::run_export_all(&ctx, &out).await,
        Commands::Delete { id, yes } => commands::run_delete(&ctx, id, yes).await,
        Commands::Clear { yes } => commands::run_clear(&ctx, yes).await,
        Commands::Stats => commands::run_stats(&ctx).await,
        Commands::Youtube { url } => commands::run_youtube(&ctx, &url),
        Commands::Note { command } => commands::run_note(&ctx, command).await,
    }
}
