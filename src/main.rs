use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use navboard::database::Database;
use navboard::managers::navigation_store::{NavigationStore, NavigationStoreTrait};
use navboard::services::import_service::{ImportRequest, ImportService};
use navboard::services::settings_engine::{data_dir, SettingsEngine, SettingsEngineTrait};
use navboard::types::settings::ImportSettings;

#[derive(Parser, Debug)]
#[command(
    name = "navboard",
    version,
    about = "Import browser bookmark exports into the navigation dashboard"
)]
struct Cli {
    /// Settings file (defaults to settings.json in $NAVBOARD_DATA_DIR)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database (defaults to the configured database_file in $NAVBOARD_DATA_DIR)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a Netscape bookmark HTML file
    Import(ImportArgs),
    /// Print menus with their sub-menus and card counts
    Menus,
}

#[derive(Args, Debug)]
struct ImportArgs {
    file: PathBuf,

    /// merge or replace
    #[arg(long, default_value = "merge")]
    mode: String,

    /// auto, menu:<id> or <id>
    #[arg(long, default_value = "auto")]
    target: String,

    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut engine = SettingsEngine::new(cli.config.map(|p| p.to_string_lossy().to_string()));
    let settings = engine.load().context("failed to load settings")?;
    let db_path = cli
        .db
        .unwrap_or_else(|| data_dir().join(&settings.database_file));
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    match cli.command {
        Commands::Import(args) => import(&db, &settings, args),
        Commands::Menus => menus(&db),
    }
}

fn import(db: &Database, settings: &ImportSettings, args: ImportArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let request = ImportRequest::new(bytes)
        .mode(&args.mode)
        .target(&args.target)
        .dry_run(args.dry_run);

    let service = ImportService::new(db.connection(), settings);
    match service.import(&request) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_response())?);
            Err(err).context("bookmark import rejected")
        }
    }
}

fn menus(db: &Database) -> Result<()> {
    let store = NavigationStore::new(db.connection());
    for menu in store.list_menus()? {
        let direct = store.list_cards(menu.id, None)?.len();
        println!("[{}] {} ({} cards)", menu.id, menu.name, direct);
        for sub in store.list_sub_menus(menu.id)? {
            let cards = store.list_cards(menu.id, Some(sub.id))?.len();
            println!("    [{}] {} ({} cards)", sub.id, sub.name, cards);
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
