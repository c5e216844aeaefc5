//! The `packsmith` binary: the terminal editor, plus a headless `export` subcommand

use packsmith::config::Config;
use packsmith::core::Path;
use packsmith::editor::{Editor, Tui};
use packsmith::locale::Locales;
use packsmith::prefs::Preferences;
use packsmith::registry::ModelRegistry;
use packsmith::session::SessionBuilder;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

/// Edit data pack JSON files
#[derive(Debug, Parser)]
#[command(name = "packsmith", version, about)]
struct Args {
    /// The path to open, e.g. `/predicate`.  Unknown kinds open the default kind.
    #[arg(long, default_value = "/")]
    path: String,
    /// The interface language
    #[arg(long)]
    locale: Option<String>,
    /// A JSON file to load into the initial document
    #[arg(long)]
    open: Option<PathBuf>,
    /// Where the theme preference is stored
    #[arg(long)]
    prefs: Option<PathBuf>,
    /// Where 'download' writes the active document
    #[arg(long, default_value = "data.json")]
    download: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a document in canonical form, without starting the editor
    Export {
        /// The kind of document, e.g. `loot-table`
        kind: String,
        /// The JSON file to read.  The kind's default document is used if this is omitted.
        file: Option<PathBuf>,
    },
}

fn read_json(path: &std::path::Path) -> anyhow::Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("{:?} is not valid JSON", path))
}

/// Runs the `export` subcommand
fn export(kind: &str, file: Option<PathBuf>) -> anyhow::Result<()> {
    let mut session = SessionBuilder::new(ModelRegistry::with_builtin_kinds(1), Locales::bundled()?)
        .start(kind)?;
    if let Some(path) = file {
        session.set_active(&Path::root(), read_json(&path)?)?;
    }
    let model = session.active_model();
    for problem in model.schema().validate(&model.value()) {
        log::warn!("{}", problem);
    }
    print!("{}", session.export_active()?);
    Ok(())
}

/// The entry point of packsmith.
///
/// The main function is tasked with initialising everything, then passing control to
/// [`Tui::run`].
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::Export { kind, file }) = args.command {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Info)
            .init();
        return export(&kind, file);
    }

    // Initialise the logging and startup
    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Debug);
    log::info!("Starting up...");

    let mut config = Config {
        download_path: args.download,
        ..Config::default()
    };
    if let Some(prefs) = args.prefs {
        config.prefs_path = prefs;
    }
    let prefs = Preferences::load(&config.prefs_path)?;
    let mut locales = Locales::bundled()?;
    if let Some(code) = &args.locale {
        locales.set_language(code)?;
    }

    let mut editor = Editor::new(config, locales, prefs, &args.path)?;
    if let Some(path) = &args.open {
        editor.set(&Path::root(), read_json(path)?)?;
    }
    Tui::new(editor)?.run()
}
