mod script;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use folio_engine::config::{ConfigError, EditorConfig};
use folio_engine::engine::Engine;
use folio_engine::file::{FolioFile, LoadError};
use folio_engine::render::display_list;
use tracing::info;

use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("replay failed: {0}")]
    Script(#[from] ScriptError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Inspect and script .folio drawings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a drawing.
    Info { file: PathBuf },
    /// Replay a scripted input sequence and write the resulting drawing.
    Replay {
        /// Drawing to start from; an empty canvas when omitted.
        #[arg(long, env = "FOLIO_FILE")]
        file: Option<PathBuf>,
        /// JSON list of input steps.
        #[arg(long, env = "FOLIO_SCRIPT")]
        script: PathBuf,
        /// Output path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the display list of a drawing as JSON.
    Render {
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        selected: bool,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = EditorConfig::from_env()?;

    match cli.command {
        Command::Info { file } => info_cmd(&file),
        Command::Replay { file, script, out } => replay_cmd(config, file.as_deref(), &script, out.as_deref()),
        Command::Render { file, selected } => render_cmd(config, &file, selected),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}

fn load(path: &Path) -> Result<FolioFile, CliError> {
    let file = FolioFile::from_json(&read(path)?)?;
    info!(path = %path.display(), elements = file.elements.len(), "loaded");
    Ok(file)
}

fn info_cmd(path: &Path) -> Result<(), CliError> {
    let file = load(path)?;
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for el in &file.elements {
        *kinds.entry(el.kind.as_str()).or_default() += 1;
    }
    let groups = file.elements.iter().filter_map(|el| el.group).collect::<HashSet<_>>();
    println!("version:    {}", file.version);
    println!("background: {}", file.background);
    println!("grid:       {}", file.grid);
    println!("elements:   {}", file.elements.len());
    for (kind, count) in kinds {
        println!("  {kind:<8} {count}");
    }
    println!("groups:     {}", groups.len());
    println!("locked:     {}", file.elements.iter().filter(|el| el.locked).count());
    println!("assets:     {}", file.assets.len());
    Ok(())
}

fn replay_cmd(config: EditorConfig, file: Option<&Path>, script: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let mut engine = Engine::new(config);
    if let Some(path) = file {
        engine.load(load(path)?);
    }
    let steps = script::parse(&read(script)?)?;
    let summary = script::run(&mut engine, &steps)?;
    info!(history = engine.history.len(), created = summary.created, removed = summary.removed, "replayed");

    let rendered = engine.export().to_json()?;
    match out {
        Some(path) => {
            fs::write(path, rendered).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
            info!(path = %path.display(), "written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// With `selected`, the whole drawing is selected first so selection
/// chrome shows up in the output.
fn render_cmd(config: EditorConfig, path: &Path, selected: bool) -> Result<(), CliError> {
    let mut engine = Engine::new(config);
    engine.load(load(path)?);
    if selected {
        engine.select_all();
    }
    let paints = display_list(&engine.scene, &engine.ui, engine.text_measure());
    println!("{}", serde_json::to_string_pretty(&paints)?);
    Ok(())
}
