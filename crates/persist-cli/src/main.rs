//! `persist` CLI: inspect and edit binary save files from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # JSON to a binary save file
//! persist encode -i hero.json -o Saves/hero.save
//!
//! # Binary save file to pretty-printed JSON (stdin → stdout)
//! cat Saves/hero.save | persist decode
//!
//! # Read one node
//! persist get -i Saves/hero.save inventory[1]
//!
//! # Overwrite one node in place (the value is JSON)
//! persist set -i Saves/hero.save position '{"x":1.0,"y":5.0,"z":3.0}'
//!
//! # List save files (PERSIST_DIR / PERSIST_EXTENSION, or flags)
//! persist list --dir Saves
//! ```
//!
//! Set `RUST_LOG=persist_core=debug` to trace codec and file operations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use persist_core::{LocalAdapter, LocalAdapterConfig, Path, Persistence, State};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "persist", version, about = "Inspect and edit persist save files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document into a binary save file
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output save file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a binary save file into pretty-printed JSON
    Decode {
        /// Input save file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the node at a path as JSON
    Get {
        /// Input save file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Path to read, e.g. `inventory[1].name`; empty for the root
        #[arg(default_value = "")]
        path: String,
    },
    /// Replace the node at a path with a JSON value
    Set {
        /// Input save file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output save file (defaults to the input file, or stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Path to write, e.g. `position.y`
        path: String,
        /// New value as JSON, e.g. `5`, `"text"`, `[1,2]`
        value: String,
    },
    /// List save files in a directory
    List {
        /// Save directory (overrides PERSIST_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Save file extension (overrides PERSIST_EXTENSION)
        #[arg(long)]
        extension: Option<String>,
        /// Only list files whose path starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output } => {
            let json = String::from_utf8(read_input(input.as_ref())?)
                .context("Input is not valid UTF-8")?;
            let state = persist_core::from_json_str(&json).context("Failed to parse JSON input")?;
            let bytes = persist_core::encode(&state).context("Failed to encode state")?;
            write_output(output.as_ref(), &bytes)?;
        }
        Commands::Decode { input, output } => {
            let state = read_state(input.as_ref())?;
            write_output(output.as_ref(), render_json(&state)?.as_bytes())?;
        }
        Commands::Get { input, path } => {
            let state = read_state(input.as_ref())?;
            let path = Path::parse(&path).context("Invalid path")?;
            let node = path
                .get(&state)
                .with_context(|| format!("Failed to read '{path}'"))?;
            write_output(None, render_json(&node)?.as_bytes())?;
        }
        Commands::Set {
            input,
            output,
            path,
            value,
        } => {
            let mut state = read_state(input.as_ref())?;
            let path = Path::parse(&path).context("Invalid path")?;
            let value =
                persist_core::from_json_str(&value).context("Failed to parse JSON value")?;
            path.set(&mut state, value)
                .with_context(|| format!("Failed to write '{path}'"))?;
            let bytes = persist_core::encode(&state).context("Failed to encode state")?;
            write_output(output.as_ref().or(input.as_ref()), &bytes)?;
        }
        Commands::List {
            dir,
            extension,
            prefix,
        } => {
            let mut config = LocalAdapterConfig::from_env();
            if let Some(dir) = dir {
                config = config.with_directory(dir);
            }
            if let Some(extension) = extension {
                config = config.with_extension(extension);
            }
            let directory = config.directory.clone();
            let persistence = Persistence::new().with_adapter(LocalAdapter::new(config));
            let prefix = prefix.unwrap_or_default();
            tracing::debug!(directory = %directory.display(), prefix = %prefix, "listing save files");
            let files = persistence
                .list(|path| path.starts_with(&prefix))
                .with_context(|| format!("Failed to list {}", directory.display()))?;
            let mut listing = String::new();
            for file in files {
                listing.push_str(&file.path);
                listing.push('\n');
            }
            write_output(None, listing.as_bytes())?;
        }
    }

    Ok(())
}

fn read_state(path: Option<&PathBuf>) -> Result<State> {
    let bytes = read_input(path)?;
    persist_core::decode(&bytes).context("Failed to decode save data")
}

fn render_json(state: &State) -> Result<String> {
    let mut json = persist_core::to_json_pretty(state).context("Failed to render JSON")?;
    json.push('\n');
    Ok(json)
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
