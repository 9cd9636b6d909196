use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dotxml::{ConfigStore, StoreOptions, UNAVAILABLE};

#[derive(Debug, Parser)]
#[command(
    name = "dotxml",
    version,
    about = "Read and update XML configuration files by dotted path"
)]
struct Args {
    /// XML configuration file
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Printed in place of values that do not exist
    #[arg(long, default_value = UNAVAILABLE)]
    sentinel: String,
    /// Directory modified files are written to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the configuration tree
    Print,
    /// Check whether an element exists (exit status 1 when it does not)
    Exists { path: String },
    /// Print the text of an element
    Get { path: String },
    /// Print an attribute of an element
    Attr { path: String, name: String },
    /// Set the text of an existing element and write `_<FILE>`
    Set { path: String, value: String },
    /// Set an existing attribute and write `_<FILE>`
    SetAttr {
        path: String,
        name: String,
        value: String,
    },
    /// Add one to an integer element and write `_<FILE>`
    Increment { path: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut options = StoreOptions::default().with_sentinel(args.sentinel);
    if let Some(dir) = args.output_dir {
        options = options.with_output_dir(dir);
    }

    let mut store = ConfigStore::open_with_options(&args.file, options)
        .with_context(|| format!("failed to load {}", args.file.display()))?;

    match args.command {
        Command::Print => {
            print!("{}", store.render().unwrap_or_default());
        }
        Command::Exists { path } => {
            let exists = store.exists(&path);
            println!("{exists}");
            if !exists {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Get { path } => println!("{}", store.get_option(&path)),
        Command::Attr { path, name } => println!("{}", store.get_attribute(&path, &name)),
        Command::Set { path, value } => {
            if !store.set_option(&path, value) {
                bail!("no element at '{path}'");
            }
            save(store)?;
        }
        Command::SetAttr { path, name, value } => {
            if !store.set_attribute(&path, &name, value) {
                bail!("no attribute '{name}' on element '{path}'");
            }
            save(store)?;
        }
        Command::Increment { path } => {
            let next = increment(&store, &path)?;
            if !store.set_option(&path, next.to_string()) {
                bail!("no element at '{path}'");
            }
            println!("{next}");
            save(store)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn increment(store: &ConfigStore, path: &str) -> Result<i64> {
    let Some(current) = store.option(path) else {
        bail!("no element at '{path}'");
    };
    let current = current.trim();
    if current.is_empty() {
        return Ok(1);
    }
    let value: i64 = current
        .parse()
        .with_context(|| format!("'{path}' holds '{current}', not an integer"))?;
    value
        .checked_add(1)
        .with_context(|| format!("'{path}' would overflow"))
}

fn save(store: ConfigStore) -> Result<()> {
    match store.close().context("failed to write configuration")? {
        Some(path) => info!("wrote {}", path.display()),
        None => info!("nothing changed"),
    }
    Ok(())
}
