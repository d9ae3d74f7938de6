//! PDF + ZIP merger CLI tool
//!
//! Appends a ZIP archive to a PDF. Without a command it starts the
//! interactive shell.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::level_filters::LevelFilter;

use pdf_zip_merger::logging;
use pdf_zip_merger::merge::{merge, MergeRequest};
use pdf_zip_merger::session::{default_output_dir, remember_output_dir};
use pdf_zip_merger::{Error, InputField};
use pdf_zip_merger::reveal::reveal_directory;
use pdf_zip_merger::settings::{ExecutionMode, SettingsStore};
use pdf_zip_merger::shell::Shell;

/// PDF + ZIP Merger - hide a ZIP archive inside a PDF
#[derive(Parser)]
#[command(name = "pdf-zip-merger")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge into the remembered output directory
    pdf-zip-merger merge --pdf slides.pdf --zip sources.zip --name handout

    # Remember a new output directory
    pdf-zip-merger out-dir ~/Documents/merged

    # Interactive shell
    pdf-zip-merger")]
struct Cli {
    /// Settings file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = logging::DEFAULT_LEVEL, value_parser = logging::parse_level)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a ZIP archive to a PDF
    Merge {
        /// PDF file (first part of the output)
        #[arg(long)]
        pdf: String,

        /// ZIP file (appended after the PDF)
        #[arg(long)]
        zip: String,

        /// Output directory; defaults to the remembered one, then the PDF's directory
        #[arg(short, long)]
        out_dir: Option<String>,

        /// Base name of the output file, without ".pdf"
        #[arg(short, long, default_value = "")]
        name: String,

        /// Show the output directory in the file manager afterwards
        #[arg(long)]
        open: bool,
    },

    /// Print the remembered output directory, or remember a new one
    OutDir {
        /// Directory to remember
        dir: Option<String>,
    },

    /// Show the remembered output directory in the file manager
    Open,

    /// Print the location of the settings file
    ConfigPath,

    /// Start the interactive shell
    Shell,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = open_store(cli.config)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Merge { pdf, zip, out_dir, name, open } => {
            cmd_merge(&store, pdf, zip, out_dir, name, open)
        }
        Commands::OutDir { dir } => cmd_out_dir(&store, dir),
        Commands::Open => {
            reveal_directory(&store.load())?;
            Ok(())
        }
        Commands::ConfigPath => {
            println!("{}", store.path().display());
            Ok(())
        }
        Commands::Shell => {
            let stdin = io::stdin();
            Shell::new(store).run(stdin.lock(), io::stdout())?;
            Ok(())
        }
    }
}

fn open_store(config: Option<PathBuf>) -> anyhow::Result<SettingsStore> {
    match config {
        Some(path) => Ok(SettingsStore::at(path)),
        None => Ok(SettingsStore::locate(&ExecutionMode::detect())?),
    }
}

/// Merge one PDF and one ZIP
fn cmd_merge(
    store: &SettingsStore,
    pdf: String,
    zip: String,
    out_dir: Option<String>,
    name: String,
    open: bool,
) -> anyhow::Result<()> {
    let remembered = match out_dir {
        Some(dir) => remember_output_dir(store, &dir)?.map(str::to_owned),
        None => None,
    };
    let output_dir = remembered.unwrap_or_else(|| default_output_dir(&store.load(), &pdf));

    let written = merge(&MergeRequest::new(pdf, zip, output_dir, name))?;
    println!("{}", written.display());

    if open {
        if let Some(dir) = written.parent() {
            reveal_directory(&dir.to_string_lossy())?;
        }
    }

    Ok(())
}

/// Print or change the remembered output directory
fn cmd_out_dir(store: &SettingsStore, dir: Option<String>) -> anyhow::Result<()> {
    match dir {
        Some(dir) => match remember_output_dir(store, &dir)? {
            Some(dir) => eprintln!("Output directory set to: {dir}"),
            None => return Err(Error::MissingInput(InputField::OutputDir).into()),
        },
        None => println!("{}", store.load()),
    }
    Ok(())
}
