//! mdcanvas CLI - compile markdown into excalidraw scene documents.
//!
//! Reads markdown from a file (or stdin), compiles it into a laid-out scene,
//! and writes the scene JSON to stdout (or a file). Diagram conversion is an
//! external collaborator; without one wired in, detected regions are dropped
//! with a log message.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mdcanvas_compiler::{CompileOptions, Compiler, NoopAdapter};
use mdcanvas_scene::FontFamily;

/// Compile markdown into excalidraw scene documents.
#[derive(Parser)]
#[command(name = "mdcanvas", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a markdown document into a scene.
    Compile(CompileArgs),
}

#[derive(Args)]
struct CompileArgs {
    /// Markdown input file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Write the scene JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base font size for body text.
    #[arg(long, default_value_t = 20.0)]
    font_size: f64,

    /// Body font family.
    #[arg(long, value_enum, default_value_t = FontChoice::Helvetica)]
    font_family: FontChoice,

    /// Stroke color for text.
    #[arg(long, default_value = "#1e1e1e")]
    color: String,

    /// Pretty-print the scene JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FontChoice {
    Virgil,
    Helvetica,
    Cascadia,
}

impl From<FontChoice> for FontFamily {
    fn from(choice: FontChoice) -> Self {
        match choice {
            FontChoice::Virgil => Self::Virgil,
            FontChoice::Helvetica => Self::Helvetica,
            FontChoice::Cascadia => Self::Cascadia,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("input is empty")]
    EmptyInput,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn run(args: &CompileArgs) -> Result<(), CliError> {
    let markdown = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if markdown.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }

    let options = CompileOptions {
        font_family: args.font_family.into(),
        font_size: args.font_size,
        color: args.color.clone(),
        ..CompileOptions::default()
    };
    let scene = Compiler::new(&NoopAdapter)
        .with_options(options)
        .compile(&markdown);
    tracing::info!(
        elements = scene.elements.len(),
        files = scene.files.len(),
        "compiled scene"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&scene)?
    } else {
        serde_json::to_string(&scene)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Compile(args) => run(args),
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
