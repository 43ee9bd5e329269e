use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::json;
use slide_deck_bundle::{build_bundle, BundleError};
use slide_deck_config::{Config, LoadOptions};
use slide_deck_core::{DeckApp, DeckError, DirectorySource, ExitCode, Loader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slide-deck", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file applied on top of discovered .slide-deck.toml files
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one markdown file to HTML
    Render(RenderArgs),
    /// List the slides of the configured deck
    List,
    /// Render a slide of the configured deck
    Show(ShowArgs),
    /// Build the single-file offline bundle
    Build(BuildArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Markdown file, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print `{title, html}` as JSON
    #[arg(long, conflicts_with = "title")]
    json: bool,

    /// Print only the extracted title
    #[arg(long)]
    title: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// 1-based slide number
    #[arg(short, long, conflicts_with = "hash")]
    slide: Option<usize>,

    /// Location hash such as `#slide3`
    #[arg(long)]
    hash: Option<String>,

    /// Built bundle whose embedded data backs up missing files
    #[arg(long, value_name = "BUNDLE")]
    embedded: Option<PathBuf>,

    /// Print the rendered slide as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Write the bundle here instead of the configured output
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::List => handle_list(load_config(cli.config)?),
        Command::Show(args) => handle_show(load_config(cli.config)?, args),
        Command::Build(args) => handle_build(load_config(cli.config)?, args),
    }
}

/// Maps an error chain to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<DeckError>() {
        return err.exit_code() as i32;
    }
    if let Some(err) = err.downcast_ref::<BundleError>() {
        return err.exit_code() as i32;
    }
    1
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(override_path: Option<PathBuf>) -> Result<Config> {
    let mut options = LoadOptions::default();
    if let Some(path) = override_path {
        options = options.with_override_path(path);
    }
    Ok(Config::load(options)?)
}

fn handle_render(args: RenderArgs) -> Result<i32> {
    let text = read_input(&args.path)
        .with_context(|| format!("Unable to read markdown from {}", args.path.display()))?;
    let result = slide_markdown::parse(&text);

    let rendered = if args.json {
        serde_json::to_string_pretty(&result)?
    } else if args.title {
        result.title.unwrap_or_default()
    } else {
        result.html
    };

    emit(&rendered)?;
    Ok(ExitCode::Success as i32)
}

fn handle_list(config: Config) -> Result<i32> {
    let app = open_app(&config, None)?;
    let lines: Vec<String> = app.options().into_iter().map(|option| option.label).collect();
    if !lines.is_empty() {
        emit(&lines.join("\n"))?;
    }
    Ok(ExitCode::Success as i32)
}

fn handle_show(config: Config, args: ShowArgs) -> Result<i32> {
    let mut app = open_app(&config, args.embedded.as_deref())?;
    let len = app.deck().len();

    let index = match args.slide {
        Some(number) => number.checked_sub(1).ok_or(DeckError::SlideOutOfRange {
            requested: number,
            len,
        })?,
        None => app.start_index(args.hash.as_deref()),
    };

    let slide = app.goto(index).ok_or(DeckError::SlideOutOfRange {
        requested: index + 1,
        len,
    })?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&json!({
            "deck": app.title(),
            "index": slide.index,
            "hash": app.hash(),
            "title": slide.title,
            "html": slide.html,
        }))?
    } else {
        format!("{}\n\n{}", slide.title, slide.html)
    };

    emit(&rendered)?;
    Ok(ExitCode::Success as i32)
}

fn handle_build(mut config: Config, args: BuildArgs) -> Result<i32> {
    if let Some(output) = args.output {
        config.bundle.output = output;
    }

    let outcome = build_bundle(&config.deck, &config.bundle)?;
    emit(&format!(
        "Build complete. Generated {} ({} slides, {} assets)",
        outcome.output.display(),
        outcome.slides,
        outcome.assets
    ))?;
    Ok(ExitCode::Success as i32)
}

fn open_app(config: &Config, embedded: Option<&Path>) -> Result<DeckApp> {
    let source = DirectorySource::new(&config.deck.root, &config.deck.manifest);
    let mut loader = Loader::new(source);
    if let Some(bundle) = embedded {
        loader = loader.with_bundle(bundle)?;
    }
    Ok(DeckApp::open(loader))
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn emit(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match writeln!(handle, "{text}").and_then(|_| handle.flush()) {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to write to stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
