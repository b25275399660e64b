mod manifest;

use anyhow::{Context, Result, bail};
use argsense::{Matches, OptionParser, Schema, Suggester};
use clap::{Parser, Subcommand};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{Manifest, load_manifest, write_default_manifest};

#[derive(Parser)]
#[command(name = "argsense")]
#[command(version, about = "Option parsing with did-you-mean suggestions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a demo argsense.json schema manifest
    Init(InitArgs),

    /// Parse arguments against a schema manifest
    Parse(ParseArgs),

    /// Print the usage line (or full help) for a schema manifest
    Usage(UsageArgs),

    /// Suggest dictionary words close to a misspelled word
    Suggest(SuggestArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing manifest
    #[arg(short, long)]
    force: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the schema manifest (default: ./argsense.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Did-you-mean search budget in milliseconds (overrides the manifest)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Arguments to parse, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the schema manifest (default: ./argsense.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print the full help block instead of the usage line
    #[arg(long)]
    long: bool,
}

#[derive(Parser)]
struct SuggestArgs {
    /// The misspelled word
    #[arg(value_name = "WORD")]
    word: String,

    /// Dictionary file, one word per line
    #[arg(short, long, value_name = "FILE")]
    dict: Option<PathBuf>,

    /// Add a dictionary word (repeatable)
    #[arg(short, long = "candidate", value_name = "WORD")]
    candidates: Vec<String>,

    /// Use the long option names of a schema manifest as dictionary
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print every correction instead of a single one
    #[arg(long)]
    all: bool,

    /// Distance-2 search budget in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Usage(args) => usage(args),
        Commands::Suggest(args) => suggest(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let manifest_path = write_default_manifest(&dir, args.force)?;

    eprintln!("Created: {}", manifest_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit argsense.json to describe your options");
    eprintln!("  2. Run: argsense usage --long");
    eprintln!("  3. Run: argsense parse -- --path file.txt --something a b");

    Ok(())
}

fn load_schema(path: Option<&Path>) -> Result<(Manifest, Schema)> {
    let manifest = load_manifest(path)?;
    let schema = manifest.to_schema()?;
    Ok((manifest, schema))
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let (manifest, schema) = load_schema(args.schema.as_deref())?;
    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| manifest.suggestion_timeout());

    let mut argv = Vec::with_capacity(args.args.len() + 1);
    argv.push(schema.program().to_string());
    argv.extend(args.args);

    let mut matches = Matches::new();
    OptionParser::new(&schema)
        .with_suggestion_timeout(timeout)
        .parse(&argv, &mut matches)?;
    schema.check_required_options(&matches)?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(&matches).context("failed to serialize result")?;
        writeln!(stdout, "{json}")?;
    } else {
        for flag in matches.flags() {
            writeln!(stdout, "--{flag}")?;
        }
        for (key, values) in matches.options() {
            writeln!(stdout, "--{key} {}", values.join(" "))?;
        }
    }

    Ok(())
}

fn usage(args: UsageArgs) -> Result<()> {
    let (_, schema) = load_schema(args.schema.as_deref())?;
    let mut stdout = std::io::stdout().lock();
    if args.long {
        schema.write_help(&mut stdout)?;
    } else {
        schema.write_usage(&mut stdout)?;
    }
    Ok(())
}

fn suggest(args: SuggestArgs) -> Result<()> {
    tracing::debug!("executing suggest command");

    let mut words = args.candidates;
    if let Some(path) = &args.dict {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary: {}", path.display()))?;
        words.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string),
        );
    }
    if let Some(path) = &args.schema {
        let (_, schema) = load_schema(Some(path))?;
        words.extend(schema.options().map(|o| o.key().to_string()));
    }
    if words.is_empty() {
        bail!("no dictionary given (use --dict, --candidate or --schema)");
    }

    let mut suggester = Suggester::new(words);
    if let Some(ms) = args.timeout_ms {
        suggester = suggester.with_timeout(Duration::from_millis(ms));
    }

    let found: Vec<String> = if args.all {
        suggester.corrections(&args.word).into_iter().collect()
    } else {
        suggester.one_correction(&args.word).into_iter().collect()
    };
    if found.is_empty() {
        bail!("no suggestion for '{}'", args.word);
    }

    let mut stdout = std::io::stdout().lock();
    for word in found {
        writeln!(stdout, "{word}")?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
