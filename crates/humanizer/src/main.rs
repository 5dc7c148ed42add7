//! Rewrite AI-generated text with two strategies and print both variants.
//!
//! Reads the API key from the `GROQ_API_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Two default strategies
//! humanize --text "The weather is nice."
//!
//! # Pick strategies and modifiers
//! humanize --text "..." --strategy storytelling --strategy humor \
//!   --tone casual --length shorter --person first
//!
//! # Pipe content from stdin
//! cat draft.md | humanize --stdin --model gemma2-9b-it --temperature 0.4
//!
//! # Show available strategies, modifiers and models
//! humanize --list
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use humanizer::catalog::{
    Catalog, Length, Modifier, Modifiers, Person, SUPPORTED_MODELS, Tone, builtin_catalog,
    parse_modifier,
};
use humanizer::cli::ClientArgs;
use humanizer::logging::init_logging;
use humanizer::variants::{HumanizeRequest, Presentation, humanize_pair};

/// Rewrite AI-generated text so it reads like a person wrote it.
///
/// Reads the API key from the GROQ_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "humanize", version)]
struct Cli {
    // ── Input ──────────────────────────────────────────────────
    /// Text to humanize
    #[arg(long)]
    text: Option<String>,

    /// Read the text from stdin
    #[arg(long)]
    stdin: bool,

    // ── Strategies and modifiers ───────────────────────────────
    /// Strategy id; give exactly two (defaults: conversational, sentence_structure)
    #[arg(long = "strategy", num_args = 1)]
    strategies: Vec<String>,

    /// JSON file with extra strategies ([{id, label, instructions}])
    #[arg(long)]
    strategies_file: Option<PathBuf>,

    /// Tone modifier
    #[arg(long)]
    tone: Option<String>,

    /// Length modifier
    #[arg(long)]
    length: Option<String>,

    /// Narrative person modifier
    #[arg(long)]
    person: Option<String>,

    // ── Client ─────────────────────────────────────────────────
    #[command(flatten)]
    client: ClientArgs,

    // ── Output mode ────────────────────────────────────────────
    /// List strategies, modifiers and models, then exit
    #[arg(long)]
    list: bool,
}

const DEFAULT_STRATEGIES: [&str; 2] = ["conversational", "sentence_structure"];

fn read_input(cli: &Cli) -> Result<String, String> {
    let piped = if cli.stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Some(buf)
    } else {
        None
    };

    match (&cli.text, piped) {
        (Some(text), Some(piped)) => Ok(format!("{text}\n\n{piped}")),
        (Some(text), None) => Ok(text.clone()),
        (None, Some(piped)) => Ok(piped),
        (None, None) => Err("provide --text, --stdin, or both".to_string()),
    }
}

fn load_catalog(cli: &Cli) -> Result<Catalog, String> {
    let mut catalog = builtin_catalog().clone();
    if let Some(path) = &cli.strategies_file {
        catalog.extend_from_file(path).map_err(|e| e.to_string())?;
    }
    Ok(catalog)
}

fn strategy_ids(cli: &Cli) -> Result<[&str; 2], String> {
    match cli.strategies.as_slice() {
        [] => Ok(DEFAULT_STRATEGIES),
        [a, b] => Ok([a.as_str(), b.as_str()]),
        other => Err(format!(
            "expected exactly two --strategy values, got {}",
            other.len()
        )),
    }
}

fn modifiers(cli: &Cli) -> Result<Modifiers, String> {
    Ok(Modifiers {
        tone: parse_modifier::<Tone>(cli.tone.as_deref())?,
        length: parse_modifier::<Length>(cli.length.as_deref())?,
        person: parse_modifier::<Person>(cli.person.as_deref())?,
    })
}

fn print_listing(catalog: &Catalog) {
    println!("Strategies:");
    for s in catalog.strategies() {
        println!("  {:<20} {}", s.id, s.label);
    }
    print_axis::<Tone>();
    print_axis::<Length>();
    print_axis::<Person>();
    println!("\nModels:");
    for m in SUPPORTED_MODELS {
        println!("  {:<28} {}", m.id, m.name);
    }
}

fn print_axis<M: Modifier>() {
    println!("\n{}:", M::AXIS);
    for m in M::all() {
        println!("  {:<20} {}", m.id(), m.label());
    }
}

async fn run(cli: &Cli) -> Result<(), String> {
    let catalog = load_catalog(cli)?;
    if cli.list {
        print_listing(&catalog);
        return Ok(());
    }

    let config = cli.client.to_config();
    let client = config.build_client().map_err(|e| e.to_string())?;

    let text = read_input(cli)?;
    let request = HumanizeRequest::from_ids(&catalog, &text, strategy_ids(cli)?, &config.model)
        .and_then(|r| r.with_temperature(config.temperature))
        .map_err(|e| e.to_string())?
        .with_modifiers(modifiers(cli)?);

    eprintln!("Humanizing text...");
    match humanize_pair(&client, &request).await.presentation() {
        Presentation::Ready(variants) => {
            for (i, v) in variants.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("### {}\n\n{}", v.label, v.text);
            }
            Ok(())
        }
        Presentation::Failed { errors } => {
            for (label, e) in &errors {
                eprintln!("  {label}: {e}");
            }
            Err("Failed to humanize the text. Please try again.".to_string())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging("humanizer=warn");

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
