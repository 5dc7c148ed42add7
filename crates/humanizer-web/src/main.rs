//! Humanizer web server.
//!
//! Serves the single-page UI and its JSON API on localhost.
//!
//! # Usage
//!
//! ```bash
//! GROQ_API_KEY=gsk_... cargo run -p humanizer-web
//! GROQ_API_KEY=gsk_... cargo run -p humanizer-web -- --port 8080 --model gemma2-9b-it
//! GROQ_API_KEY=gsk_... cargo run -p humanizer-web -- --strategies-file extra.json
//! ```
//!
//! Then open the printed URL in a browser.

use std::path::PathBuf;

use clap::Parser;
use humanizer::catalog::builtin_catalog;
use humanizer::cli::ClientArgs;
use humanizer::logging::init_logging;
use humanizer_web::{AppState, WebConfig, spawn_web};

/// Browser UI for rewriting AI-generated text.
#[derive(Parser)]
#[command(about = "Browser UI for rewriting AI-generated text")]
struct Args {
    #[command(flatten)]
    client: ClientArgs,

    /// Port for the web UI server.
    #[arg(long, default_value_t = 8501)]
    port: u16,

    /// Directory of extra static files served for unknown paths.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// JSON file with extra strategies ([{id, label, instructions}]).
    #[arg(long)]
    strategies_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    init_logging("humanizer=info,humanizer_web=info");

    // A missing key or bad flag stops here, before the server binds.
    let config = args.client.to_config();
    let client = config.build_client().map_err(|e| e.to_string())?;

    let mut catalog = builtin_catalog().clone();
    if let Some(path) = &args.strategies_file {
        let added = catalog.extend_from_file(path).map_err(|e| e.to_string())?;
        println!("Loaded {added} strategies from {}", path.display());
    }

    let state = AppState::new(client, catalog, &config);
    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        static_dir: args.static_dir,
    };
    let addr = spawn_web(state, web_config)
        .await
        .map_err(|e| format!("failed to start server: {e}"))?;
    println!("Web UI: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for Ctrl-C: {e}"))?;
    println!("\nShutting down.");
    Ok(())
}
