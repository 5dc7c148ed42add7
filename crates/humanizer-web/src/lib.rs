//! Browser UI for side-by-side humanized rewrites.
//!
//! `humanizer-web` serves a single page (text box, strategy/modifier/model
//! pickers, temperature slider, two result columns) and the JSON API behind
//! it. The core work lives in the `humanizer` crate; this crate only maps
//! HTTP to [`humanize_pair`](humanizer::variants::humanize_pair) and back.
//!
//! # Quick start
//!
//! ```ignore
//! use humanizer::catalog::builtin_catalog;
//! use humanizer::config::HumanizerConfig;
//! use humanizer_web::{AppState, WebConfig, spawn_web};
//!
//! let config = HumanizerConfig::default();
//! let client = config.build_client()?;
//! let state = AppState::new(client, builtin_catalog().clone(), &config);
//!
//! let addr = spawn_web(state, WebConfig::default()).await?;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | The single-page UI |
//! | `GET /api/catalog` | Strategies, modifiers, models and defaults |
//! | `POST /api/humanize` | Rewrite text with two strategies (all-or-nothing) |

mod api;
mod page;
mod server;

pub use api::{AppState, FAILURE_MESSAGE};

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8501`.
    pub bind_addr: SocketAddr,
    /// Directory of extra static assets served for unknown paths (images,
    /// a replacement stylesheet). `None` serves only the built-in page.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            static_dir: None,
        }
    }
}

/// Bind the server and run it on a Tokio task.
///
/// Returns the bound address (useful with port 0). The server runs until
/// the Tokio runtime shuts down.
pub async fn spawn_web(state: AppState, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = server::build_router(state, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
