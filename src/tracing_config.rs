//! Tracing setup for the `jsm` binary.
//!
//! The output format is chosen with `JSM_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span tree via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! JSM_LOG=debug JSM_LOG_FORMAT=tree jsm --mode js
//! JSM_LOG="jsm_surface::merge=debug" jsm --project jsmconfig.json
//! ```
//!
//! Nothing is installed unless `JSM_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("JSM_LOG_FORMAT").unwrap_or_default())
    }
}

/// `JSM_LOG` wins over `RUST_LOG`; both use `RUST_LOG` directive syntax.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("JSM_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber. All output goes to stderr so it never
/// mixes with the surface printed on stdout.
pub fn init_tracing() {
    if std::env::var("JSM_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
