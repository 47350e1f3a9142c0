pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod launch;
pub mod services;
pub mod session;

use std::path::Path;

use code_catalog::{candidate_paths, load_catalog};
use tracing_subscriber::EnvFilter;
use usage_store::UsageStore;

use app::AppState;
use config::AppConfig;
use services::label::LabelService;

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config, catalog and usage counters.
///
/// Never fails: every source falls back to defaults and logs why.
pub fn init_foundation(prefill: Option<String>) -> AppState {
    build_state(AppConfig::load(), prefill)
}

fn build_state(config: AppConfig, prefill: Option<String>) -> AppState {
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::warn!(
            path = %config.data_dir.display(),
            error = %e,
            "Failed to create data directory; usage counters may not be saved"
        );
    }

    let candidates = candidate_paths(
        &config.catalog_file_name,
        Path::new(env!("CARGO_MANIFEST_DIR")),
    );
    let catalog = load_catalog(&candidates);

    let usage_path = config.usage_file();
    tracing::info!("Opening usage counters at {}", usage_path.display());
    let store = UsageStore::open(&usage_path);

    tracing::info!(
        entries = catalog.len(),
        favorites = store.counts().len(),
        "KDL catalog loaded"
    );

    let labels = LabelService::new(catalog, store);
    AppState::new(config, labels, prefill)
}
