mod app_state;
mod cli;

use std::path::PathBuf;

use companion_config::schema::{CompanionConfig, LogLevel};
use companion_config::toml_loader;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

const DEFAULT_DIRECTIVE: &str = "companion=info";

/// Extra filter directive from `--log-level` or the config level.
///
/// A bare level applies to the companion crates only; anything containing
/// `=` or `,` is taken as a full directive. A set `RUST_LOG` takes
/// precedence over the config level but not over the flag.
fn log_directive(
    cli: Option<&str>,
    config_level: Option<LogLevel>,
    env_filter_set: bool,
) -> Option<String> {
    match (cli, config_level) {
        (Some(cli), _) if cli.contains('=') || cli.contains(',') => Some(cli.to_string()),
        (Some(cli), _) => Some(format!("companion={cli}")),
        (None, _) if env_filter_set => None,
        (None, Some(level)) => Some(format!("companion={}", level.as_directive())),
        (None, None) => None,
    }
}

fn init_tracing(directive: Option<&str>) {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    for part in directive.into_iter().flat_map(|d| d.split(',')) {
        match part.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("ignoring invalid log directive {part:?}: {e}"),
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_config_path(cli: Option<&str>) -> Option<PathBuf> {
    match cli {
        Some(path) => Some(PathBuf::from(path)),
        None => toml_loader::default_config_path().ok(),
    }
}

fn main() {
    let args = cli::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    // Read before logging is up so `logging.level` can take effect; the
    // reload manager loads it again once tracing is installed.
    let initial = config_path
        .as_deref()
        .and_then(|path| toml_loader::load_or_create(path).ok());

    let directive = log_directive(
        args.log_level.as_deref(),
        initial.as_ref().map(|c| c.logging.level),
        std::env::var_os("RUST_LOG").is_some(),
    );
    init_tracing(directive.as_deref());

    tracing::info!("Companion v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = companion_platform::ensure_dirs() {
        tracing::warn!("failed to create directories: {e}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("companion-io")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let (mut config, config_rx) = match config_path {
        Some(path) => {
            tracing::info!("using config {}", path.display());
            let (config, rx) = runtime.block_on(companion_config::ReloadManager::start(path));
            (config, Some(rx))
        }
        None => {
            tracing::warn!("no config directory available, using defaults");
            (CompanionConfig::default(), None)
        }
    };
    if let Some(model) = args.model {
        config.model.path = model;
    }
    tracing::info!(model = %config.model.path, "config loaded");

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::CompanionApp::new(config, config_rx, runtime);

    tracing::info!("entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("event loop error: {e}");
    }
    tracing::info!("shutdown complete");
}
