//! CLI entrypoint for refdesk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use refdesk_application::{BreakerRegistry, CacheSweeper, ToolDispatcher, TtlCache};
use refdesk_domain::catalog::CatalogRepository;
use refdesk_domain::tool::ToolResult;
use refdesk_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, JsonlInvocationLogger, StaticCatalog, catalog_handlers,
};
use refdesk_presentation::{Cli, Command, formatter_for, serve_lines};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Initialize logging based on verbosity level.
///
/// Diagnostics go to stderr; stdout belongs to command output and the
/// transport. The returned guard must live until exit to flush the file log.
fn init_logging(verbose: u8, log_dir: Option<&std::path::Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "refdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Load and validate configuration, refusing to start on errors
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    match ConfigLoader::check(&config) {
        Ok(warnings) => {
            for issue in warnings {
                warn!("{}", issue.message);
            }
            Ok(config)
        }
        Err(ConfigError::Invalid(errors)) => {
            for issue in &errors {
                eprintln!("{}", issue);
            }
            bail!("Configuration has {} error(s)", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}

/// Register the remote docs tool behind its breaker
#[cfg(feature = "remote")]
fn register_remote(
    dispatcher: &mut ToolDispatcher,
    registry: &mut BreakerRegistry,
    config: &FileConfig,
    catalog: Arc<dyn CatalogRepository>,
) -> Result<()> {
    use refdesk_application::GuardedDependency;
    use refdesk_infrastructure::{FetchRemoteDocHandler, HttpExternalCall, REMOTE_DOCS_DEPENDENCY};

    let port = Arc::new(HttpExternalCall::new(
        config.remote.base_url.clone(),
        config.remote.timeout(),
    )?);
    let dependency = GuardedDependency::new(port, registry.breaker(REMOTE_DOCS_DEPENDENCY));
    let handler = FetchRemoteDocHandler::new(dependency).with_catalog(catalog);
    dispatcher.add_handler(Arc::new(handler))?;
    info!(base_url = %config.remote.base_url, "Remote docs enabled");
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn register_remote(
    _dispatcher: &mut ToolDispatcher,
    _registry: &mut BreakerRegistry,
    _config: &FileConfig,
    _catalog: Arc<dyn CatalogRepository>,
) -> Result<()> {
    warn!("[remote] is enabled but this build has no remote support, skipping fetch_remote_doc");
    Ok(())
}

fn exit_code(result: &ToolResult) -> ExitCode {
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let code = runtime.block_on(run(cli));

    // A pending stdin read cannot be cancelled; don't wait on it
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command.clone() else {
        bail!("No command given. Use --help for usage.");
    };

    let config = load_config(&cli)?;
    info!("Starting refdesk");

    // === Dependency Injection ===
    let resilience = config.to_resilience_config();
    let cache = Arc::new(TtlCache::with_default_ttl(resilience.default_ttl));
    let mut registry = BreakerRegistry::from_policies(resilience.breakers.clone());
    let catalog: Arc<dyn CatalogRepository> =
        Arc::new(StaticCatalog::builtin().context("Built-in catalog is invalid")?);

    let mut dispatcher = ToolDispatcher::new(Arc::clone(&cache));
    for handler in catalog_handlers(Arc::clone(&catalog)) {
        dispatcher.add_handler(handler)?;
    }
    if config.remote.enabled {
        register_remote(&mut dispatcher, &mut registry, &config, Arc::clone(&catalog))?;
    }

    let invocation_log = config
        .logging
        .invocation_log
        .as_ref()
        .and_then(JsonlInvocationLogger::new)
        .map(Arc::new);
    if let Some(logger) = &invocation_log {
        info!(path = %logger.path().display(), "Writing invocation log");
        dispatcher = dispatcher.with_logger(logger.clone());
    }

    let formatter = formatter_for(cli.output);

    let code = match command {
        Command::Tools => {
            print!("{}", formatter.format_tools(&dispatcher.definitions()));
            ExitCode::SUCCESS
        }
        Command::Status => {
            print!("{}", formatter.format_status(&registry.snapshots()));
            ExitCode::SUCCESS
        }
        Command::Invoke { name, params } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .with_context(|| format!("Parameters are not valid JSON: {}", params))?;
            let result = dispatcher.invoke_json(&name, params).await;
            println!("{}", formatter.format_result(&result));
            exit_code(&result)
        }
        Command::Serve => {
            let shutdown = CancellationToken::new();
            let sweeper = CacheSweeper::spawn_with_token(
                Arc::clone(&cache),
                resilience.cleanup_interval,
                shutdown.child_token(),
            );

            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Interrupt received, shutting down"),
                    Err(e) => error!(error = %e, "Could not listen for ctrl-c"),
                }
                signal_token.cancel();
            });

            info!(tools = ?dispatcher.tool_names(), "Serving on stdin");
            let outcome = serve_lines(
                &dispatcher,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
                shutdown.clone(),
            )
            .await;

            shutdown.cancel();
            sweeper.shutdown().await;
            for snapshot in registry.snapshots() {
                info!(
                    breaker = %snapshot.name,
                    state = %snapshot.state,
                    failures = snapshot.failures,
                    "Final breaker state"
                );
            }
            let summary = outcome.context("Transport failed")?;
            info!(
                requests = summary.requests,
                failures = summary.failures,
                "Shut down cleanly"
            );
            ExitCode::SUCCESS
        }
    };

    if let Some(logger) = &invocation_log {
        logger.flush();
    }

    Ok(code)
}
