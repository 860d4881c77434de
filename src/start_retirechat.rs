//! Startup helpers for the retirement coach server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::coach::core::config::CoachConfig;
use crate::coach::engine::CoachOrchestrator;
use crate::server::{self, AppState};

/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "RETIRECHAT_PORT";

/// Initialise logging, build the orchestrator and serve until failure.
///
/// # Returns
/// `ExitCode::SUCCESS` on shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting retirechat v{}", env!("CARGO_PKG_VERSION"));

    // The blocking HTTP client must be built and dropped outside the async runtime.
    let orchestrator = match initialize() {
        Ok(o) => o,
        Err(e) => {
            tracing::error!("Failed to initialise coach: {e}");
            return ExitCode::from(1);
        }
    };

    let state = AppState::new(Arc::clone(&orchestrator));
    let port = get_port();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let served = rt.block_on(server::run_server(state, port));
    drop(rt);
    drop(orchestrator);

    if let Err(e) = served {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Install the `fmt` subscriber on stderr with `RUST_LOG` filtering and an INFO floor.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Load configuration from the environment and build a Gemini-backed orchestrator.
///
/// # Errors
/// Returns an error if configuration is invalid or the API key is missing.
pub fn initialize() -> Result<Arc<CoachOrchestrator>, Box<dyn std::error::Error + Send + Sync>> {
    let config = CoachConfig::from_env()?;
    tracing::info!(
        model = %config.gemini.model,
        style = ?config.prompt.style,
        max_attempts = config.retry.max_attempts,
        "coach configured"
    );
    Ok(Arc::new(CoachOrchestrator::with_gemini(config)?))
}

/// Get configured server port.
#[must_use]
pub fn get_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(server::DEFAULT_PORT)
}
