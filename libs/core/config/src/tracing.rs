use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations to ensure
/// colored error output. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default filter when `RUST_LOG` is not set.
fn default_filter(environment: &Environment, verbose: bool) -> &'static str {
    match (environment.is_production(), verbose) {
        (_, true) => "debug,hyper=info,h2=info",
        (true, false) => "warn,onboarding_api=info,domain_users=info",
        (false, false) => "info,tower_http=debug,sea_orm=warn,sqlx=warn",
    }
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines, no module targets.
/// - **Development** (default): pretty, human-readable output.
///
/// `DEBUG=true` raises the default level to `debug`; `RUST_LOG` always wins.
/// Both variants include `tracing_error::ErrorLayer` so eyre reports carry span traces.
///
/// Safe to call multiple times; later calls are no-ops (common in tests).
pub fn init_tracing(environment: &Environment, verbose: bool) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment, verbose)));

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(
                verbose,
                "Tracing initialized with ErrorLayer. Environment: {:?}", environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}
