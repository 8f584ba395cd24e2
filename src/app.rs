/*
 * Responsibility
 * - load Config → build services explicitly → assemble the Router
 * - stack middleware in a fixed order (see build_router)
 * - serve with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::build_access_verifier;
use crate::services::authz::table;
use crate::services::password::PasswordHasher;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,flightontime_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting security gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build every process-level service once. Any invalid table, key or cost
/// stops startup here instead of failing per request.
pub fn build_state(config: &Config) -> Result<AppState> {
    let routes = table::flight_api().context("building access table")?;
    tracing::info!(rules = routes.rules().len(), "access table ready");

    let auth = build_access_verifier(config).context("building access token verifier")?;
    let passwords = PasswordHasher::new(config.bcrypt_cost).context("building password hasher")?;

    Ok(AppState::new(auth, Arc::new(routes), passwords))
}

/// Request order, outermost first:
///
/// CORS → request id / trace / body limit / timeout → security headers
/// → credential verification → route enforcement → handler (or fallback)
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = middleware::auth::apply(api::routes(), state.clone()).with_state(state);
    let router = middleware::security_headers::apply(router, config);
    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}
