/*
 * Responsibility
 * - Config読み込み → 依存生成 (DB pool, token validator, authenticator) → Router 組み立て
 * - Middleware の適用 (oauth headers / CORS / HTTP)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, CorsConfig, HttpConfig},
    graphql,
    middleware::{cors, http, oauth},
    repos::{Directory, PgDirectory},
    services::auth::{AuthHandler, BearerAuthenticator, PrincipalResolver, build_token_validator},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG=info,oauth2_graphql=debug,tower_http=debug cargo run
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
        tracing::error!(?info, "panic");

        // development は即死させて気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting GraphQL API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config.cors, &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let directory: Arc<dyn Directory> = Arc::new(PgDirectory::new(db));
    let validator = build_token_validator(config)?;

    // Bearer is the only scheme today; further schemes are appended here.
    let auth = AuthHandler::default().with(Arc::new(BearerAuthenticator::new(
        PrincipalResolver::new(validator.clone(), directory.clone()),
    )));

    Ok(AppState::new(
        directory,
        validator,
        Arc::new(auth),
        Arc::new(graphql::schema()),
        config.app_env,
    ))
}

pub fn build_router(state: AppState, cors_config: &CorsConfig, http_config: &HttpConfig) -> Router {
    let app_env = state.app_env;

    let router = Router::new()
        .merge(oauth::apply(api::graphql_routes(), state.clone()))
        .merge(api::public_routes())
        .with_state(state);

    let router = cors::apply(router, cors_config, app_env);
    http::apply(router, http_config)
}
