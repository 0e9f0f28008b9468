use std::{process, sync::Arc};

use clap::Parser;
use curio::{
    application::{
        auth::AuthService,
        error::AppError,
        items::ItemService,
        repos::{ItemsRepo, UsersRepo},
        tokens::TokenService,
    },
    cache::TtlCache,
    config::{self, CliArgs},
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    serve(settings).await
}

async fn serve(settings: config::Settings) -> Result<(), AppError> {
    let database_url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;
    let secret = settings
        .auth
        .secret
        .as_deref()
        .ok_or_else(|| InfraError::configuration("auth secret is not configured"))
        .map_err(AppError::from)?;

    let pool = SqliteRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    let repositories = Arc::new(SqliteRepositories::new(pool));
    let state = build_state(repositories, secret, &settings);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "curio::server",
        addr = %settings.server.public_addr,
        "listening"
    );

    axum::serve(listener, http::build_router(state).into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

fn build_state(
    repositories: Arc<SqliteRepositories>,
    secret: &str,
    settings: &config::Settings,
) -> AppState {
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let items_repo: Arc<dyn ItemsRepo> = repositories.clone();

    let tokens = Arc::new(TokenService::new(secret, settings.auth.token_ttl));
    let cache = Arc::new(TtlCache::new(settings.cache.capacity));

    let auth = Arc::new(AuthService::new(users_repo, tokens.clone()));
    let items = Arc::new(ItemService::new(
        items_repo,
        cache,
        settings.cache.item_ttl,
    ));

    AppState {
        auth,
        items,
        tokens,
        db: repositories,
    }
}
