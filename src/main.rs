use std::{process, sync::Arc};

use quire::{
    application::{
        accounts::AccountService,
        auth::AuthService,
        comments::CommentService,
        error::AppError,
        likes::LikeService,
        listing::ListingService,
        posts::PostService,
        repos::{
            CommentsRepo, HealthRepo, LikesRepo, PostsRepo, PostsWriteRepo, TagsRepo, UsersRepo,
        },
        tags::TagService,
    },
    cache::{self, CacheConfig},
    config,
    infra::{
        db::PostgresRepositories, error::InfraError, http, passwords::Argon2Hasher, telemetry,
    },
};
use sqlx::PgPool;
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect(&settings.database).await?;
    info!(target = "quire::migrate", "migrations applied");
    pool.close().await;
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let secret = settings
        .auth
        .require_secret()
        .map_err(|err| AppError::validation(err.to_string()))?;
    let pool = connect(&settings.database).await?;
    let repositories = Arc::new(PostgresRepositories::new(pool));

    let auth = Arc::new(AuthService::new(secret, settings.auth.token_ttl));
    let cache_config = CacheConfig::from(&settings.cache);
    let listing = ListingService::new(
        repositories.clone() as Arc<dyn PostsRepo>,
        cache::build(&cache_config),
        &cache_config,
    );

    let state = http::AppState {
        accounts: Arc::new(AccountService::new(
            repositories.clone() as Arc<dyn UsersRepo>,
            Arc::new(Argon2Hasher::new()),
            auth.clone(),
        )),
        posts: Arc::new(PostService::new(
            repositories.clone() as Arc<dyn PostsRepo>,
            repositories.clone() as Arc<dyn PostsWriteRepo>,
            listing.clone(),
        )),
        listing,
        comments: Arc::new(CommentService::new(
            repositories.clone() as Arc<dyn CommentsRepo>,
            repositories.clone() as Arc<dyn PostsRepo>,
        )),
        likes: Arc::new(LikeService::new(
            repositories.clone() as Arc<dyn LikesRepo>,
            repositories.clone() as Arc<dyn PostsRepo>,
            repositories.clone() as Arc<dyn CommentsRepo>,
        )),
        tags: Arc::new(TagService::new(
            repositories.clone() as Arc<dyn TagsRepo>,
            repositories.clone() as Arc<dyn PostsRepo>,
        )),
        auth,
        health: repositories.clone() as Arc<dyn HealthRepo>,
        listing_settings: settings.listing.clone(),
    };

    serve_http(&settings.server, state).await?;
    repositories.pool().close().await;
    Ok(())
}

/// Open the pool and bring the schema up to date.
async fn connect(settings: &config::DatabaseSettings) -> Result<PgPool, AppError> {
    let pool = PostgresRepositories::connect(settings).await?;
    PostgresRepositories::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve_http(server: &config::ServerSettings, state: http::AppState) -> Result<(), AppError> {
    let router = http::build_router(state, server);
    let listener = tokio::net::TcpListener::bind(server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "quire::serve",
        addr = %server.addr,
        base_path = %server.base_path,
        "listening"
    );

    let grace = server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(grace))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

/// Resolve on ctrl-c; a second wait bounds how long in-flight requests may drain.
async fn shutdown_signal(grace: std::time::Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "quire::serve", error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!(
        target = "quire::serve",
        grace_secs = grace.as_secs(),
        "shutdown requested"
    );
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        error!(target = "quire::serve", "graceful shutdown timed out");
        process::exit(1);
    });
}
