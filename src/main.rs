use anyhow::Context;
use configuration::Settings;
use database::{DbRepository, SeedOutcome};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_server::AppState;

/// The main entry point for the library API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configuration::load_config().context("Failed to load configuration")?;
    // Dropping the guard flushes the file log, so it lives until `main` returns.
    let _guard = init_tracing(&settings).context("Failed to initialize logging")?;

    if let Err(e) = run(settings).await {
        tracing::error!(error = ?e, "Fatal error, shutting down.");
        return Err(e);
    }
    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    // Schema problems are fatal: no server starts without both tables.
    let pool = database::connect(&settings.database.path)
        .await
        .with_context(|| format!("Failed to open database at {}", settings.database.path.display()))?;
    database::run_migrations(&pool)
        .await
        .context("Failed to initialize database schema")?;
    tracing::info!(path = %settings.database.path.display(), "Database initialized.");

    // Seeding is optional; a failure is logged and startup continues.
    match database::seed_sample_data(&pool).await {
        Ok(SeedOutcome::Seeded { book_id }) => tracing::info!(book_id, "Seeded sample data."),
        Ok(SeedOutcome::AlreadyPopulated) => {}
        Err(e) => tracing::warn!(error = %e, "Sample data insertion skipped."),
    }

    let addr = settings
        .server
        .socket_addr()
        .context("Invalid server address")?;
    let state = AppState { db_repo: DbRepository::new(pool) };

    web_server::run_server(addr, state, &settings.cors.allowed_origin).await
}

/// Console output plus a daily rolling file under `logging.directory`.
///
/// `RUST_LOG` overrides the default `info` filter.
fn init_tracing(settings: &Settings) -> anyhow::Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(settings.logging.file_prefix.as_str())
        .build(&settings.logging.directory)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
