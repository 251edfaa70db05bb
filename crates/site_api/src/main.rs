//! The esports community website API program.
//!
//! The program also includes a [library](site_api_lib). Overall, it uses the [`esports_lib`] crate
//! as a main dependency.

use actix_web::{App, HttpServer, middleware};
use anyhow::Context as _;
use esports_lib::Database;
use migration::MigratorTrait as _;
use mkenv::prelude::*;
use site_api_lib::configure;
use tracing::level_filters::LevelFilter;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// The main entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err).context("cannot retrieve .env files"),
        _ => (),
    }
    let env = site_api_lib::init_env()?;

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let db = Database::from_db_url(env.db_env.db_url.db_url.get(), env.db_env.redis_url.redis_url.get())
        .await?;

    migration::Migrator::up(&db.sql_conn, None).await?;

    let app_env = env.app_env.get();
    let sess_key = configure::session_key(app_env, env.dynamic.sess_key.get().as_bytes())?;
    let allowed_origins = configure::allowed_origins();
    if app_env.is_production() && allowed_origins.is_empty() {
        tracing::warn!("No CORS origin allowed in production, browsers will reject the API");
    }

    let upload_dir = env.upload_dir.get();
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .with_context(|| format!("Cannot create upload directory `{upload_dir}`"))?;

    let port = env.port.get();
    tracing::info!("Starting the API in {app_env} mode on port {port}");

    HttpServer::new(move || {
        App::new()
            .wrap(configure::cors(app_env, &allowed_origins))
            .wrap(middleware::from_fn(configure::fit_request_id))
            .wrap(TracingLogger::<configure::RootSpanBuilder>::new())
            .wrap(configure::session_middleware(sess_key.clone()))
            .configure(|cfg| configure::configure(cfg, db.clone()))
    })
    .bind(("0.0.0.0", port))
    .context("Cannot bind 0.0.0.0 address")?
    .run()
    .await
    .context("Cannot create actix-web server")?;

    Ok(())
}
