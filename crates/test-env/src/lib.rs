//! Testing environment of the website crates.
//!
//! Each test wrapped with [`wrap`] runs against a fresh, migrated SQL database, which is dropped
//! once the test succeeds.

use std::{env, panic};

use anyhow::Context as _;
use esports_lib::{Database, DbEnv, gen_random_str, pool::get_redis_pool};
use futures::FutureExt as _;
use migration::MigratorTrait as _;
use mkenv::prelude::*;
use sea_orm::{ConnectionTrait as _, DbConn};
use tracing_subscriber::fmt::TestWriter;

/// The CLI flag used to drop the test databases even when the test fails.
const FORCE_DROP_FLAG: &str = "--force-drop-db";

fn is_db_drop_forced() -> bool {
    env::args_os().any(|arg| arg == FORCE_DROP_FLAG)
}

/// The output of a test, converted to an [`anyhow::Result`].
pub trait IntoResult {
    type Out;

    fn into_result(self) -> anyhow::Result<Self::Out>;
}

impl IntoResult for () {
    type Out = ();

    fn into_result(self) -> anyhow::Result<Self::Out> {
        Ok(())
    }
}

impl<T, E> IntoResult for Result<T, E>
where
    anyhow::Error: From<E>,
{
    type Out = T;

    fn into_result(self) -> anyhow::Result<Self::Out> {
        self.map_err(From::from)
    }
}

/// Loads the `.env` file if there is one, and sets up the test logger.
pub fn init_env() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err).context("cannot retrieve .env files"),
        _ => (),
    }

    let _ = tracing_subscriber::fmt()
        .with_writer(TestWriter::new())
        .try_init();

    Ok(())
}

async fn connect_to(master_db: &DbConn, db_name: &str) -> anyhow::Result<DbConn> {
    let db = match master_db {
        #[cfg(feature = "mysql")]
        sea_orm::DatabaseConnection::SqlxMySqlPoolConnection(_) => {
            use sea_orm::sqlx;

            let options = (*master_db.get_mysql_connection_pool().connect_options())
                .clone()
                .database(db_name);
            DbConn::from(sqlx::mysql::MySqlPool::connect_with(options).await?)
        }
        #[cfg(feature = "postgres")]
        sea_orm::DatabaseConnection::SqlxPostgresPoolConnection(_) => {
            use sea_orm::sqlx;

            let options = (*master_db.get_postgres_connection_pool().connect_options())
                .clone()
                .database(db_name);
            DbConn::from(sqlx::postgres::PgPool::connect_with(options).await?)
        }
        _ => anyhow::bail!("must enable either `mysql` or `postgres` feature for testing"),
    };
    Ok(db)
}

async fn drop_db(master_db: &DbConn, db_name: &str) -> anyhow::Result<()> {
    master_db
        .execute_unprepared(&format!("drop database {db_name}"))
        .await?;
    tracing::info!("Dropped database {db_name}");
    Ok(())
}

/// Runs the provided test with a fresh database.
///
/// The database is dropped if the test succeeds, or in any case if the test binary
/// is run with the `--force-drop-db` flag.
pub async fn wrap<F, R>(test: F) -> anyhow::Result<<R as IntoResult>::Out>
where
    F: AsyncFnOnce(Database) -> R,
    R: IntoResult,
{
    init_env()?;
    let env = DbEnv::define();

    let master_db = sea_orm::Database::connect(&env.db_url.db_url.get()).await?;

    // On MySQL/MariaDB, a schema name with capital letters may produce the error
    // code 1932 (42S02) "Table 'X' doesn't exist in engine".
    let db_name = format!("_test_esports_{}", gen_random_str(10).to_lowercase());

    master_db
        .execute_unprepared(&format!("create database {db_name}"))
        .await?;
    tracing::info!("Created database {db_name}");

    let db = connect_to(&master_db, &db_name).await?;
    migration::Migrator::up(&db, None).await?;

    let db = Database {
        sql_conn: db,
        redis_pool: get_redis_pool(env.redis_url.redis_url.get())?,
    };
    let r = panic::AssertUnwindSafe(test(db)).catch_unwind().await;

    match r.map(IntoResult::into_result) {
        Ok(Ok(out)) => {
            drop_db(&master_db, &db_name).await?;
            Ok(out)
        }
        other => {
            if is_db_drop_forced() {
                drop_db(&master_db, &db_name).await?;
            } else {
                tracing::info!(
                    "Test failed, leaving database {db_name} as-is. \
                    Run with `{FORCE_DROP_FLAG}` to drop the database everytime."
                );
            }
            match other {
                Ok(Err(e)) => Err(e),
                Err(e) => panic::resume_unwind(e),
                Ok(Ok(_)) => unreachable!(),
            }
        }
    }
}
