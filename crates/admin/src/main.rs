use clap::Parser;
use esports_lib::{Database, DbEnv, LibEnv};
use mkenv::prelude::*;

use self::{
    create_admin::CreateAdminCommand, export::ExportCommand, participants::ParticipantsCommand,
    seed_games::SeedGamesCommand,
};

mod create_admin;
mod export;
mod participants;
mod seed_games;

/// Operator tool of the esports community website.
#[derive(clap::Parser)]
enum Command {
    /// Creates a new admin account.
    CreateAdmin(CreateAdminCommand),
    /// Inserts the games that don't exist yet.
    SeedGames(SeedGamesCommand),
    /// Compares the stored participant counters with the actual registrations.
    Participants(ParticipantsCommand),
    /// Exports the registrations of a tournament as CSV.
    ExportRegistrations(ExportCommand),
}

mkenv::make_config! {
    struct Env {
        db_env: { DbEnv },
        lib_env: { LibEnv },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err.into()),
        _ => (),
    }
    // The standard output is kept for the exported data
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to init tracing_subscriber: {e}"))?;
    let env = Env::define();
    env.init();
    esports_lib::init_env(env.lib_env);

    let cmd = Command::parse();

    let db = Database::from_db_url(
        env.db_env.db_url.db_url.get(),
        env.db_env.redis_url.redis_url.get(),
    )
    .await?;

    match cmd {
        Command::CreateAdmin(cmd) => create_admin::create_admin(db, cmd).await,
        Command::SeedGames(cmd) => seed_games::seed_games(db, cmd).await,
        Command::Participants(cmd) => participants::participants(db, cmd).await,
        Command::ExportRegistrations(cmd) => export::export(db, cmd).await,
    }
}
