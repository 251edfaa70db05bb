use std::path::PathBuf;

use entity::games;
use esports_lib::{
    Database,
    repo::games::{self as games_repo, GameData},
    validate::non_blank,
};
use sea_orm::{ColumnTrait as _, EntityTrait as _, QueryFilter as _};

/// The games played by most university clubs, inserted when no file is provided.
const DEFAULT_GAMES: [(&str, &str); 6] = [
    ("Valorant", "Tactical shooter"),
    ("League of Legends", "MOBA"),
    ("Counter-Strike 2", "Tactical shooter"),
    ("Mobile Legends: Bang Bang", "MOBA"),
    ("EA Sports FC", "Sports"),
    ("Rocket League", "Sports"),
];

#[derive(clap::Args, Debug)]
pub struct SeedGamesCommand {
    /// A CSV file with the `name`, `genre` and `description` columns.
    #[arg(long)]
    csv_file: Option<PathBuf>,
}

#[derive(serde::Deserialize, Debug)]
struct Row {
    name: String,
    genre: Option<String>,
    description: Option<String>,
}

fn read_rows(cmd: &SeedGamesCommand) -> anyhow::Result<Vec<Row>> {
    let Some(path) = &cmd.csv_file else {
        return Ok(DEFAULT_GAMES
            .iter()
            .map(|(name, genre)| Row {
                name: (*name).to_owned(),
                genre: Some((*genre).to_owned()),
                description: None,
            })
            .collect());
    };

    let rows = csv::Reader::from_path(path)?
        .into_deserialize()
        .collect::<Result<Vec<Row>, _>>()?;
    Ok(rows)
}

pub async fn seed_games(db: Database, cmd: SeedGamesCommand) -> anyhow::Result<()> {
    let rows = read_rows(&cmd)?;
    let mut inserted = 0;

    for (i, row) in rows.into_iter().enumerate() {
        let Some(name) = non_blank(Some(row.name)) else {
            tracing::warn!("Row {} has no name, skipping", i + 1);
            continue;
        };

        let exists = games::Entity::find()
            .filter(games::Column::Name.eq(&name))
            .one(&db.sql_conn)
            .await?
            .is_some();
        if exists {
            tracing::info!("Game `{name}` already exists, skipping");
            continue;
        }

        games_repo::insert(
            &db.sql_conn,
            GameData {
                name,
                genre: non_blank(row.genre),
                description: non_blank(row.description),
                image_url: None,
                is_active: true,
            },
        )
        .await?;
        inserted += 1;
    }

    println!("Inserted {inserted} game(s)");

    Ok(())
}
