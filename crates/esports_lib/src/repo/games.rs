//! The games, used to categorize the tournaments.

use entity::games;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _, QueryTrait as _,
};
use serde::Deserialize;

use crate::{
    error::EsportsResult,
    image::ImageInput,
    must, now,
    validate::{non_blank, required_str},
};

/// The filter of the game list.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct GameFilter {
    /// Whether to only return the active games.
    #[serde(default)]
    pub active_only: bool,
}

/// The admin form of a game.
#[derive(Deserialize, Debug, Default)]
pub struct GameForm {
    /// The name of the game. Required.
    pub name: Option<String>,
    /// Its genre.
    pub genre: Option<String>,
    /// Its description.
    pub description: Option<String>,
    /// Whether the game is shown on the website. Defaults to true.
    pub is_active: Option<bool>,
    /// The image of the game.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of a game.
#[derive(Debug, Clone)]
pub struct GameData {
    /// The name.
    pub name: String,
    /// The genre.
    pub genre: Option<String>,
    /// The description.
    pub description: Option<String>,
    /// The URL of the image. On update, `None` keeps the current one.
    pub image_url: Option<String>,
    /// The visibility.
    pub is_active: bool,
}

impl GameForm {
    /// Checks the required fields of the form.
    pub fn validate(self) -> EsportsResult<(GameData, ImageInput)> {
        let data = GameData {
            name: required_str("name", self.name)?,
            genre: non_blank(self.genre),
            description: non_blank(self.description),
            image_url: None,
            is_active: self.is_active.unwrap_or(true),
        };
        Ok((data, self.image))
    }
}

/// Returns the games, sorted by name.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: GameFilter,
) -> EsportsResult<Vec<games::Model>> {
    let games = games::Entity::find()
        .apply_if(filter.active_only.then_some(true), |q, active| {
            q.filter(games::Column::IsActive.eq(active))
        })
        .order_by_asc(games::Column::Name)
        .all(conn)
        .await?;
    Ok(games)
}

/// Returns the game with the provided ID.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<games::Model> {
    must::have_game(conn, id).await
}

/// Inserts a new game.
pub async fn insert<C: ConnectionTrait>(conn: &C, data: GameData) -> EsportsResult<games::Model> {
    let now = now();
    let game = games::ActiveModel {
        name: Set(data.name),
        genre: Set(data.genre),
        description: Set(data.description),
        image_url: Set(data.image_url),
        is_active: Set(data.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Added game {} ({})", game.id, game.name);
    Ok(game)
}

/// Updates the game with the provided ID.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: GameData,
) -> EsportsResult<games::Model> {
    let mut game = must::have_game(conn, id).await?.into_active_model();
    game.name = Set(data.name);
    game.genre = Set(data.genre);
    game.description = Set(data.description);
    if let Some(url) = data.image_url {
        game.image_url = Set(Some(url));
    }
    game.is_active = Set(data.is_active);
    game.updated_at = Set(now());
    let game = game.update(conn).await?;
    tracing::info!("Updated game {id}");
    Ok(game)
}

/// Deletes the game with the provided ID.
///
/// This fails if a tournament still references the game.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<games::Entity, _>(conn, "game", id).await
}
