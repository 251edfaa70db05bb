//! The tournaments, with the game they belong to and their registration count.

use chrono::NaiveDateTime;
use entity::{games, registrations, tournaments};
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    FromQueryResult, IntoActiveModel as _, JoinType, QueryFilter as _, QueryOrder as _,
    QuerySelect as _, QueryTrait as _, RelationTrait as _, Select,
};
use serde::{Deserialize, Serialize};

use crate::{
    date,
    error::{EsportsError, EsportsResult},
    image::ImageInput,
    must, now,
    page::Page,
    validate::{end_not_before_start, non_blank, required, required_str},
};

/// The status of a tournament when none is provided.
pub const DEFAULT_STATUS: &str = "upcoming";

/// A tournament row, joined with its game and its live registration count.
///
/// The `current_participants` field is the counter stored in the tournament row, incremented
/// by each registration, while `registration_count` is computed from the registrations table.
#[allow(missing_docs)]
#[derive(Debug, Serialize, FromQueryResult)]
pub struct TournamentListItem {
    pub id: i32,
    pub game_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub prize_pool: Option<String>,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub game_name: Option<String>,
    pub game_genre: Option<String>,
    pub registration_count: i64,
}

/// The filter of the tournament list.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct TournamentFilter {
    /// Only returns the tournaments with this status.
    pub status: Option<String>,
    /// Only returns the tournaments of this game.
    pub game_id: Option<i32>,
}

/// The admin form of a tournament.
#[derive(Deserialize, Debug, Default)]
pub struct TournamentForm {
    /// The game of the tournament. Required.
    pub game_id: Option<i32>,
    /// The name. Required.
    pub name: Option<String>,
    /// The description.
    pub description: Option<String>,
    /// The start date. Required.
    #[serde(default, deserialize_with = "date::deserialize_opt")]
    pub start_date: Option<NaiveDateTime>,
    /// The end date, which can't be before the start date.
    #[serde(default, deserialize_with = "date::deserialize_opt")]
    pub end_date: Option<NaiveDateTime>,
    /// The prize pool, as free text.
    pub prize_pool: Option<String>,
    /// The maximum amount of participants. This is only informative.
    pub max_participants: Option<i32>,
    /// The status, as free text. Defaults to `upcoming`.
    pub status: Option<String>,
    /// The poster of the tournament.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of a tournament.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct TournamentData {
    pub game_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub prize_pool: Option<String>,
    pub max_participants: Option<i32>,
    pub status: String,
    /// The URL of the poster. On update, `None` keeps the current one.
    pub poster_url: Option<String>,
}

impl TournamentForm {
    /// Checks the required fields of the form, and the order of its dates.
    pub fn validate(self) -> EsportsResult<(TournamentData, ImageInput)> {
        let name = required_str("name", self.name)?;
        let game_id = required("game_id", self.game_id)?;
        let start_date = required("start_date", self.start_date)?;
        end_not_before_start(start_date, self.end_date)?;

        let data = TournamentData {
            game_id,
            name,
            description: non_blank(self.description),
            start_date,
            end_date: self.end_date,
            prize_pool: non_blank(self.prize_pool),
            max_participants: self.max_participants,
            status: non_blank(self.status).unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
            poster_url: None,
        };
        Ok((data, self.image))
    }
}

fn select_list_items() -> Select<tournaments::Entity> {
    tournaments::Entity::find()
        .column_as(games::Column::Name, "game_name")
        .column_as(games::Column::Genre, "game_genre")
        .column_as(registrations::Column::Id.count(), "registration_count")
        .join(JoinType::LeftJoin, tournaments::Relation::Games.def())
        .join(JoinType::LeftJoin, tournaments::Relation::Registrations.def())
        .group_by(tournaments::Column::Id)
        .group_by(games::Column::Name)
        .group_by(games::Column::Genre)
}

/// Returns the tournaments, the most recent first.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: TournamentFilter,
    page: Page,
) -> EsportsResult<Vec<TournamentListItem>> {
    let query = select_list_items()
        .apply_if(non_blank(filter.status), |q, status| {
            q.filter(tournaments::Column::Status.eq(status))
        })
        .apply_if(filter.game_id, |q, game_id| {
            q.filter(tournaments::Column::GameId.eq(game_id))
        })
        .order_by_desc(tournaments::Column::StartDate)
        .order_by_asc(tournaments::Column::Id);

    let items = page
        .apply(query)
        .into_model::<TournamentListItem>()
        .all(conn)
        .await?;
    Ok(items)
}

/// Returns the tournament with the provided ID, joined with its game and registration count.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<TournamentListItem> {
    select_list_items()
        .filter(tournaments::Column::Id.eq(id))
        .into_model::<TournamentListItem>()
        .one(conn)
        .await?
        .ok_or_else(|| EsportsError::not_found("tournament", id))
}

/// Inserts a new tournament.
///
/// Returns a [`EsportsError::NotFound`] error if the game doesn't exist.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    data: TournamentData,
) -> EsportsResult<tournaments::Model> {
    must::have_game(conn, data.game_id).await?;

    let now = now();
    let tournament = tournaments::ActiveModel {
        game_id: Set(data.game_id),
        name: Set(data.name),
        description: Set(data.description),
        poster_url: Set(data.poster_url),
        start_date: Set(data.start_date),
        end_date: Set(data.end_date),
        prize_pool: Set(data.prize_pool),
        max_participants: Set(data.max_participants),
        current_participants: Set(0),
        status: Set(data.status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!("Added tournament {} ({})", tournament.id, tournament.name);
    Ok(tournament)
}

/// Updates the tournament with the provided ID.
///
/// The participant counter is left untouched.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: TournamentData,
) -> EsportsResult<tournaments::Model> {
    let tournament = must::have_tournament(conn, id).await?;
    must::have_game(conn, data.game_id).await?;

    let mut tournament = tournament.into_active_model();
    tournament.game_id = Set(data.game_id);
    tournament.name = Set(data.name);
    tournament.description = Set(data.description);
    if let Some(url) = data.poster_url {
        tournament.poster_url = Set(Some(url));
    }
    tournament.start_date = Set(data.start_date);
    tournament.end_date = Set(data.end_date);
    tournament.prize_pool = Set(data.prize_pool);
    tournament.max_participants = Set(data.max_participants);
    tournament.status = Set(data.status);
    tournament.updated_at = Set(now());

    let tournament = tournament.update(conn).await?;
    tracing::info!("Updated tournament {id}");
    Ok(tournament)
}

/// Deletes the tournament with the provided ID, along with its registrations.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<tournaments::Entity, _>(conn, "tournament", id).await
}

/// Returns the next tournament that isn't cancelled and starts after `after`.
pub async fn next_upcoming<C: ConnectionTrait>(
    conn: &C,
    after: NaiveDateTime,
) -> EsportsResult<Option<tournaments::Model>> {
    let tournament = tournaments::Entity::find()
        .filter(tournaments::Column::StartDate.gt(after))
        .filter(tournaments::Column::Status.ne("cancelled"))
        .order_by_asc(tournaments::Column::StartDate)
        .one(conn)
        .await?;
    Ok(tournament)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_STATUS, TournamentForm};

    #[test]
    fn required_fields() {
        let form: TournamentForm = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "start_date": "2026-04-01T10:00",
        }))
        .unwrap();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "game_id is required");

        let form: TournamentForm = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "game_id": 2,
        }))
        .unwrap();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "start_date is required");
    }

    #[test]
    fn end_before_start_is_refused() {
        let form: TournamentForm = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "game_id": 2,
            "start_date": "2026-04-02",
            "end_date": "2026-04-01",
        }))
        .unwrap();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "end date cannot be before start date");
    }

    #[test]
    fn status_defaults_to_upcoming() {
        let form: TournamentForm = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "game_id": 2,
            "start_date": "2026-04-01 10:00:00",
            "status": "",
        }))
        .unwrap();
        let (data, image) = form.validate().unwrap();
        assert_eq!(data.status, DEFAULT_STATUS);
        assert!(image.is_empty());
    }
}
