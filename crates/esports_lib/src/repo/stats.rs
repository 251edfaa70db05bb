//! The counters shown on the home page.

use entity::{
    committee_members, events, gallery_items, games, registrations, sponsors, team_members,
    tournaments,
};
use sea_orm::{ColumnTrait as _, ConnectionTrait, EntityTrait as _, PaginatorTrait as _, QueryFilter as _};
use serde::Serialize;

use crate::error::EsportsResult;

/// The counters of the website.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Stats {
    /// The amount of tournaments.
    pub tournaments: u64,
    /// The amount of registrations, in any status.
    pub registrations: u64,
    /// The amount of registered players, captains included.
    pub players: u64,
    /// The amount of events.
    pub events: u64,
    /// The amount of active games.
    pub games: u64,
    /// The amount of active committee members.
    pub committee_members: u64,
    /// The amount of active sponsors.
    pub sponsors: u64,
    /// The amount of pictures in the gallery.
    pub gallery_items: u64,
}

/// Counts the rows of the website.
pub async fn get<C: ConnectionTrait>(conn: &C) -> EsportsResult<Stats> {
    Ok(Stats {
        tournaments: tournaments::Entity::find().count(conn).await?,
        registrations: registrations::Entity::find().count(conn).await?,
        players: team_members::Entity::find().count(conn).await?,
        events: events::Entity::find().count(conn).await?,
        games: games::Entity::find()
            .filter(games::Column::IsActive.eq(true))
            .count(conn)
            .await?,
        committee_members: committee_members::Entity::find()
            .filter(committee_members::Column::IsActive.eq(true))
            .count(conn)
            .await?,
        sponsors: sponsors::Entity::find()
            .filter(sponsors::Column::IsActive.eq(true))
            .count(conn)
            .await?,
        gallery_items: gallery_items::Entity::find().count(conn).await?,
    })
}
