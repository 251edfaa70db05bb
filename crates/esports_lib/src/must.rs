//! This module contains utility functions used to retrieve some rows from the database,
//! that must exist. This is why it is called `must`.
//!
//! Unlike the Rust conventions, when such a row doesn't exist, the returned value isn't
//! `Option::None` but the [`EsportsError::NotFound`] error. This makes the handlers cleaner,
//! because at some point we want things to already exist without checking it repeatedly
//! and returning the error to the client.

use entity::{
    committee_members, events, gallery_items, games, registrations, sponsors, tournaments,
};
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

use crate::error::{EsportsError, EsportsResult};

/// Returns the row of the provided entity with the provided ID, or a [`EsportsError::NotFound`]
/// error labelled with `kind`.
pub async fn have<E, C>(conn: &C, kind: &'static str, id: i32) -> EsportsResult<E::Model>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| EsportsError::not_found(kind, id))
}

/// Returns the tournament with the provided ID.
pub async fn have_tournament<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<tournaments::Model> {
    have::<tournaments::Entity, _>(conn, "tournament", id).await
}

/// Returns the game with the provided ID.
pub async fn have_game<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<games::Model> {
    have::<games::Entity, _>(conn, "game", id).await
}

/// Returns the event with the provided ID.
pub async fn have_event<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<events::Model> {
    have::<events::Entity, _>(conn, "event", id).await
}

/// Returns the registration with the provided ID.
pub async fn have_registration<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<registrations::Model> {
    have::<registrations::Entity, _>(conn, "registration", id).await
}

/// Returns the committee member with the provided ID.
pub async fn have_committee_member<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<committee_members::Model> {
    have::<committee_members::Entity, _>(conn, "committee member", id).await
}

/// Returns the gallery item with the provided ID.
pub async fn have_gallery_item<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<gallery_items::Model> {
    have::<gallery_items::Entity, _>(conn, "gallery item", id).await
}

/// Returns the sponsor with the provided ID.
pub async fn have_sponsor<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<sponsors::Model> {
    have::<sponsors::Entity, _>(conn, "sponsor", id).await
}
