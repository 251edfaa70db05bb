//! Read and moderation of the tournament registrations.
//!
//! The registrations are created by the [`registration`](crate::registration) workflow.

use entity::{registrations, team_members, tournaments, types::RegistrationStatus};
use itertools::Itertools as _;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _, QueryTrait as _,
};
use serde::{Deserialize, Serialize};

use crate::{error::EsportsResult, must, page::Page};

/// The filter of the registration list.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct RegistrationFilter {
    /// Only returns the registrations of this tournament.
    pub tournament_id: Option<i32>,
    /// Only returns the registrations with this status.
    pub status: Option<RegistrationStatus>,
}

/// A registration, with the name of its tournament and its team members.
#[derive(Debug, Serialize)]
pub struct RegistrationWithMembers {
    /// The registration row.
    #[serde(flatten)]
    pub registration: registrations::Model,
    /// The name of the tournament.
    pub tournament_name: Option<String>,
    /// The team members, the captain first.
    pub members: Vec<team_members::Model>,
}

async fn with_members<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(registrations::Model, Option<tournaments::Model>)>,
) -> EsportsResult<Vec<RegistrationWithMembers>> {
    let ids = rows.iter().map(|(r, _)| r.id).collect_vec();
    let mut members = if ids.is_empty() {
        Default::default()
    } else {
        team_members::Entity::find()
            .filter(team_members::Column::RegistrationId.is_in(ids))
            .order_by_asc(team_members::Column::Id)
            .all(conn)
            .await?
            .into_iter()
            .into_group_map_by(|m| m.registration_id)
    };

    let out = rows
        .into_iter()
        .map(|(registration, tournament)| RegistrationWithMembers {
            members: members.remove(&registration.id).unwrap_or_default(),
            tournament_name: tournament.map(|t| t.name),
            registration,
        })
        .collect();
    Ok(out)
}

/// Returns the registrations with their members, the most recent first.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: RegistrationFilter,
    page: Page,
) -> EsportsResult<Vec<RegistrationWithMembers>> {
    let query = registrations::Entity::find()
        .apply_if(filter.tournament_id, |q, id| {
            q.filter(registrations::Column::TournamentId.eq(id))
        })
        .apply_if(filter.status, |q, status| {
            q.filter(registrations::Column::Status.eq(status))
        })
        .order_by_desc(registrations::Column::RegisteredAt)
        .order_by_desc(registrations::Column::Id);

    let rows = page
        .apply(query)
        .find_also_related(tournaments::Entity)
        .all(conn)
        .await?;
    with_members(conn, rows).await
}

/// Returns the registration with the provided ID, with its members.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<RegistrationWithMembers> {
    let registration = must::have_registration(conn, id).await?;
    let tournament = tournaments::Entity::find_by_id(registration.tournament_id)
        .one(conn)
        .await?;
    let mut out = with_members(conn, vec![(registration, tournament)]).await?;
    out.pop()
        .ok_or_else(|| crate::internal!("registration {id} must be in the list"))
}

/// Returns all the registrations of a tournament with their members, in registration order.
pub async fn all_of_tournament<C: ConnectionTrait>(
    conn: &C,
    tournament_id: i32,
) -> EsportsResult<Vec<RegistrationWithMembers>> {
    let rows = registrations::Entity::find()
        .filter(registrations::Column::TournamentId.eq(tournament_id))
        .order_by_asc(registrations::Column::Id)
        .find_also_related(tournaments::Entity)
        .all(conn)
        .await?;
    with_members(conn, rows).await
}

/// Changes the status of the registration with the provided ID.
pub async fn update_status<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    status: RegistrationStatus,
) -> EsportsResult<registrations::Model> {
    let mut registration = must::have_registration(conn, id)
        .await?
        .into_active_model();
    registration.status = Set(status);
    let registration = registration.update(conn).await?;
    tracing::info!("Registration {id} is now {status}");
    Ok(registration)
}

/// Deletes the registration with the provided ID, along with its team members.
///
/// The participant counter of the tournament is left untouched.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<registrations::Entity, _>(conn, "registration", id).await
}
