use sea_orm::entity::prelude::*;

use crate::types::{RegistrationStatus, TeamType};

/// A sign-up of a team (or a single player) to a tournament.
///
/// The captain fields are duplicated in the team member list with the
/// [`Captain`](crate::types::MemberRole::Captain) role.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, serde::Serialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tournament_id: i32,
    pub team_name: Option<String>,
    pub team_type: TeamType,
    pub captain_name: String,
    pub captain_email: String,
    pub captain_phone: Option<String>,
    pub captain_student_id: Option<String>,
    pub captain_game_username: Option<String>,
    pub status: RegistrationStatus,
    pub registered_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tournaments::Entity",
        from = "Column::TournamentId",
        to = "super::tournaments::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Tournaments,
    #[sea_orm(has_many = "super::team_members::Entity")]
    TeamMembers,
}

impl Related<super::tournaments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournaments.def()
    }
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
