use sea_orm::entity::prelude::*;

use crate::types::MemberRole;

/// A player of a registered team. Deleted along with its registration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, serde::Serialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub registration_id: i32,
    pub player_name: String,
    pub player_email: Option<String>,
    pub player_phone: Option<String>,
    pub student_id: Option<String>,
    /// The in-game username.
    pub game_username: Option<String>,
    pub role: MemberRole,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::registrations::Entity",
        from = "Column::RegistrationId",
        to = "super::registrations::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Registrations,
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
