use sea_orm::entity::prelude::*;

/// A tournament organized by the community.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, serde::Serialize)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The game the tournament is played on.
    pub game_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
    /// Free text, e.g. "RM 500" or "Gaming peripherals".
    pub prize_pool: Option<String>,
    pub max_participants: Option<i32>,
    /// Denormalized counter, incremented by one on each registration.
    ///
    /// It isn't recomputed from the registrations table, so it may drift from the actual count.
    pub current_participants: i32,
    /// Free text status, usually upcoming, ongoing, completed or cancelled.
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Games,
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Games.def()
    }
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
