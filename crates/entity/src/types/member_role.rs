use std::fmt;

use sea_orm::entity::prelude::*;

/// The role of a player inside a registered team.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// The registering player. There is exactly one per registration.
    #[sea_orm(string_value = "captain")]
    Captain,
    #[default]
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "substitute")]
    Substitute,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Captain => "captain",
            Self::Member => "member",
            Self::Substitute => "substitute",
        })
    }
}
