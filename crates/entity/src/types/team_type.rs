use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;

/// The kind of team signing up for a tournament.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    #[sea_orm(string_value = "solo")]
    Solo,
    #[sea_orm(string_value = "duo")]
    Duo,
    #[sea_orm(string_value = "squad")]
    Squad,
}

impl TeamType {
    /// Guesses the team type from the number of members sent along with the captain.
    ///
    /// This is only a display classification: nothing checks that the member count
    /// matches the expected size of the returned type.
    pub fn from_member_count(count: usize) -> Self {
        match count {
            0 => Self::Solo,
            1 => Self::Duo,
            _ => Self::Squad,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Duo => "duo",
            Self::Squad => "squad",
        }
    }
}

impl fmt::Display for TeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid team type `{0}`, expected solo, duo or squad")]
pub struct TeamTypeParseError(pub String);

impl FromStr for TeamType {
    type Err = TeamTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "duo" => Ok(Self::Duo),
            "squad" => Ok(Self::Squad),
            _ => Err(TeamTypeParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TeamType;

    #[test]
    fn derive_from_member_count() {
        assert_eq!(TeamType::from_member_count(0), TeamType::Solo);
        assert_eq!(TeamType::from_member_count(1), TeamType::Duo);
        assert_eq!(TeamType::from_member_count(2), TeamType::Squad);
        assert_eq!(TeamType::from_member_count(4), TeamType::Squad);
        assert_eq!(TeamType::from_member_count(12), TeamType::Squad);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Squad".parse::<TeamType>().ok(), Some(TeamType::Squad));
        assert_eq!(" duo ".parse::<TeamType>().ok(), Some(TeamType::Duo));
        assert!("trio".parse::<TeamType>().is_err());
    }
}
