use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;

/// The sponsor tier, only used to group sponsors when displaying them.
///
/// The declaration order is the display order, from the highest tier to the lowest.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PartnershipType {
    #[sea_orm(string_value = "platinum")]
    Platinum,
    #[sea_orm(string_value = "gold")]
    Gold,
    #[sea_orm(string_value = "silver")]
    Silver,
    #[sea_orm(string_value = "bronze")]
    Bronze,
}

impl fmt::Display for PartnershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Platinum => "platinum",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid partnership type `{0}`, expected platinum, gold, silver or bronze")]
pub struct PartnershipTypeParseError(pub String);

impl FromStr for PartnershipType {
    type Err = PartnershipTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "platinum" => Ok(Self::Platinum),
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "bronze" => Ok(Self::Bronze),
            _ => Err(PartnershipTypeParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PartnershipType;

    #[test]
    fn tiers_sort_from_highest() {
        let mut tiers = vec![
            PartnershipType::Bronze,
            PartnershipType::Platinum,
            PartnershipType::Silver,
            PartnershipType::Gold,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            [
                PartnershipType::Platinum,
                PartnershipType::Gold,
                PartnershipType::Silver,
                PartnershipType::Bronze
            ]
        );
    }
}
