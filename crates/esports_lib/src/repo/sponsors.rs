//! The sponsors of the club, grouped by partnership tier.

use entity::{sponsors, types::PartnershipType};
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryTrait as _,
};
use serde::Deserialize;

use crate::{
    error::EsportsResult,
    image::ImageInput,
    invalid, must, now,
    validate::{non_blank, required_str},
};

/// The filter of the sponsor list.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct SponsorFilter {
    /// Only returns the sponsors of this tier.
    pub partnership_type: Option<PartnershipType>,
    /// Only returns the active sponsors.
    #[serde(default)]
    pub active_only: bool,
}

/// The admin form of a sponsor.
#[derive(Deserialize, Debug, Default)]
pub struct SponsorForm {
    /// The name. Required.
    pub name: Option<String>,
    /// The tier of the partnership. Required.
    pub partnership_type: Option<String>,
    /// The website of the sponsor.
    pub website_url: Option<String>,
    /// The description.
    pub description: Option<String>,
    /// The position in its tier, lower first.
    pub display_order: Option<i32>,
    /// Whether the sponsor is shown on the website. Defaults to true.
    pub is_active: Option<bool>,
    /// The logo of the sponsor.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of a sponsor.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct SponsorData {
    pub name: String,
    pub partnership_type: PartnershipType,
    pub website_url: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    /// The URL of the logo. On update, `None` keeps the current one.
    pub logo_url: Option<String>,
}

impl SponsorForm {
    /// Checks the required fields of the form.
    pub fn validate(self) -> EsportsResult<(SponsorData, ImageInput)> {
        let name = required_str("name", self.name)?;
        let partnership_type = required_str("partnership_type", self.partnership_type)?;
        let partnership_type = partnership_type
            .parse::<PartnershipType>()
            .map_err(|e| invalid!("{e}"))?;

        let data = SponsorData {
            name,
            partnership_type,
            website_url: non_blank(self.website_url),
            description: non_blank(self.description),
            display_order: self.display_order.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            logo_url: None,
        };
        Ok((data, self.image))
    }
}

/// Returns the sponsors, from the highest tier to the lowest, then in display order.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: SponsorFilter,
) -> EsportsResult<Vec<sponsors::Model>> {
    let mut sponsors = sponsors::Entity::find()
        .apply_if(filter.partnership_type, |q, tier| {
            q.filter(sponsors::Column::PartnershipType.eq(tier))
        })
        .apply_if(filter.active_only.then_some(true), |q, active| {
            q.filter(sponsors::Column::IsActive.eq(active))
        })
        .all(conn)
        .await?;

    // The tiers are stored as text, so they can't be sorted by rank in SQL
    sponsors.sort_by_key(|s| (s.partnership_type, s.display_order, s.id));
    Ok(sponsors)
}

/// Returns the sponsor with the provided ID.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<sponsors::Model> {
    must::have_sponsor(conn, id).await
}

/// Inserts a new sponsor.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    data: SponsorData,
) -> EsportsResult<sponsors::Model> {
    let now = now();
    let sponsor = sponsors::ActiveModel {
        name: Set(data.name),
        logo_url: Set(data.logo_url),
        website_url: Set(data.website_url),
        description: Set(data.description),
        partnership_type: Set(data.partnership_type),
        display_order: Set(data.display_order),
        is_active: Set(data.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Added sponsor {} ({})", sponsor.id, sponsor.name);
    Ok(sponsor)
}

/// Updates the sponsor with the provided ID.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: SponsorData,
) -> EsportsResult<sponsors::Model> {
    let mut sponsor = must::have_sponsor(conn, id).await?.into_active_model();
    sponsor.name = Set(data.name);
    if let Some(url) = data.logo_url {
        sponsor.logo_url = Set(Some(url));
    }
    sponsor.website_url = Set(data.website_url);
    sponsor.description = Set(data.description);
    sponsor.partnership_type = Set(data.partnership_type);
    sponsor.display_order = Set(data.display_order);
    sponsor.is_active = Set(data.is_active);
    sponsor.updated_at = Set(now());
    let sponsor = sponsor.update(conn).await?;
    tracing::info!("Updated sponsor {id}");
    Ok(sponsor)
}

/// Deletes the sponsor with the provided ID.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<sponsors::Entity, _>(conn, "sponsor", id).await
}

#[cfg(test)]
mod tests {
    use entity::types::PartnershipType;

    use super::SponsorForm;

    #[test]
    fn tier_is_parsed() {
        let form = SponsorForm {
            name: Some("Acme".to_owned()),
            partnership_type: Some("gold".to_owned()),
            ..Default::default()
        };
        let (data, _) = form.validate().unwrap();
        assert_eq!(data.partnership_type, PartnershipType::Gold);

        let form = SponsorForm {
            name: Some("Acme".to_owned()),
            partnership_type: Some("diamond".to_owned()),
            ..Default::default()
        };
        assert!(form.validate().is_err());

        let form = SponsorForm {
            name: Some("Acme".to_owned()),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "partnership_type is required");
    }
}
