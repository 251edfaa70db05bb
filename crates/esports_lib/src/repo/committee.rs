//! The committee members of the club.

use entity::committee_members;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _, QueryTrait as _,
};
use serde::Deserialize;

use crate::{
    error::EsportsResult,
    image::ImageInput,
    must, now,
    validate::{non_blank, required_str},
};

/// The admin form of a committee member.
#[derive(Deserialize, Debug, Default)]
pub struct CommitteeForm {
    /// The name. Required.
    pub name: Option<String>,
    /// The position in the committee. Required.
    pub position: Option<String>,
    /// The department of the university.
    pub department: Option<String>,
    /// A short biography.
    pub bio: Option<String>,
    /// The contact email.
    pub email: Option<String>,
    /// A link to the LinkedIn profile.
    pub linkedin_url: Option<String>,
    /// The position in the list, lower first.
    pub display_order: Option<i32>,
    /// Whether the member is shown on the website. Defaults to true.
    pub is_active: Option<bool>,
    /// The picture of the member.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of a committee member.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct CommitteeData {
    pub name: String,
    pub position: String,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    /// The URL of the picture. On update, `None` keeps the current one.
    pub image_url: Option<String>,
}

impl CommitteeForm {
    /// Checks the required fields of the form.
    pub fn validate(self) -> EsportsResult<(CommitteeData, ImageInput)> {
        let data = CommitteeData {
            name: required_str("name", self.name)?,
            position: required_str("position", self.position)?,
            department: non_blank(self.department),
            bio: non_blank(self.bio),
            email: non_blank(self.email),
            linkedin_url: non_blank(self.linkedin_url),
            display_order: self.display_order.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            image_url: None,
        };
        Ok((data, self.image))
    }
}

/// Returns the committee members, in display order.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    active_only: bool,
) -> EsportsResult<Vec<committee_members::Model>> {
    let members = committee_members::Entity::find()
        .apply_if(active_only.then_some(true), |q, active| {
            q.filter(committee_members::Column::IsActive.eq(active))
        })
        .order_by_asc(committee_members::Column::DisplayOrder)
        .order_by_asc(committee_members::Column::Id)
        .all(conn)
        .await?;
    Ok(members)
}

/// Returns the committee member with the provided ID.
pub async fn get<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<committee_members::Model> {
    must::have_committee_member(conn, id).await
}

/// Inserts a new committee member.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    data: CommitteeData,
) -> EsportsResult<committee_members::Model> {
    let now = now();
    let member = committee_members::ActiveModel {
        name: Set(data.name),
        position: Set(data.position),
        department: Set(data.department),
        bio: Set(data.bio),
        image_url: Set(data.image_url),
        email: Set(data.email),
        linkedin_url: Set(data.linkedin_url),
        display_order: Set(data.display_order),
        is_active: Set(data.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Added committee member {} ({})", member.id, member.name);
    Ok(member)
}

/// Updates the committee member with the provided ID.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: CommitteeData,
) -> EsportsResult<committee_members::Model> {
    let mut member = must::have_committee_member(conn, id)
        .await?
        .into_active_model();
    member.name = Set(data.name);
    member.position = Set(data.position);
    member.department = Set(data.department);
    member.bio = Set(data.bio);
    if let Some(url) = data.image_url {
        member.image_url = Set(Some(url));
    }
    member.email = Set(data.email);
    member.linkedin_url = Set(data.linkedin_url);
    member.display_order = Set(data.display_order);
    member.is_active = Set(data.is_active);
    member.updated_at = Set(now());
    let member = member.update(conn).await?;
    tracing::info!("Updated committee member {id}");
    Ok(member)
}

/// Deletes the committee member with the provided ID.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<committee_members::Entity, _>(conn, "committee member", id).await
}

#[cfg(test)]
mod tests {
    use super::CommitteeForm;

    #[test]
    fn position_is_required() {
        let form = CommitteeForm {
            name: Some("Alice".to_owned()),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "position is required");
    }
}
