//! The pictures of the gallery, optionally attached to an event.

use entity::gallery_items;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _, QueryTrait as _,
};
use serde::Deserialize;

use crate::{
    error::EsportsResult,
    image::ImageInput,
    must, now,
    page::Page,
    validate::{missing, non_blank, required_str},
};

/// The filter of the gallery.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct GalleryFilter {
    /// Only returns the items of this category.
    pub category: Option<String>,
    /// Only returns the items attached to this event.
    pub event_id: Option<i32>,
}

/// The admin form of a gallery item.
#[derive(Deserialize, Debug, Default)]
pub struct GalleryForm {
    /// The title. Required.
    pub title: Option<String>,
    /// The description.
    pub description: Option<String>,
    /// The category. Required.
    pub category: Option<String>,
    /// The event the picture was taken at.
    pub event_id: Option<i32>,
    /// The position in the gallery, lower first.
    pub display_order: Option<i32>,
    /// The picture itself. Required when adding an item.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of a gallery item.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct GalleryData {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub event_id: Option<i32>,
    pub display_order: i32,
    /// The URL of the picture. Required on insert, on update `None` keeps the current one.
    pub image_url: Option<String>,
}

impl GalleryForm {
    /// Checks the required fields of the form.
    ///
    /// The picture is only required when adding an item (`require_image`).
    pub fn validate(self, require_image: bool) -> EsportsResult<(GalleryData, ImageInput)> {
        let title = required_str("title", self.title)?;
        let category = required_str("category", self.category)?;
        if require_image && self.image.is_empty() {
            return Err(missing("image"));
        }

        let data = GalleryData {
            title,
            description: non_blank(self.description),
            category,
            event_id: self.event_id,
            display_order: self.display_order.unwrap_or(0),
            image_url: None,
        };
        Ok((data, self.image))
    }
}

/// Returns the gallery items, in display order then the most recent first.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: GalleryFilter,
    page: Page,
) -> EsportsResult<Vec<gallery_items::Model>> {
    let query = gallery_items::Entity::find()
        .apply_if(non_blank(filter.category), |q, category| {
            q.filter(gallery_items::Column::Category.eq(category))
        })
        .apply_if(filter.event_id, |q, event_id| {
            q.filter(gallery_items::Column::EventId.eq(event_id))
        })
        .order_by_asc(gallery_items::Column::DisplayOrder)
        .order_by_desc(gallery_items::Column::CreatedAt)
        .order_by_desc(gallery_items::Column::Id);

    let items = page.apply(query).all(conn).await?;
    Ok(items)
}

/// Returns the gallery item with the provided ID.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<gallery_items::Model> {
    must::have_gallery_item(conn, id).await
}

/// Inserts a new gallery item.
///
/// Returns a [`EsportsError::NotFound`](crate::error::EsportsError::NotFound) error
/// if the event doesn't exist.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    data: GalleryData,
) -> EsportsResult<gallery_items::Model> {
    if let Some(event_id) = data.event_id {
        must::have_event(conn, event_id).await?;
    }
    let image_url = data.image_url.ok_or_else(|| missing("image"))?;

    let now = now();
    let item = gallery_items::ActiveModel {
        title: Set(data.title),
        description: Set(data.description),
        image_url: Set(image_url),
        category: Set(data.category),
        event_id: Set(data.event_id),
        display_order: Set(data.display_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Added gallery item {} ({})", item.id, item.title);
    Ok(item)
}

/// Updates the gallery item with the provided ID.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: GalleryData,
) -> EsportsResult<gallery_items::Model> {
    let item = must::have_gallery_item(conn, id).await?;
    if let Some(event_id) = data.event_id {
        must::have_event(conn, event_id).await?;
    }

    let mut item = item.into_active_model();
    item.title = Set(data.title);
    item.description = Set(data.description);
    if let Some(url) = data.image_url {
        item.image_url = Set(url);
    }
    item.category = Set(data.category);
    item.event_id = Set(data.event_id);
    item.display_order = Set(data.display_order);
    item.updated_at = Set(now());
    let item = item.update(conn).await?;
    tracing::info!("Updated gallery item {id}");
    Ok(item)
}

/// Deletes the gallery item with the provided ID.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<gallery_items::Entity, _>(conn, "gallery item", id).await
}
