//! The events of the club (meetups, workshops, watch parties...).

use chrono::NaiveDateTime;
use entity::events;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _, QueryTrait as _,
};
use serde::Deserialize;

use crate::{
    date,
    error::EsportsResult,
    image::ImageInput,
    must, now,
    page::Page,
    validate::{non_blank, not_in_past, required, required_str},
};

/// The filter of the event list.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct EventFilter {
    /// Only returns the events of this type.
    pub event_type: Option<String>,
    /// Only returns the events that didn't happen yet, the nearest first.
    #[serde(default, alias = "upcoming")]
    pub upcoming_only: bool,
    /// Only returns the featured events.
    #[serde(default)]
    pub featured_only: bool,
}

/// The admin form of an event.
#[derive(Deserialize, Debug, Default)]
pub struct EventForm {
    /// The title. Required.
    pub title: Option<String>,
    /// The description.
    pub description: Option<String>,
    /// The date of the event. Required, and can't be in the past when adding an event.
    #[serde(default, deserialize_with = "date::deserialize_opt")]
    pub event_date: Option<NaiveDateTime>,
    /// The location.
    pub location: Option<String>,
    /// The type of event. Required.
    pub event_type: Option<String>,
    /// A link to an external registration form.
    pub registration_link: Option<String>,
    /// Whether the event is featured on the home page.
    pub is_featured: Option<bool>,
    /// The image of the event.
    #[serde(flatten)]
    pub image: ImageInput,
}

/// The validated data of an event.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct EventData {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDateTime,
    pub location: Option<String>,
    pub event_type: String,
    pub registration_link: Option<String>,
    pub is_featured: bool,
    /// The URL of the image. On update, `None` keeps the current one.
    pub image_url: Option<String>,
}

/// Whether an event form is used to add or to edit an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// A new event is added.
    Add,
    /// An existing event is edited.
    Edit,
}

impl EventForm {
    /// Checks the required fields of the form.
    ///
    /// When adding an event, its date can't be in the past compared to `now`.
    pub fn validate(
        self,
        mode: FormMode,
        now: NaiveDateTime,
    ) -> EsportsResult<(EventData, ImageInput)> {
        let title = required_str("title", self.title)?;
        let event_date = required("event_date", self.event_date)?;
        let event_type = required_str("event_type", self.event_type)?;
        if mode == FormMode::Add {
            not_in_past("event_date", event_date, now)?;
        }

        let data = EventData {
            title,
            description: non_blank(self.description),
            event_date,
            location: non_blank(self.location),
            event_type,
            registration_link: non_blank(self.registration_link),
            is_featured: self.is_featured.unwrap_or(false),
            image_url: None,
        };
        Ok((data, self.image))
    }
}

/// Returns the events, the most recent first, or the nearest first for the upcoming events.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: EventFilter,
    page: Page,
) -> EsportsResult<Vec<events::Model>> {
    let query = events::Entity::find()
        .apply_if(non_blank(filter.event_type), |q, event_type| {
            q.filter(events::Column::EventType.eq(event_type))
        })
        .apply_if(filter.featured_only.then_some(true), |q, featured| {
            q.filter(events::Column::IsFeatured.eq(featured))
        });

    let query = if filter.upcoming_only {
        query
            .filter(events::Column::EventDate.gte(now()))
            .order_by_asc(events::Column::EventDate)
    } else {
        query.order_by_desc(events::Column::EventDate)
    };

    let events = page.apply(query).all(conn).await?;
    Ok(events)
}

/// Returns the event with the provided ID.
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult<events::Model> {
    must::have_event(conn, id).await
}

/// Inserts a new event.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    data: EventData,
) -> EsportsResult<events::Model> {
    let now = now();
    let event = events::ActiveModel {
        title: Set(data.title),
        description: Set(data.description),
        event_date: Set(data.event_date),
        location: Set(data.location),
        event_type: Set(data.event_type),
        image_url: Set(data.image_url),
        registration_link: Set(data.registration_link),
        is_featured: Set(data.is_featured),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Added event {} ({})", event.id, event.title);
    Ok(event)
}

/// Updates the event with the provided ID.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    data: EventData,
) -> EsportsResult<events::Model> {
    let mut event = must::have_event(conn, id).await?.into_active_model();
    event.title = Set(data.title);
    event.description = Set(data.description);
    event.event_date = Set(data.event_date);
    event.location = Set(data.location);
    event.event_type = Set(data.event_type);
    if let Some(url) = data.image_url {
        event.image_url = Set(Some(url));
    }
    event.registration_link = Set(data.registration_link);
    event.is_featured = Set(data.is_featured);
    event.updated_at = Set(now());
    let event = event.update(conn).await?;
    tracing::info!("Updated event {id}");
    Ok(event)
}

/// Deletes the event with the provided ID. Its gallery items are kept, without event.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> EsportsResult {
    super::delete_by_id::<events::Entity, _>(conn, "event", id).await
}

/// Returns the next event happening after `after`.
pub async fn next_upcoming<C: ConnectionTrait>(
    conn: &C,
    after: NaiveDateTime,
) -> EsportsResult<Option<events::Model>> {
    let event = events::Entity::find()
        .filter(events::Column::EventDate.gt(after))
        .order_by_asc(events::Column::EventDate)
        .one(conn)
        .await?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{EventForm, FormMode};

    fn form(date: &str) -> EventForm {
        serde_json::from_value(serde_json::json!({
            "title": "LAN party",
            "event_type": "social",
            "event_date": date,
        }))
        .unwrap()
    }

    #[test]
    fn past_date_is_refused_on_add_only() {
        let now = NaiveDate::from_ymd_opt(2026, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let err = form("2026-04-01T18:00").validate(FormMode::Add, now).unwrap_err();
        assert_eq!(err.to_string(), "event_date cannot be in the past");

        assert!(form("2026-04-01T18:00").validate(FormMode::Edit, now).is_ok());
        assert!(form("2026-06-01T18:00").validate(FormMode::Add, now).is_ok());
    }

    #[test]
    fn type_is_required() {
        let form: EventForm = serde_json::from_value(serde_json::json!({
            "title": "LAN party",
            "event_date": "2030-01-01",
        }))
        .unwrap();
        let err = form
            .validate(FormMode::Add, crate::now())
            .unwrap_err();
        assert_eq!(err.to_string(), "event_type is required");
    }
}
