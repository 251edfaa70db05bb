use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use esports_lib::{
    Database,
    image::ImageStore, now,
    page::PageInput,
    repo::events::{self, EventFilter, EventForm, FormMode},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn events_scope() -> Scope {
    web::scope("/events")
        .route("", web::get().to(list_events))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_events(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<EventFilter>,
    Query(page): Query<PageInput>,
) -> ApiResponse<impl Responder> {
    let events = events::list(&db.sql_conn, filter, page.resolve())
        .await
        .fit(req_id)?;
    list("Events retrieved successfully", events)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let event = events::get(&db.sql_conn, id.into_inner()).await.fit(req_id)?;
    json("Event retrieved successfully", event)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<EventForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate(FormMode::Add, now()).fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = events::insert(&db.sql_conn, data).await;
    let event = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Event {} added by admin {}", event.id, guard.admin.id);

    created("Event added successfully", event)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<EventForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate(FormMode::Edit, now()).fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = events::update(&db.sql_conn, id, data).await;
    let event = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Event {id} edited by admin {}", guard.admin.id);

    json("Event updated successfully", event)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    events::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Event {id} deleted by admin {}", guard.admin.id);
    json("Event deleted successfully", ())
}
