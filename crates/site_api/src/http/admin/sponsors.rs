use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use esports_lib::{
    Database,
    image::ImageStore,
    repo::sponsors::{self, SponsorFilter, SponsorForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn sponsors_scope() -> Scope {
    web::scope("/sponsors")
        .route("", web::get().to(list_sponsors))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_sponsors(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<SponsorFilter>,
) -> ApiResponse<impl Responder> {
    let sponsors = sponsors::list(&db.sql_conn, filter).await.fit(req_id)?;
    list("Sponsors retrieved successfully", sponsors)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let sponsor = sponsors::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Sponsor retrieved successfully", sponsor)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<SponsorForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate().fit(req_id)?;
    data.logo_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.logo_url.clone();

    let res = sponsors::insert(&db.sql_conn, data).await;
    let sponsor = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Sponsor {} added by admin {}", sponsor.id, guard.admin.id);

    created("Sponsor added successfully", sponsor)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<SponsorForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate().fit(req_id)?;
    data.logo_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.logo_url.clone();

    let res = sponsors::update(&db.sql_conn, id, data).await;
    let sponsor = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Sponsor {id} edited by admin {}", guard.admin.id);

    json("Sponsor updated successfully", sponsor)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    sponsors::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Sponsor {id} deleted by admin {}", guard.admin.id);
    json("Sponsor deleted successfully", ())
}
