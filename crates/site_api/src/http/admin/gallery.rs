use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use esports_lib::{
    Database,
    image::ImageStore,
    page::PageInput,
    repo::gallery::{self, GalleryFilter, GalleryForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn gallery_scope() -> Scope {
    web::scope("/gallery")
        .route("", web::get().to(list_items))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_items(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<GalleryFilter>,
    Query(page): Query<PageInput>,
) -> ApiResponse<impl Responder> {
    let items = gallery::list(&db.sql_conn, filter, page.resolve())
        .await
        .fit(req_id)?;
    list("Gallery items retrieved successfully", items)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let item = gallery::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Gallery item retrieved successfully", item)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<GalleryForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate(true).fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = gallery::insert(&db.sql_conn, data).await;
    let item = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Gallery item {} added by admin {}", item.id, guard.admin.id);

    created("Gallery item added successfully", item)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<GalleryForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate(false).fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = gallery::update(&db.sql_conn, id, data).await;
    let item = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Gallery item {id} edited by admin {}", guard.admin.id);

    json("Gallery item updated successfully", item)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    gallery::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Gallery item {id} deleted by admin {}", guard.admin.id);
    json("Gallery item deleted successfully", ())
}
