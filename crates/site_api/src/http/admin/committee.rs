use actix_web::{
    Responder, Scope,
    web::{self, Json, Path},
};
use esports_lib::{
    Database,
    image::ImageStore,
    repo::committee::{self, CommitteeForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn committee_scope() -> Scope {
    web::scope("/committee")
        .route("", web::get().to(list_members))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_members(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
) -> ApiResponse<impl Responder> {
    let members = committee::list(&db.sql_conn, false).await.fit(req_id)?;
    list("Committee members retrieved successfully", members)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let member = committee::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Committee member retrieved successfully", member)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<CommitteeForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate().fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = committee::insert(&db.sql_conn, data).await;
    let member = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!(
        "Committee member {} added by admin {}",
        member.id,
        guard.admin.id
    );

    created("Committee member added successfully", member)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<CommitteeForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate().fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = committee::update(&db.sql_conn, id, data).await;
    let member = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Committee member {id} edited by admin {}", guard.admin.id);

    json("Committee member updated successfully", member)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    committee::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Committee member {id} deleted by admin {}", guard.admin.id);
    json("Committee member deleted successfully", ())
}
