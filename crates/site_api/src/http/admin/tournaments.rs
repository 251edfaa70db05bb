use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use esports_lib::{
    Database,
    image::ImageStore,
    page::PageInput,
    repo::tournaments::{self, TournamentFilter, TournamentForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn tournaments_scope() -> Scope {
    web::scope("/tournaments")
        .route("", web::get().to(list_tournaments))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_tournaments(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<TournamentFilter>,
    Query(page): Query<PageInput>,
) -> ApiResponse<impl Responder> {
    let tournaments = tournaments::list(&db.sql_conn, filter, page.resolve())
        .await
        .fit(req_id)?;
    list("Tournaments retrieved successfully", tournaments)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let tournament = tournaments::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Tournament retrieved successfully", tournament)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<TournamentForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate().fit(req_id)?;
    data.poster_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.poster_url.clone();

    let res = tournaments::insert(&db.sql_conn, data).await;
    let tournament = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Tournament {} added by admin {}", tournament.id, guard.admin.id);

    created("Tournament added successfully", tournament)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<TournamentForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate().fit(req_id)?;
    data.poster_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.poster_url.clone();

    let res = tournaments::update(&db.sql_conn, id, data).await;
    let tournament = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Tournament {id} edited by admin {}", guard.admin.id);

    json("Tournament updated successfully", tournament)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    tournaments::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Tournament {id} deleted by admin {}", guard.admin.id);
    json("Tournament deleted successfully", ())
}
