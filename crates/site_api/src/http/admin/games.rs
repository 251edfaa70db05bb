use actix_web::{
    Responder, Scope,
    web::{self, Json, Path},
};
use esports_lib::{
    Database,
    image::ImageStore,
    repo::games::{self, GameFilter, GameForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn games_scope() -> Scope {
    web::scope("/games")
        .route("", web::get().to(list_games))
        .route("", web::post().to(add))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(edit))
        .route("/{id}", web::delete().to(delete))
}

async fn list_games(_: AdminGuard, req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let games = games::list(&db.sql_conn, GameFilter::default())
        .await
        .fit(req_id)?;
    list("Games retrieved successfully", games)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let game = games::get(&db.sql_conn, id.into_inner()).await.fit(req_id)?;
    json("Game retrieved successfully", game)
}

async fn add(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    Json(form): Json<GameForm>,
) -> ApiResponse<impl Responder> {
    let (mut data, image) = form.validate().fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = games::insert(&db.sql_conn, data).await;
    let game = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Game {} added by admin {}", game.id, guard.admin.id);

    created("Game added successfully", game)
}

async fn edit(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    images: Res<ImageStore>,
    id: Path<i32>,
    Json(form): Json<GameForm>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let (mut data, image) = form.validate().fit(req_id)?;
    data.image_url = images.resolve(&image).await.fit(req_id)?;
    let url = data.image_url.clone();

    let res = games::update(&db.sql_conn, id, data).await;
    let game = images
        .discard_on_err(&image, url.as_deref(), res)
        .await
        .fit(req_id)?;
    tracing::info!("Game {id} edited by admin {}", guard.admin.id);

    json("Game updated successfully", game)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    games::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Game {id} deleted by admin {}", guard.admin.id);
    json("Game deleted successfully", ())
}
