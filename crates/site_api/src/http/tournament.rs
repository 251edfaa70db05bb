use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use esports_lib::{
    Database,
    page::PageInput,
    registration::{self, RegistrationRequest},
    repo::tournaments::{self, TournamentFilter},
};
use tracing_actix_web::RequestId;

use crate::{
    ApiErrorKind, ApiResponse, FitRequestId as _, Res,
    utils::{created, json, list},
};

pub fn tournament_scope() -> Scope {
    web::scope("/tournaments")
        .route("", web::get().to(list_tournaments))
        .route("/{id}", web::get().to(get_tournament))
}

async fn list_tournaments(
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

async fn get_tournament(
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let tournament = tournaments::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Tournament retrieved successfully", tournament)
}

pub async fn register(
    req_id: RequestId,
    db: Res<Database>,
    Json(body): Json<RegistrationRequest>,
) -> ApiResponse<impl Responder> {
    let receipt = registration::register(&db.sql_conn, body)
        .await
        .map_err(ApiErrorKind::Registration)
        .fit(req_id)?;
    created("Registration successful", receipt)
}
