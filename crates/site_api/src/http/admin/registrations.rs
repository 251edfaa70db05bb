use actix_web::{
    Responder, Scope,
    web::{self, Json, Path, Query},
};
use entity::types::RegistrationStatus;
use esports_lib::{
    Database,
    page::PageInput,
    repo::registrations::{self, RegistrationFilter},
};
use serde::Deserialize;
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{json, list},
};

pub fn registrations_scope() -> Scope {
    web::scope("/registrations")
        .route("", web::get().to(list_registrations))
        .route("/{id}", web::get().to(get))
        .route("/{id}/status", web::put().to(update_status))
        .route("/{id}", web::delete().to(delete))
}

async fn list_registrations(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<RegistrationFilter>,
    Query(page): Query<PageInput>,
) -> ApiResponse<impl Responder> {
    let registrations = registrations::list(&db.sql_conn, filter, page.resolve())
        .await
        .fit(req_id)?;
    list("Registrations retrieved successfully", registrations)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let registration = registrations::get(&db.sql_conn, id.into_inner())
        .await
        .fit(req_id)?;
    json("Registration retrieved successfully", registration)
}

#[derive(Deserialize)]
struct StatusBody {
    status: RegistrationStatus,
}

async fn update_status(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
    Json(body): Json<StatusBody>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    let registration = registrations::update_status(&db.sql_conn, id, body.status)
        .await
        .fit(req_id)?;
    tracing::info!(
        "Registration {id} set to {} by admin {}",
        body.status,
        guard.admin.id
    );
    json("Registration status updated successfully", registration)
}

async fn delete(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    id: Path<i32>,
) -> ApiResponse<impl Responder> {
    let id = id.into_inner();
    registrations::delete(&db.sql_conn, id).await.fit(req_id)?;
    tracing::info!("Registration {id} deleted by admin {}", guard.admin.id);
    json("Registration deleted successfully", ())
}
