use actix_web::{
    Responder, Scope,
    web::{self, Json, Path},
};
use esports_lib::{
    Database,
    repo::settings::{self, SettingForm},
};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiResponse, FitRequestId as _, Res,
    utils::{json, list},
};

pub fn settings_scope() -> Scope {
    web::scope("/settings")
        .route("", web::get().to(list_settings))
        .route("", web::put().to(upsert))
        .route("/{key}", web::get().to(get))
}

async fn list_settings(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
) -> ApiResponse<impl Responder> {
    let settings = settings::list(&db.sql_conn).await.fit(req_id)?;
    list("Settings retrieved successfully", settings)
}

async fn get(
    _: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    key: Path<String>,
) -> ApiResponse<impl Responder> {
    let setting = settings::get(&db.sql_conn, &key).await.fit(req_id)?;
    json("Setting retrieved successfully", setting)
}

async fn upsert(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    Json(form): Json<SettingForm>,
) -> ApiResponse<impl Responder> {
    let (key, value) = form.validate().fit(req_id)?;
    let setting = settings::upsert(&db.sql_conn, key, value)
        .await
        .fit(req_id)?;
    tracing::info!(
        "Setting `{}` updated by admin {}",
        setting.setting_key,
        guard.admin.id
    );
    json("Setting saved successfully", setting)
}
