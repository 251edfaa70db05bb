use actix_session::Session;
use actix_web::{
    Responder,
    web::{self, Json},
};
use esports_lib::{
    Database,
    repo::admins::{self, AdminUser},
};
use mkenv::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_actix_web::RequestId;

use crate::{
    AdminGuard, ApiErrorKind, ApiResponse, Authenticator as _, FitRequestId as _,
    RedisAuthenticator, Res, TOKEN_SESS_KEY, utils::json,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me));
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    csrf_token: String,
    admin: AdminUser,
}

fn authenticator(db: Database) -> RedisAuthenticator {
    RedisAuthenticator::new(db, crate::env().session_ttl.get() as _)
}

async fn login(
    req_id: RequestId,
    db: Res<Database>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> ApiResponse<impl Responder> {
    let Some(admin) = admins::authenticate(&db.sql_conn, body.username.trim(), &body.password)
        .await
        .fit(req_id)?
    else {
        tracing::warn!("Failed login attempt for `{}`", body.username);
        return Err(ApiErrorKind::InvalidCredentials).fit(req_id);
    };

    let opened = authenticator(db.0)
        .open_session(admin.id)
        .await
        .fit(req_id)?;
    session.renew();
    session
        .insert(TOKEN_SESS_KEY, &opened.token)
        .fit(req_id)?;

    tracing::info!("Admin {} ({}) logged in", admin.id, admin.username);

    json(
        "Logged in successfully",
        SessionResponse {
            csrf_token: opened.csrf_token,
            admin,
        },
    )
}

async fn logout(
    guard: AdminGuard,
    req_id: RequestId,
    db: Res<Database>,
    session: Session,
) -> ApiResponse<impl Responder> {
    authenticator(db.0)
        .close_session(&guard.token)
        .await
        .fit(req_id)?;
    session.purge();

    tracing::info!("Admin {} logged out", guard.admin.id);

    json("Logged out successfully", ())
}

async fn me(guard: AdminGuard, req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let csrf_token = authenticator(db.0)
        .csrf_token(&guard.token)
        .await
        .fit(req_id)?
        .unwrap_or_default();

    json(
        "Current admin",
        SessionResponse {
            csrf_token,
            admin: guard.admin,
        },
    )
}
