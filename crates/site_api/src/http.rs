//! Module used to serve the routes of the API. Each submodule is specific for a route segment.

use actix_web::{Responder, Scope, web};
use esports_lib::{Database, repo::settings};
use mkenv::prelude::*;
use serde::Serialize;
use tracing_actix_web::RequestId;

use crate::{ApiResponse, FitRequestId as _, Res, utils::json};

pub mod admin;

mod showcase;
mod site;
mod tournament;

pub fn api_route() -> Scope {
    web::scope("")
        .route("/info", web::get().to(info))
        .route(
            "/tournaments_register",
            web::post().to(tournament::register),
        )
        .service(tournament::tournament_scope())
        .configure(showcase::configure)
        .configure(site::configure)
        .service(admin::admin_scope())
}

#[derive(Serialize)]
struct InfoResponse {
    service_name: &'static str,
    site_name: Option<String>,
    api_version: &'static str,
    environment: &'static str,
}

async fn info(req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let site_name = settings::get_value(&db.sql_conn, settings::SITE_NAME)
        .await
        .fit(req_id)?;

    json(
        "API information",
        InfoResponse {
            service_name: "Esports Community API",
            site_name,
            api_version: env!("CARGO_PKG_VERSION"),
            environment: crate::env().app_env.get().as_str(),
        },
    )
}
