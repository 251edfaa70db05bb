//! The public lists of the content of the website.

use actix_web::{
    Responder,
    web::{self, Query},
};
use esports_lib::{
    Database,
    page::PageInput,
    repo::{
        committee, events,
        events::EventFilter,
        gallery::{self, GalleryFilter},
        games::{self, GameFilter},
        sponsors::{self, SponsorFilter},
    },
};
use serde::Deserialize;
use tracing_actix_web::RequestId;

use crate::{ApiResponse, FitRequestId as _, Res, utils::list};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/games", web::get().to(list_games))
        .route("/events", web::get().to(list_events))
        .route("/committee", web::get().to(list_committee))
        .route("/gallery", web::get().to(list_gallery))
        .route("/sponsors", web::get().to(list_sponsors));
}

async fn list_games(req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let games = games::list(&db.sql_conn, GameFilter { active_only: true })
        .await
        .fit(req_id)?;
    list("Games retrieved successfully", games)
}

async fn list_events(
    req_id: RequestId,
    db: Res<Database>,
    Query(filter): Query<EventFilter>,
    Query(page): Query<PageInput>,
) -> ApiResponse<impl Responder> {
    let events = events::list(&db.sql_conn, filter, page.resolve())
        .await
        .fit(req_id)?;
    list("Events retrieved successfully", events)
}

async fn list_committee(req_id: RequestId, db: Res<Database>) -> ApiResponse<impl Responder> {
    let members = committee::list(&db.sql_conn, true).await.fit(req_id)?;
    list("Committee members retrieved successfully", members)
}

async fn list_gallery(
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

#[derive(Deserialize)]
struct SponsorQuery {
    partnership_type: Option<entity::types::PartnershipType>,
}

async fn list_sponsors(
    req_id: RequestId,
    db: Res<Database>,
    Query(query): Query<SponsorQuery>,
) -> ApiResponse<impl Responder> {
    let filter = SponsorFilter {
        partnership_type: query.partnership_type,
        active_only: true,
    };
    let sponsors = sponsors::list(&db.sql_conn, filter).await.fit(req_id)?;
    list("Sponsors retrieved successfully", sponsors)
}
