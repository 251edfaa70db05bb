//! The admin API, used by the committee to manage the content of the website.
//!
//! Every route except the login requires an [`AdminGuard`](crate::AdminGuard).

use actix_web::{Scope, web};

mod committee;
mod events;
mod gallery;
mod games;
mod registrations;
mod session;
mod settings;
mod sponsors;
mod tournaments;

pub fn admin_scope() -> Scope {
    web::scope("/admin")
        .configure(session::configure)
        .service(tournaments::tournaments_scope())
        .service(games::games_scope())
        .service(events::events_scope())
        .service(committee::committee_scope())
        .service(gallery::gallery_scope())
        .service(sponsors::sponsors_scope())
        .service(registrations::registrations_scope())
        .service(settings::settings_scope())
}
