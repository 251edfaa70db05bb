pub mod prelude;

pub mod admin_users;
pub mod committee_members;
pub mod events;
pub mod gallery_items;
pub mod games;
pub mod registrations;
pub mod site_settings;
pub mod sponsors;
pub mod team_members;
pub mod tournaments;
