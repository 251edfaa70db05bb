pub use super::admin_users::Entity as AdminUsers;
pub use super::committee_members::Entity as CommitteeMembers;
pub use super::events::Entity as Events;
pub use super::gallery_items::Entity as GalleryItems;
pub use super::games::Entity as Games;
pub use super::registrations::Entity as Registrations;
pub use super::site_settings::Entity as SiteSettings;
pub use super::sponsors::Entity as Sponsors;
pub use super::team_members::Entity as TeamMembers;
pub use super::tournaments::Entity as Tournaments;
