mod member_role;
mod partnership_type;
mod registration_status;
mod team_type;

pub use member_role::*;
pub use partnership_type::*;
pub use registration_status::*;
pub use team_type::*;
