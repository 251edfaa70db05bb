//! The library of the esports community website API.
//!
//! It exposes the public read API, the tournament registration endpoint, and the admin API
//! used by the committee to manage the content of the website. Overall, it uses the
//! [`esports_lib`] crate as a main dependency.

mod auth;
pub mod configure;
mod env;
mod error;
mod http;
mod must;
mod utils;

pub use auth::{
    AdminGuard, Authenticator, CSRF_HEADER, OpenedSession, RedisAuthenticator, TOKEN_SESS_KEY,
};
pub use env::*;
pub use error::*;
pub use http::api_route;
pub use utils::*;
