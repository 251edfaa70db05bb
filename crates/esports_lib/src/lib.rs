//! The main crate of the esports community website backend.
//!
//! This crate is used by the API server and the admin CLI. It contains the environment setup
//! functions, the database pools, the repositories of every entity, and the tournament
//! registration workflow.
//!
//! If you wish to see the crate of the server program itself, take a look
//! at the [`site_api`](../site_api_lib/index.html) package.

#![warn(missing_docs)]

mod env;

pub mod countdown;
pub mod date;
pub mod error;
pub mod image;
pub mod must;
pub mod page;
pub mod pool;
pub mod redis_key;
pub mod registration;
pub mod repo;
pub mod transaction;
pub mod validate;

/// The Redis pool type.
pub type RedisPool = deadpool_redis::Pool;

pub use env::*;
pub use pool::Database;
use rand::Rng as _;

/// Returns a randomly-generated string with the `len` length. It contains alphanumeric characters.
pub fn gen_random_str(len: usize) -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .map(char::from)
        .take(len)
        .collect()
}

/// Returns the current UTC date, without timezone, as stored in the database.
#[inline(always)]
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
