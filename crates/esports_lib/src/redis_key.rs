//! This module contains the Redis keys constructors.
//!
//! Redis only holds the admin sessions. The key of a session is built from the SHA-256 hash
//! of its token, for example `v1:session:9f86d0...`, and its value is the ID of the admin.

use core::fmt;

use deadpool_redis::redis::{RedisWrite, ToRedisArgs};

const V1_KEY_PREFIX: &str = "v1";

const V1_SESSION_KEY_PREFIX: &str = "session";
const V1_CSRF_KEY_PREFIX: &str = "csrf";

/// The key of an admin session.
#[derive(Clone, Copy)]
pub struct SessionKey<'a> {
    /// The hash of the session token.
    pub token_hash: &'a str,
}

impl fmt::Display for SessionKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{V1_KEY_PREFIX}:{V1_SESSION_KEY_PREFIX}:{}",
            self.token_hash
        )
    }
}

impl ToRedisArgs for SessionKey<'_> {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg_fmt(self)
    }
}

/// Returns the key of the admin session bound to the provided token hash.
pub fn session_key(token_hash: &str) -> SessionKey<'_> {
    SessionKey { token_hash }
}

/// The key of the CSRF token of an admin session.
#[derive(Clone, Copy)]
pub struct CsrfKey<'a> {
    /// The hash of the session token.
    pub token_hash: &'a str,
}

impl fmt::Display for CsrfKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{V1_KEY_PREFIX}:{V1_SESSION_KEY_PREFIX}:{}:{V1_CSRF_KEY_PREFIX}",
            self.token_hash
        )
    }
}

impl ToRedisArgs for CsrfKey<'_> {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg_fmt(self)
    }
}

/// Returns the key of the CSRF token of the admin session bound to the provided token hash.
pub fn csrf_key(token_hash: &str) -> CsrfKey<'_> {
    CsrfKey { token_hash }
}
