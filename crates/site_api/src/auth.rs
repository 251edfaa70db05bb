//! The authentication system of the admin API.
//!
//! When an admin logs in with their username and password, the system generates a random
//! session token and a CSRF token. The token is stored in the private session cookie of the
//! browser, while the Redis database holds the SHA-256 hash of the token, bound to the ID
//! of the admin, and the CSRF token. Both Redis keys expire after the session TTL.
//!
//! Every admin route extracts an [`AdminGuard`], which resolves the token of the session cookie
//! to the admin account through an [`Authenticator`]. The mutating requests (anything but `GET`,
//! `HEAD` or `OPTIONS`) must also provide the CSRF token of the session in the `X-CSRF-Token`
//! header.

use std::{future::Future, pin::Pin};

use actix_session::{Session, SessionExt as _};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::Method};
use deadpool_redis::redis::AsyncCommands as _;
use esports_lib::{
    Database, gen_random_str,
    error::EsportsResult,
    redis_key::{csrf_key, session_key},
    repo::admins::{self, AdminUser},
};
use mkenv::prelude::*;
use sha256::digest;
use tracing_actix_web::RequestId;

use crate::{ApiErrorKind, ApiResponse, ApiResult, FitRequestId as _, must};

/// The key of the session token in the session cookie.
pub const TOKEN_SESS_KEY: &str = "__esports_admin_token";

/// The header holding the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

const TOKEN_LEN: usize = 32;

/// Resolves a session token to the admin it belongs to.
pub trait Authenticator {
    /// Returns the active admin bound to the provided session token, if any.
    fn current_user(&self, token: &str) -> impl Future<Output = EsportsResult<Option<AdminUser>>>;

    /// Returns the CSRF token of the session, if the session exists.
    fn csrf_token(&self, token: &str) -> impl Future<Output = EsportsResult<Option<String>>>;
}

/// A new admin session.
pub struct OpenedSession {
    /// The token to store in the session cookie.
    pub token: String,
    /// The token to send in the `X-CSRF-Token` header.
    pub csrf_token: String,
}

/// The default authenticator, storing the sessions in the Redis database.
#[derive(Clone)]
pub struct RedisAuthenticator {
    db: Database,
    ttl: u64,
}

impl RedisAuthenticator {
    pub fn new(db: Database, ttl: u64) -> Self {
        Self { db, ttl }
    }

    /// Opens a new session for the admin with the provided ID.
    pub async fn open_session(&self, admin_id: i32) -> EsportsResult<OpenedSession> {
        let token = gen_random_str(TOKEN_LEN);
        let csrf_token = gen_random_str(TOKEN_LEN);
        let hash = digest(&*token);

        let mut redis_conn = self.db.redis_pool.get().await?;
        let _: () = redis_conn
            .set_ex(session_key(&hash), admin_id, self.ttl)
            .await?;
        let _: () = redis_conn
            .set_ex(csrf_key(&hash), &csrf_token, self.ttl)
            .await?;

        Ok(OpenedSession { token, csrf_token })
    }

    /// Closes the session bound to the provided token.
    pub async fn close_session(&self, token: &str) -> EsportsResult<()> {
        let hash = digest(token);
        let mut redis_conn = self.db.redis_pool.get().await?;
        let _: () = redis_conn.del(session_key(&hash)).await?;
        let _: () = redis_conn.del(csrf_key(&hash)).await?;
        Ok(())
    }
}

impl Authenticator for RedisAuthenticator {
    async fn current_user(&self, token: &str) -> EsportsResult<Option<AdminUser>> {
        let hash = digest(token);
        let mut redis_conn = self.db.redis_pool.get().await?;
        let admin_id: Option<i32> = redis_conn.get(session_key(&hash)).await?;
        let Some(admin_id) = admin_id else {
            return Ok(None);
        };

        let admin = admins::find_by_id(&self.db.sql_conn, admin_id)
            .await?
            .filter(|admin| admin.is_active)
            .map(AdminUser::from);
        Ok(admin)
    }

    async fn csrf_token(&self, token: &str) -> EsportsResult<Option<String>> {
        let hash = digest(token);
        let mut redis_conn = self.db.redis_pool.get().await?;
        Ok(redis_conn.get(csrf_key(&hash)).await?)
    }
}

/// Returns whether the provided method changes something, and thus requires the CSRF token.
fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Returns the session token stored in the session cookie.
pub fn session_token(session: &Session) -> ApiResult<Option<String>> {
    Ok(session.get::<String>(TOKEN_SESS_KEY)?)
}

/// A guard that requires a logged-in admin.
pub struct AdminGuard {
    /// The logged-in admin.
    pub admin: AdminUser,
    /// The session token.
    pub token: String,
}

async fn check<A: Authenticator>(
    auth: &A,
    token: Option<String>,
    csrf_header: Option<Option<String>>,
) -> ApiResult<AdminGuard> {
    let Some(token) = token else {
        return Err(ApiErrorKind::Unauthorized);
    };

    let Some(admin) = auth.current_user(&token).await? else {
        return Err(ApiErrorKind::Unauthorized);
    };

    if let Some(header) = csrf_header {
        let expected = auth.csrf_token(&token).await?;
        match (header, expected) {
            (Some(header), Some(expected)) if header == expected => (),
            _ => return Err(ApiErrorKind::InvalidCsrfToken),
        }
    }

    Ok(AdminGuard { admin, token })
}

impl FromRequest for AdminGuard {
    type Error = crate::ApiError;

    type Future = Pin<Box<dyn Future<Output = ApiResponse<Self>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        async fn resolve(
            request_id: RequestId,
            auth: RedisAuthenticator,
            token: ApiResult<Option<String>>,
            csrf_header: Option<Option<String>>,
        ) -> ApiResponse<AdminGuard> {
            let token = token.fit(request_id)?;
            check(&auth, token, csrf_header).await.fit(request_id)
        }

        let request_id = must::have_request_id(req);
        let token = session_token(&req.get_session());
        let csrf_header = is_mutating(req.method()).then(|| {
            req.headers()
                .get(CSRF_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
        });
        let auth = RedisAuthenticator::new(
            must::have_db(req),
            crate::env().session_ttl.get() as _,
        );

        Box::pin(resolve(request_id, auth, token, csrf_header))
    }
}
