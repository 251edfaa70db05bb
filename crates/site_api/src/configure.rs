use actix_cors::Cors;
use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::{
    HttpMessage as _, HttpRequest, Responder,
    body::MessageBody,
    cookie::{Key, time::Duration as CookieDuration},
    dev::{ServiceRequest, ServiceResponse},
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
    web,
};
use esports_lib::{Database, image::ImageStore};
use mkenv::prelude::*;
use tracing_actix_web::{DefaultRootSpanBuilder, RequestId};

use crate::{
    ApiError, ApiErrorKind, ApiResponse, AppEnv, FitRequestId as _, env::parse_origins, must,
};

/// The maximum size of a JSON body. The forms may contain a base64-encoded image.
const JSON_LIMIT: usize = 16 * 1024 * 1024;

/// The actix route handler for the Not Found response.
async fn not_found(req_id: RequestId) -> ApiResponse<impl Responder> {
    Err::<String, _>(ApiErrorKind::EndpointNotFound).fit(req_id)
}

pub struct RootSpanBuilder;

impl tracing_actix_web::RootSpanBuilder for RootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> tracing::Span {
        let (pool_size, pool_num_idle) = request
            .app_data::<Database>()
            .map(Database::pool_stats)
            .unwrap_or_default();

        tracing_actix_web::root_span!(
            request,
            pool_size = pool_size,
            pool_num_idle = pool_num_idle,
        )
    }

    fn on_request_end<B: MessageBody>(
        span: tracing::Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Middleware adding the ID of the request to the headers of its response.
pub async fn fit_request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let request_id = req.extensions().get::<RequestId>().copied();
    let mut res = next.call(req).await?;
    if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(&id.to_string()).ok()) {
        res.headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }
    Ok(res)
}

fn invalid_request(req: &HttpRequest, message: String) -> actix_web::Error {
    ApiError {
        request_id: must::have_request_id(req),
        kind: ApiErrorKind::InvalidRequest(message),
    }
    .into()
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    invalid_request(req, err.to_string())
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    invalid_request(req, err.to_string())
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    invalid_request(req, err.to_string())
}

/// Returns the CORS middleware of the provided environment.
///
/// In development, any origin is allowed. In production, only the provided origins are.
pub fn cors(app_env: AppEnv, allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec!["accept", "content-type", "x-csrf-token"])
        .max_age(3600);

    match app_env {
        AppEnv::Development => cors.allow_any_origin(),
        AppEnv::Production => allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

/// Returns the session middleware, storing the admin session token in a private cookie.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    let env = crate::env();
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(env.app_env.get().is_production())
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(CookieDuration::seconds(env.session_ttl.get() as i64)),
        )
        .build()
}

/// Returns the session key from the provided bytes.
///
/// In development, a random key is generated if the provided one is too short.
pub fn session_key(app_env: AppEnv, bytes: &[u8]) -> anyhow::Result<Key> {
    match Key::try_from(bytes) {
        Ok(key) => Ok(key),
        Err(_) if !app_env.is_production() => {
            tracing::warn!("Session key missing or too short, generating a random one");
            Ok(Key::generate())
        }
        Err(e) => anyhow::bail!("invalid session key: {e}"),
    }
}

/// Returns the image store configured by the environment.
pub fn image_store() -> ImageStore {
    let env = crate::env();
    ImageStore {
        dir: env.upload_dir.get().into(),
        max_bytes: env.upload_max_bytes.get(),
    }
}

/// Returns the allowed origins configured by the environment.
pub fn allowed_origins() -> Vec<String> {
    parse_origins(&crate::env().cors_allowed_origins.get())
}

pub fn configure(cfg: &mut web::ServiceConfig, db: Database) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT).error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(image_store())
        .app_data(db)
        .service(crate::api_route())
        .default_service(web::to(not_found));
}
