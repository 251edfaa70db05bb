#![allow(dead_code)]

use std::fmt;

use actix_http::Request;
use actix_web::{
    App, Error,
    body::MessageBody,
    cookie::{Cookie, Key},
    dev::{Service, ServiceResponse},
    middleware, test,
};
use chrono::{Days, NaiveDateTime};
use entity::{games, tournaments};
use esports_lib::{Database, now, repo::admins};
use sea_orm::{ActiveValue::Set, EntityTrait as _};
use test_env::IntoResult;
use tracing_actix_web::TracingLogger;

use site_api_lib::{CSRF_HEADER, configure, init_env};

pub const ADMIN_USERNAME: &str = "committee";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

#[derive(Debug, serde::Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub request_id: String,
    pub r#type: i32,
    pub message: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub count: Option<usize>,
}

pub async fn with_db<F, R>(test: F) -> anyhow::Result<<R as IntoResult>::Out>
where
    F: AsyncFnOnce(Database) -> R,
    R: IntoResult,
{
    test_env::wrap(async |db| {
        init_env()?;
        test(db).await.into_result()
    })
    .await
}

pub async fn get_app(
    db: Database,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(middleware::from_fn(configure::fit_request_id))
            .wrap(TracingLogger::<configure::RootSpanBuilder>::new())
            .wrap(configure::session_middleware(Key::generate()))
            .configure(|cfg| configure::configure(cfg, db.clone())),
    )
    .await
}

/// Inserts an active game, and returns its ID.
pub async fn insert_game(db: &Database, name: &str) -> anyhow::Result<i32> {
    let now = now();
    let game = games::ActiveModel {
        name: Set(name.to_owned()),
        genre: Set(Some("Tactical shooter".to_owned())),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let id = games::Entity::insert(game)
        .exec(&db.sql_conn)
        .await?
        .last_insert_id;
    Ok(id)
}

/// Inserts an upcoming tournament of the provided game, and returns its ID.
pub async fn insert_tournament(
    db: &Database,
    game_id: i32,
    name: &str,
    start_date: NaiveDateTime,
) -> anyhow::Result<i32> {
    let now = now();
    let tournament = tournaments::ActiveModel {
        game_id: Set(game_id),
        name: Set(name.to_owned()),
        start_date: Set(start_date),
        current_participants: Set(0),
        status: Set("upcoming".to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let id = tournaments::Entity::insert(tournament)
        .exec(&db.sql_conn)
        .await?
        .last_insert_id;
    Ok(id)
}

/// Returns the sorted names of the files in the upload directory.
pub fn uploaded_files() -> anyhow::Result<Vec<String>> {
    let dir = configure::image_store().dir;
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Returns a date in the provided amount of days.
pub fn in_days(days: u64) -> NaiveDateTime {
    now().checked_add_days(Days::new(days)).unwrap()
}

/// A logged-in admin session.
pub struct AdminSession {
    pub cookie: Cookie<'static>,
    pub csrf_token: String,
}

impl AdminSession {
    /// Attaches the session cookie and the CSRF header to the request.
    pub fn sign(&self, req: test::TestRequest) -> test::TestRequest {
        req.cookie(self.cookie.clone())
            .insert_header((CSRF_HEADER, self.csrf_token.as_str()))
    }
}

/// Creates an admin account, and logs in with it.
pub async fn login<S, B>(app: &S, db: &Database) -> anyhow::Result<AdminSession>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    #[derive(serde::Deserialize)]
    struct LoginData {
        csrf_token: String,
    }

    admins::create(
        &db.sql_conn,
        ADMIN_USERNAME.to_owned(),
        "committee@club.example.org".to_owned(),
        ADMIN_PASSWORD,
    )
    .await?;

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_json(serde_json::json!({
            "username": ADMIN_USERNAME,
            "password": ADMIN_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);

    let cookie = resp
        .response()
        .cookies()
        .next()
        .map(Cookie::into_owned)
        .unwrap_or_else(|| panic!("Login should set the session cookie"));
    let body = test::read_body(resp).await;
    let body = try_from_slice::<Envelope<LoginData>>(&body)?;

    Ok(AdminSession {
        cookie,
        csrf_token: body.data.csrf_token,
    })
}

#[derive(Debug)]
pub enum ApiError {
    InvalidJson(Vec<u8>, serde_json::Error),
    UnexpectedJson(serde_json::Value, serde_json::Error),
    Error { r#type: i32, message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidJson(raw, deser_err) => match str::from_utf8(raw) {
                Ok(s) => write!(
                    f,
                    "Invalid JSON returned by the API: {s}\nError when deserializing: {deser_err}"
                ),
                Err(_) => write!(
                    f,
                    "Invalid JSON returned by the API, with some non-UTF8 characters: {raw:?}"
                ),
            },
            ApiError::UnexpectedJson(json, deser_err) => {
                write!(
                    f,
                    "Unexpected JSON returned by the API:\n{json:#}\nError when deserializing: {deser_err}"
                )
            }
            ApiError::Error { r#type, message } => {
                f.write_str("Error returned from API: ")?;
                f.debug_map()
                    .entry(&"type", r#type)
                    .entry(&"message", message)
                    .finish()
            }
        }
    }
}

impl std::error::Error for ApiError {}

pub fn try_from_slice<'de, T>(slice: &'de [u8]) -> Result<T, ApiError>
where
    T: serde::Deserialize<'de>,
{
    match serde_json::from_slice(slice) {
        Ok(t) => Ok(t),
        Err(e) => match serde_json::from_slice::<serde_json::Value>(slice) {
            Ok(json) => match serde_json::from_value::<ErrorResponse>(json.clone()) {
                Ok(err) => Err(ApiError::Error {
                    r#type: err.r#type,
                    message: err.message,
                }),
                Err(_) => Err(ApiError::UnexpectedJson(json, e)),
            },
            Err(e) => Err(ApiError::InvalidJson(slice.to_vec(), e)),
        },
    }
}
