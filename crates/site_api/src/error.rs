use std::fmt;

use actix_web::{HttpResponse, http::StatusCode};
use esports_lib::error::EsportsError;
use sea_orm::DbErr;
use tracing_actix_web::RequestId;

#[derive(thiserror::Error, Debug)]
#[repr(i32)] // i32 to be used with clients that don't support unsigned integers
#[rustfmt::skip]
pub enum ApiErrorKind {
    // Caution: when creating a new error, you must ensure its code isn't
    // in conflict with another one in `esports_lib::error::EsportsError`.

    // --------
    // --- Internal server errors
    // --------

    #[error(transparent)]
    IOError(#[from] std::io::Error) = 101,

    // ...Errors from esports_lib

    #[error("session error: {0}")]
    Session(String) = 108,

    // --------
    // --- Authentication errors
    // --------

    #[error("unauthorized")]
    Unauthorized = 201,
    #[error("invalid username or password")]
    InvalidCredentials = 203,
    #[error("missing or invalid CSRF token")]
    InvalidCsrfToken = 204,

    // --------
    // --- Logical errors
    // --------

    #[error("not found")]
    EndpointNotFound = 301,

    // ...Errors from esports_lib

    #[error("invalid request: {0}")]
    InvalidRequest(String) = 306,
    #[error("file `{0}` not found")]
    FileNotFound(String) = 307,

    /// An error from the registration workflow. It is always a client error.
    #[error(transparent)]
    Registration(EsportsError),

    #[error(transparent)]
    Lib(#[from] EsportsError),
}

fn lib_err_type_and_status_code(err: &EsportsError) -> (i32, StatusCode) {
    use EsportsError as LE;
    use StatusCode as S;

    match err {
        LE::DbError(_) => (102, S::INTERNAL_SERVER_ERROR),
        LE::Redis(_) => (103, S::INTERNAL_SERVER_ERROR),
        LE::PoolError(_) => (104, S::INTERNAL_SERVER_ERROR),
        LE::Io(_) => (101, S::INTERNAL_SERVER_ERROR),
        LE::Bcrypt(_) => (106, S::INTERNAL_SERVER_ERROR),
        LE::Internal(_) => (107, S::INTERNAL_SERVER_ERROR),

        LE::Validation(_) => (302, S::BAD_REQUEST),
        LE::NotFound { .. } => (303, S::NOT_FOUND),
        LE::SettingNotFound(_) => (304, S::NOT_FOUND),
        LE::InvalidImage(_) => (305, S::BAD_REQUEST),
    }
}

impl ApiErrorKind {
    pub fn get_err_type_and_status_code(&self) -> (i32, StatusCode) {
        use ApiErrorKind as E;
        use StatusCode as S;

        match self {
            E::IOError(_) => (101, S::INTERNAL_SERVER_ERROR),
            E::Session(_) => (108, S::INTERNAL_SERVER_ERROR),

            E::Unauthorized => (201, S::UNAUTHORIZED),
            E::InvalidCredentials => (203, S::UNAUTHORIZED),
            E::InvalidCsrfToken => (204, S::FORBIDDEN),

            E::EndpointNotFound => (301, S::NOT_FOUND),
            E::InvalidRequest(_) => (306, S::BAD_REQUEST),
            E::FileNotFound(_) => (307, S::NOT_FOUND),

            E::Registration(err) => (lib_err_type_and_status_code(err).0, S::BAD_REQUEST),
            E::Lib(err) => lib_err_type_and_status_code(err),
        }
    }
}

impl From<DbErr> for ApiErrorKind {
    fn from(value: DbErr) -> Self {
        Self::Lib(value.into())
    }
}

impl From<deadpool_redis::PoolError> for ApiErrorKind {
    fn from(value: deadpool_redis::PoolError) -> Self {
        Self::Lib(value.into())
    }
}

impl From<deadpool_redis::redis::RedisError> for ApiErrorKind {
    fn from(value: deadpool_redis::redis::RedisError) -> Self {
        Self::Lib(value.into())
    }
}

impl From<actix_session::SessionInsertError> for ApiErrorKind {
    fn from(value: actix_session::SessionInsertError) -> Self {
        Self::Session(value.to_string())
    }
}

impl From<actix_session::SessionGetError> for ApiErrorKind {
    fn from(value: actix_session::SessionGetError) -> Self {
        Self::Session(value.to_string())
    }
}

/// An API error, bound to the ID of the request that produced it.
#[derive(Debug)]
pub struct ApiError {
    pub request_id: RequestId,
    pub kind: ApiErrorKind,
}

impl fmt::Display for ApiError {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// The body of an error response.
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub r#type: i32,
    pub request_id: String,
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.kind.get_err_type_and_status_code().1
    }

    fn error_response(&self) -> HttpResponse {
        let (r#type, status_code) = self.kind.get_err_type_and_status_code();

        if status_code.is_server_error() {
            tracing::error!("[{}] {}", self.request_id, self.kind);
        }

        HttpResponse::build(status_code).json(ErrorResponse {
            success: false,
            message: self.kind.to_string(),
            r#type,
            request_id: self.request_id.to_string(),
        })
    }
}

pub type ApiResult<T = ()> = Result<T, ApiErrorKind>;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Converts a `Result<T, E>` in which `E` is convertible to [`ApiErrorKind`]
/// into an [`ApiResponse<T>`], by binding the error to the ID of the current request.
pub trait FitRequestId<T> {
    fn fit(self, request_id: RequestId) -> ApiResponse<T>;
}

impl<T, E> FitRequestId<T> for Result<T, E>
where
    ApiErrorKind: From<E>,
{
    fn fit(self, request_id: RequestId) -> ApiResponse<T> {
        self.map_err(|e| ApiError {
            request_id,
            kind: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use esports_lib::error::EsportsError;

    use super::ApiErrorKind;

    #[test]
    fn not_found_entity_is_404() {
        let err = ApiErrorKind::Lib(EsportsError::not_found("tournament", 5));
        assert_eq!(
            err.get_err_type_and_status_code(),
            (303, StatusCode::NOT_FOUND)
        );
        assert_eq!(err.to_string(), "tournament with id `5` not found");
    }

    #[test]
    fn registration_errors_are_400() {
        let err = ApiErrorKind::Registration(EsportsError::not_found("tournament", 5));
        assert_eq!(
            err.get_err_type_and_status_code(),
            (303, StatusCode::BAD_REQUEST)
        );

        let err = ApiErrorKind::Registration(EsportsError::DbError(sea_orm::DbErr::Custom(
            "Duplicate entry".to_owned(),
        )));
        let (r#type, status) = err.get_err_type_and_status_code();
        assert_eq!((r#type, status), (102, StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("Duplicate entry"));
    }
}
