//! A module containing the [`EsportsError`] enum, which contains various basic error types.

use deadpool_redis::PoolError;
use sea_orm::TransactionError;

/// Represents any type of error that could happen when using this crate.
#[derive(thiserror::Error, Debug)]
#[rustfmt::skip]
pub enum EsportsError {
    // --------
    // --- Internal server errors
    // --------

    /// An error from the SQL database.
    #[error(transparent)]
    DbError(#[from] sea_orm::DbErr),
    /// An error that happened when interacting with the Redis database.
    #[error(transparent)]
    Redis(#[from] deadpool_redis::redis::RedisError),
    /// An error that happened when using the Redis pool.
    #[error(transparent)]
    PoolError(#[from] PoolError),
    /// An error that happened when reading or writing an uploaded file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error when hashing or verifying a password.
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
    /// An internal error.
    #[error("internal error: {0}")]
    Internal(String),

    // --------
    // --- Logical errors
    // --------

    /// A submitted form is missing a field or contains an invalid value.
    ///
    /// The message is meant to be shown as is to the user.
    #[error("{0}")]
    Validation(String),
    /// The row with the provided ID doesn't exist.
    #[error("{kind} with id `{id}` not found")]
    NotFound {
        /// The kind of the row, e.g. `tournament`.
        kind: &'static str,
        /// The row ID.
        id: i32,
    },
    /// The site setting with the provided key doesn't exist.
    #[error("site setting `{0}` not found")]
    SettingNotFound(String),
    /// The provided image can't be used.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

impl EsportsError {
    /// Shortcut to create a [`EsportsError::NotFound`] error.
    #[inline(always)]
    pub fn not_found(kind: &'static str, id: i32) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Shortcut for creating an internal error, by formatting a message.
///
/// See [`EsportsError::Internal`].
#[macro_export]
macro_rules! internal {
    ($($t:tt)*) => {{
        $crate::error::EsportsError::Internal($crate::error::__private::format!($($t)*))
    }};
}

/// Shortcut for returning a validation error, by formatting a message.
///
/// See [`EsportsError::Validation`].
#[macro_export]
macro_rules! invalid {
    ($($t:tt)*) => {{
        $crate::error::EsportsError::Validation($crate::error::__private::format!($($t)*))
    }};
}

#[doc(hidden)]
pub mod __private {
    pub use std::format;
}

impl<E> From<TransactionError<E>> for EsportsError
where
    EsportsError: From<E>,
{
    fn from(value: TransactionError<E>) -> Self {
        match value {
            TransactionError::Connection(db_err) => From::from(db_err),
            TransactionError::Transaction(e) => From::from(e),
        }
    }
}

/// Represents the result of a computation that could return an [`EsportsError`].
pub type EsportsResult<T = ()> = Result<T, EsportsError>;
