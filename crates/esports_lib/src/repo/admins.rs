//! The accounts of the admin API.

use chrono::NaiveDateTime;
use entity::admin_users;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    QueryFilter as _,
};
use serde::Serialize;

use crate::{error::EsportsResult, invalid, now, validate::required_str};

/// The bcrypt cost used to hash the passwords.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// The minimum length of a password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// The public information of an admin, without its password hash.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdminUser {
    /// The ID of the admin.
    pub id: i32,
    /// Its login.
    pub username: String,
    /// Its email.
    pub email: String,
    /// Whether the account can log in.
    pub is_active: bool,
    /// The date of its last login.
    pub last_login: Option<NaiveDateTime>,
}

impl From<admin_users::Model> for AdminUser {
    fn from(admin: admin_users::Model) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            is_active: admin.is_active,
            last_login: admin.last_login,
        }
    }
}

/// Hashes the provided password with bcrypt.
pub fn hash_password(password: &str) -> EsportsResult<String> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Returns whether the password matches the provided bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> EsportsResult<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Creates a new active admin account.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    username: String,
    email: String,
    password: &str,
) -> EsportsResult<AdminUser> {
    let username = required_str("username", Some(username))?;
    let email = required_str("email", Some(email))?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }

    let admin = admin_users::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(hash_password(password)?),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!("Created admin {} ({})", admin.id, admin.username);
    Ok(admin.into())
}

/// Returns the admin account with the provided username.
pub async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> EsportsResult<Option<admin_users::Model>> {
    let admin = admin_users::Entity::find()
        .filter(admin_users::Column::Username.eq(username))
        .one(conn)
        .await?;
    Ok(admin)
}

/// Returns the admin account with the provided ID, if any.
pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> EsportsResult<Option<admin_users::Model>> {
    Ok(admin_users::Entity::find_by_id(id).one(conn).await?)
}

/// Checks the credentials of an admin, and returns its account if they're valid and the
/// account is active.
///
/// The last login date of the account is updated.
pub async fn authenticate<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password: &str,
) -> EsportsResult<Option<AdminUser>> {
    let Some(admin) = find_by_username(conn, username).await? else {
        return Ok(None);
    };
    if !admin.is_active || !verify_password(password, &admin.password_hash)? {
        return Ok(None);
    }

    let mut active: admin_users::ActiveModel = admin.into();
    active.last_login = Set(Some(now()));
    let admin = active.update(conn).await?;
    Ok(Some(admin.into()))
}
