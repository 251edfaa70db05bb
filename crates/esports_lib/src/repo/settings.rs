//! The key-value settings of the website.

use entity::site_settings;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    IntoActiveModel as _, QueryFilter as _, QueryOrder as _,
};
use serde::Deserialize;

use crate::{
    date,
    error::{EsportsError, EsportsResult},
    invalid, now,
    validate::required_str,
};

/// The name of the website.
pub const SITE_NAME: &str = "site_name";
/// The title of the countdown widget.
pub const COUNTDOWN_TITLE: &str = "countdown_title";
/// The date the countdown widget counts down to. Empty to use the next tournament or event.
pub const COUNTDOWN_TARGET: &str = "countdown_target";

/// The admin form of a setting.
#[derive(Deserialize, Debug, Default)]
pub struct SettingForm {
    /// The key of the setting. Required.
    pub key: Option<String>,
    /// Its new value. An empty value is accepted.
    pub value: Option<String>,
}

impl SettingForm {
    /// Checks the required fields of the form, and returns the key and value.
    ///
    /// The value of the [`COUNTDOWN_TARGET`] setting must be empty or a date.
    pub fn validate(self) -> EsportsResult<(String, String)> {
        let key = required_str("key", self.key)?;
        let value = self.value.unwrap_or_default();
        if key == COUNTDOWN_TARGET && !value.trim().is_empty() && date::parse(&value).is_none()
        {
            return Err(invalid!("{COUNTDOWN_TARGET} must be a date, got `{value}`"));
        }
        Ok((key, value))
    }
}

/// Returns all the settings, sorted by key.
pub async fn list<C: ConnectionTrait>(conn: &C) -> EsportsResult<Vec<site_settings::Model>> {
    let settings = site_settings::Entity::find()
        .order_by_asc(site_settings::Column::SettingKey)
        .all(conn)
        .await?;
    Ok(settings)
}

/// Returns the value of the setting with the provided key, if any.
pub async fn get_value<C: ConnectionTrait>(conn: &C, key: &str) -> EsportsResult<Option<String>> {
    let setting = site_settings::Entity::find()
        .filter(site_settings::Column::SettingKey.eq(key))
        .one(conn)
        .await?;
    Ok(setting.map(|s| s.setting_value))
}

/// Returns the setting with the provided key.
///
/// Returns a [`EsportsError::SettingNotFound`] error if it doesn't exist.
pub async fn get<C: ConnectionTrait>(conn: &C, key: &str) -> EsportsResult<site_settings::Model> {
    site_settings::Entity::find()
        .filter(site_settings::Column::SettingKey.eq(key))
        .one(conn)
        .await?
        .ok_or_else(|| EsportsError::SettingNotFound(key.to_owned()))
}

/// Inserts the setting or updates its value.
pub async fn upsert<C: ConnectionTrait>(
    conn: &C,
    key: String,
    value: String,
) -> EsportsResult<site_settings::Model> {
    let existing = site_settings::Entity::find()
        .filter(site_settings::Column::SettingKey.eq(&key))
        .one(conn)
        .await?;

    let setting = match existing {
        Some(setting) => {
            let mut setting = setting.into_active_model();
            setting.setting_value = Set(value);
            setting.updated_at = Set(now());
            setting.update(conn).await?
        }
        None => {
            site_settings::ActiveModel {
                setting_key: Set(key),
                setting_value: Set(value),
                updated_at: Set(now()),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };

    tracing::info!("Setting `{}` updated", setting.setting_key);
    Ok(setting)
}
