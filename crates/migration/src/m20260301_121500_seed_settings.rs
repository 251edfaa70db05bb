use entity::site_settings;
use sea_orm::{ActiveValue::Set, ColumnTrait as _, EntityTrait, QueryFilter as _};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_SETTINGS: [(&str, &str); 3] = [
    ("site_name", "University Esports Club"),
    ("countdown_title", "Next tournament"),
    ("countdown_target", ""),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().naive_utc();

        site_settings::Entity::insert_many(DEFAULT_SETTINGS.map(|(key, value)| {
            site_settings::ActiveModel {
                setting_key: Set(key.to_owned()),
                setting_value: Set(value.to_owned()),
                updated_at: Set(now),
                ..Default::default()
            }
        }))
        .exec(manager.get_connection())
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        site_settings::Entity::delete_many()
            .filter(site_settings::Column::SettingKey.is_in(DEFAULT_SETTINGS.map(|(key, _)| key)))
            .exec(manager.get_connection())
            .await?;

        Ok(())
    }
}
