use entity::{
    admin_users, committee_members, events, gallery_items, games, registrations, site_settings,
    sponsors, team_members, tournaments,
};
use sea_orm::EntityTrait;
use sea_orm_migration::{prelude::*, sea_orm::Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_database_backend();
        let schema = Schema::new(db);

        create_entity_table(manager, &schema, games::Entity).await?;
        create_entity_table(manager, &schema, tournaments::Entity).await?;
        create_entity_table(manager, &schema, registrations::Entity).await?;
        create_entity_table(manager, &schema, team_members::Entity).await?;

        create_entity_table(manager, &schema, events::Entity).await?;
        create_entity_table(manager, &schema, gallery_items::Entity).await?;
        create_entity_table(manager, &schema, committee_members::Entity).await?;
        create_entity_table(manager, &schema, sponsors::Entity).await?;

        create_entity_table(manager, &schema, site_settings::Entity).await?;
        create_entity_table(manager, &schema, admin_users::Entity).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_tournament")
                    .table(registrations::Entity)
                    .col(registrations::Column::TournamentId)
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_members_registration")
                    .table(team_members::Entity)
                    .col(team_members::Column::RegistrationId)
                    .take(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_entity_table(manager, admin_users::Entity).await?;
        drop_entity_table(manager, site_settings::Entity).await?;

        drop_entity_table(manager, sponsors::Entity).await?;
        drop_entity_table(manager, committee_members::Entity).await?;
        drop_entity_table(manager, gallery_items::Entity).await?;
        drop_entity_table(manager, events::Entity).await?;

        drop_entity_table(manager, team_members::Entity).await?;
        drop_entity_table(manager, registrations::Entity).await?;
        drop_entity_table(manager, tournaments::Entity).await?;
        drop_entity_table(manager, games::Entity).await?;

        Ok(())
    }
}

async fn create_entity_table<'a, E: EntityTrait>(
    manager: &'a SchemaManager<'a>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(schema.create_table_from_entity(entity))
        .await
}

async fn drop_entity_table<'a, E: EntityTrait>(
    manager: &'a SchemaManager<'a>,
    entity: E,
) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(entity).take()).await
}
