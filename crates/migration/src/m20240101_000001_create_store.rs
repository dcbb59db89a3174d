//! Create `store` table.
//!
//! One row per key. `key` is the primary key and the only uniqueness
//! constraint; upserts rely on it to detect insert-vs-update.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Store::Table)
                    .if_not_exists()
                    .col(string(Store::Key).primary_key())
                    .col(text(Store::Value).not_null())
                    .col(timestamp_with_time_zone(Store::Created).not_null())
                    .col(timestamp_with_time_zone(Store::Updated).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Store::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Store { Table, Key, Value, Created, Updated }
