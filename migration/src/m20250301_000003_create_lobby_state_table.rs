use sea_orm_migration::prelude::*;

/// Creates the `lobby_state` table.
///
/// The API returns the newest row verbatim, so columns can be added here
/// without touching the handlers.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LobbyState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LobbyState::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LobbyState::Phase)
                            .string_len(20)
                            .not_null()
                            .default("waiting"),
                    )
                    .col(ColumnDef::new(LobbyState::MapName).string_len(100).null())
                    .col(
                        ColumnDef::new(LobbyState::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LobbyState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LobbyState {
    Table,
    Id,
    Phase,
    MapName,
    UpdatedAt,
}
