use sea_orm_migration::prelude::*;

/// Creates the `player` table for lobby participants.
///
/// `username` is deliberately not unique: a join deletes the previous row for
/// the same name before inserting, and concurrent joins may briefly overlap.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Player {
    Table,
    Id,
    Username,
    SessionId,
    Status,
    Level,
    AvatarEmoji,
    TeamId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Player::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Player::Username).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Player::SessionId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Player::Status)
                            .string_len(20)
                            .not_null()
                            .default("online"),
                    )
                    .col(
                        ColumnDef::new(Player::Level)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Player::AvatarEmoji)
                            .string_len(16)
                            .not_null()
                            .default("🎮"),
                    )
                    .col(ColumnDef::new(Player::TeamId).integer().null())
                    .col(
                        ColumnDef::new(Player::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_team_id")
                            .from(Player::Table, Player::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_player_username")
                    .table(Player::Table)
                    .col(Player::Username)
                    .to_owned(),
            )
            .await?;

        // Capacity check counts by status on every join
        manager
            .create_index(
                Index::create()
                    .name("idx_player_status")
                    .table(Player::Table)
                    .col(Player::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Player::Table).to_owned())
            .await
    }
}
