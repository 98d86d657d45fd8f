use sea_orm_migration::prelude::*;

/// Creates the `chat_message` table. Rows are append-only.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatMessage::Username)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatMessage::Message).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Snapshot reads take the newest 50 rows
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_created_at")
                    .table(ChatMessage::Table)
                    .col(ChatMessage::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ChatMessage {
    Table,
    Id,
    Username,
    Message,
    CreatedAt,
}
