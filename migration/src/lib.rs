pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_team_table;
mod m20250301_000002_create_player_table;
mod m20250301_000003_create_lobby_state_table;
mod m20250301_000004_create_chat_message_table;
mod m20250301_000005_seed_lobby;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_team_table::Migration),
            Box::new(m20250301_000002_create_player_table::Migration),
            Box::new(m20250301_000003_create_lobby_state_table::Migration),
            Box::new(m20250301_000004_create_chat_message_table::Migration),
            Box::new(m20250301_000005_seed_lobby::Migration),
        ]
    }
}
