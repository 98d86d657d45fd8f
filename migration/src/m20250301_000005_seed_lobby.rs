use sea_orm_migration::prelude::*;

/// Seeds the two lobby teams and an initial `waiting` lobby state row.
#[derive(DeriveMigrationName)]
pub struct Migration;

/// A single team definition.
struct TeamSeed {
    name: &'static str,
    color: &'static str,
}

#[rustfmt::skip]
const TEAMS: &[TeamSeed] = &[
    TeamSeed { name: "Cyan", color: "#00FFFF" },
    TeamSeed { name: "Pink", color: "#FF00FF" },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut teams = Query::insert();
        teams
            .into_table(Team::Table)
            .columns([Team::Name, Team::Color]);
        for team in TEAMS {
            teams.values_panic([team.name.into(), team.color.into()]);
        }
        manager.exec_stmt(teams.to_owned()).await?;

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(LobbyState::Table)
                    .columns([LobbyState::Phase])
                    .values_panic(["waiting".into()])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(LobbyState::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Team::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Name,
    Color,
}

#[derive(DeriveIden)]
enum LobbyState {
    Table,
    Phase,
}
