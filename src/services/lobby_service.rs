use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::{PlayerStatus, chat_message, player, team};
use crate::error::AppError;

/// Maximum number of `online` players the lobby admits (5 vs 5).
pub const MAX_ONLINE_PLAYERS: u64 = 10;

/// Number of chat messages returned by a snapshot.
pub const CHAT_HISTORY_LIMIT: u64 = 50;

pub const DEFAULT_LEVEL: i32 = 1;
pub const DEFAULT_AVATAR: &str = "🎮";

// Column limits from the `player` / `chat_message` schema
const MAX_USERNAME_CHARS: usize = 100;
const MAX_AVATAR_CHARS: usize = 16;

/// A player row with its team's display fields (both `None` when unassigned).
#[derive(Debug, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub player: player::Model,
    pub team_name: Option<String>,
    pub team_color: Option<String>,
}

/// Everything a polling client needs to render the lobby.
#[derive(Debug, Serialize)]
pub struct LobbySnapshot {
    pub players: Vec<PlayerView>,
    /// Newest `lobby_state` row as stored, or `{}`.
    pub lobby: Value,
    /// Oldest first.
    pub messages: Vec<chat_message::Model>,
}

/// Join parameters. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct NewPlayer {
    pub username: Option<String>,
    pub level: Option<i32>,
    pub avatar: Option<String>,
}

/// Result of a successful join: the stored row and the leave credential.
#[derive(Debug)]
pub struct JoinedPlayer {
    pub player: player::Model,
    pub session_id: String,
}

pub struct LobbyService;

impl LobbyService {
    /// Read players (with team name/color), the latest lobby state and recent chat.
    pub async fn snapshot<C>(db: &C) -> Result<LobbySnapshot, AppError>
    where
        C: ConnectionTrait,
    {
        let players = player::Entity::find()
            .find_also_related(team::Entity)
            .order_by_asc(player::Column::JoinedAt)
            .order_by_asc(player::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(player, team)| {
                let (team_name, team_color) =
                    team.map_or((None, None), |t| (Some(t.name), Some(t.color)));
                PlayerView {
                    player,
                    team_name,
                    team_color,
                }
            })
            .collect();

        // Shape of lobby_state is owned by the schema, so pass the row through untyped
        let lobby = Value::find_by_statement(Statement::from_string(
            db.get_database_backend(),
            "SELECT * FROM lobby_state ORDER BY id DESC LIMIT 1",
        ))
        .one(db)
        .await?
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let mut messages = chat_message::Entity::find()
            .order_by_desc(chat_message::Column::CreatedAt)
            .order_by_desc(chat_message::Column::Id)
            .limit(CHAT_HISTORY_LIMIT)
            .all(db)
            .await?;
        messages.reverse();

        Ok(LobbySnapshot {
            players,
            lobby,
            messages,
        })
    }

    /// Admit a player to the lobby.
    ///
    /// A join displaces any existing player with the same username: that row (and its
    /// session token) is deleted before the new one is inserted. The capacity check runs
    /// first, so a full lobby rejects even a rejoin. The check and the insert share the
    /// caller's transaction but take no lock, so concurrent joins can overshoot the cap.
    pub async fn join<C>(db: &C, request: NewPlayer) -> Result<JoinedPlayer, AppError>
    where
        C: ConnectionTrait,
    {
        let online = player::Entity::find()
            .filter(player::Column::Status.eq(PlayerStatus::Online.as_str()))
            .count(db)
            .await?;

        if online >= MAX_ONLINE_PLAYERS {
            return Err(AppError::LobbyFull {
                capacity: MAX_ONLINE_PLAYERS,
            });
        }

        // Blank names are replaced, others are stored exactly as given
        let username = request
            .username
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(generate_username);
        check_length("username", &username, MAX_USERNAME_CHARS)?;

        let avatar = request
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());
        check_length("avatar", &avatar, MAX_AVATAR_CHARS)?;

        let displaced = player::Entity::delete_many()
            .filter(player::Column::Username.eq(&username))
            .exec(db)
            .await?;

        let session_id = Uuid::new_v4().to_string();
        let new_player = player::ActiveModel {
            username: Set(username),
            session_id: Set(session_id.clone()),
            status: Set(PlayerStatus::Online.as_str().to_string()),
            level: Set(request.level.unwrap_or(DEFAULT_LEVEL)),
            avatar_emoji: Set(avatar),
            team_id: Set(None),
            joined_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let player = new_player.insert(db).await?;

        tracing::info!(
            player_id = player.id,
            username = %player.username,
            displaced = displaced.rows_affected,
            "Player joined lobby"
        );

        Ok(JoinedPlayer { player, session_id })
    }

    /// Point an online player at a team (`None` clears it).
    ///
    /// Neither id is checked for existence; offline or unknown players are left untouched.
    /// Returns the number of rows changed.
    pub async fn assign_team<C>(
        db: &C,
        player_id: i32,
        team_id: Option<i32>,
    ) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        let result = player::Entity::update_many()
            .col_expr(player::Column::TeamId, Expr::value(team_id))
            .filter(player::Column::Id.eq(player_id))
            .filter(player::Column::Status.eq(PlayerStatus::Online.as_str()))
            .exec(db)
            .await?;

        tracing::debug!(
            player_id,
            ?team_id,
            rows_affected = result.rows_affected,
            "Team assignment"
        );

        Ok(result.rows_affected)
    }

    /// Append a chat message.
    pub async fn send_message<C>(
        db: &C,
        username: &str,
        message: &str,
    ) -> Result<chat_message::Model, AppError>
    where
        C: ConnectionTrait,
    {
        if username.trim().is_empty() || message.trim().is_empty() {
            return Err(AppError::Validation(
                "Both username and message are required.".to_string(),
            ));
        }
        check_length("username", username, MAX_USERNAME_CHARS)?;

        let chat = chat_message::ActiveModel {
            username: Set(username.to_string()),
            message: Set(message.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        Ok(chat.insert(db).await?)
    }

    /// Remove the player holding `session_id`. Unknown or blank tokens remove nothing.
    pub async fn leave<C>(db: &C, session_id: &str) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        if session_id.trim().is_empty() {
            return Ok(0);
        }

        let result = player::Entity::delete_many()
            .filter(player::Column::SessionId.eq(session_id))
            .exec(db)
            .await?;

        tracing::info!(rows_affected = result.rows_affected, "Player left lobby");

        Ok(result.rows_affected)
    }
}

/// `Player_` followed by six hex digits taken from a fresh v4 UUID.
fn generate_username() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("Player_{}", &id[..6])
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_username_format() {
        let name = generate_username();
        assert!(name.starts_with("Player_"));
        let suffix = &name["Player_".len()..];
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_usernames_differ() {
        let names: std::collections::HashSet<String> =
            (0..100).map(|_| generate_username()).collect();
        assert!(names.len() > 95);
    }

    #[test]
    fn test_check_length_counts_chars_not_bytes() {
        assert!(check_length("avatar", "🎮🎮", 2).is_ok());
        assert!(check_length("avatar", "🎮🎮🎮", 2).is_err());
    }
}
