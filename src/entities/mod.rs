pub mod chat_message;
pub mod player;
pub mod player_status;
pub mod team;

pub use player_status::PlayerStatus;
