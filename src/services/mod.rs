pub mod lobby_service;

pub use lobby_service::LobbyService;
