//! Lobby API - backend for a 5-vs-5 game lobby
//!
//! Clients poll a single endpoint to:
//! - read the lobby snapshot (players with teams, lobby state, recent chat)
//! - join, pick a team, and chat
//! - leave using the session token issued on join

pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
