#![forbid(unsafe_code)]

//! Core domain model and business logic for GymDeck.
//!
//! This crate provides:
//! - Domain types (exercise cards, decks, sessions, profiles)
//! - Exercise/deck catalog
//! - Workout session engine and per-card countdown
//! - Deck repository
//! - Leaderboard and profile statistics
//! - Persistence (single-document store), config, auth stub, CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod state;
pub mod engine;
pub mod timer;
pub mod repository;
pub mod stats;
pub mod auth;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use state::AppState;
pub use engine::{Advance, ActiveSession, Finalize, SessionEngine, DEFAULT_RATING};
pub use timer::{Countdown, Tick};
pub use repository::{add_deck, delete_deck, next_deck_id, search_decks, update_deck, DeckPatch};
pub use stats::{current_streak, profile_stats, rank_profiles, recent_sessions, LeaderboardEntry, ProfileStats};
pub use auth::{AuthProvider, AuthSession, StubAuth};
pub use export::export_sessions;
