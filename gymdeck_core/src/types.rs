//! Core domain types for GymDeck.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise cards and their kinds
//! - Decks (ordered workout routines)
//! - Workout session records
//! - User profiles and the persisted application state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// XP granted per exercise when a user authors a deck
pub const XP_PER_EXERCISE: u32 = 25;

// ============================================================================
// Exercise Types
// ============================================================================

/// How an exercise card is measured
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Countdown-driven: `duration` is seconds of work
    Timed,
    /// User-paced: `duration` is a repetition count
    RepBased,
}

/// A single exercise card (e.g., "Push-ups")
///
/// Cards are immutable once created; library cards are cloned into decks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseCard {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Seconds for Timed cards, rep count for RepBased cards
    pub duration: u32,
    pub kind: ExerciseKind,
}

// ============================================================================
// Deck Types
// ============================================================================

/// Who authored a deck
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeckOwner {
    System,
    User,
}

/// An ordered collection of exercise cards forming one workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: DeckOwner,
    /// Order is significant: it is the workout sequence
    pub exercises: Vec<ExerciseCard>,
    /// Raw sum of every card's `duration` field, rep-based cards included.
    /// Reps and seconds share this unit, matching the upstream data model.
    pub total_duration: u32,
    pub xp_value: u32,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    /// Build a user-authored deck, computing total duration and XP value
    /// from the exercise list (25 XP per exercise).
    pub fn build_user_deck(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        exercises: Vec<ExerciseCard>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let total_duration = sum_durations(&exercises);
        let xp_value = exercises.len() as u32 * XP_PER_EXERCISE;
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            created_by: DeckOwner::User,
            exercises,
            total_duration,
            xp_value,
            created_at,
        }
    }

    /// Number of cards in the workout sequence
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// An empty deck is permitted and immediately satisfies completion
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Sum of card `duration` fields, regardless of kind
pub fn sum_durations(exercises: &[ExerciseCard]) -> u32 {
    exercises.iter().map(|e| e.duration).sum()
}

// ============================================================================
// Session Record Type
// ============================================================================

/// The immutable historical record produced when a session ends
///
/// Append-only: once pushed onto the history it is never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub deck_id: String,
    pub user_id: String,
    pub completed: u32,
    pub skipped: u32,
    /// Wall-clock seconds from start to finalize, not the sum of card durations
    pub total_duration: u64,
    /// Difficulty rating in 1..=5
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Profile Type
// ============================================================================

/// A user profile with cumulative progress
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub total_xp: u32,
    pub total_workouts: u32,
    pub friends: Vec<String>,
}

impl UserProfile {
    /// Starter profile used when no persisted state exists
    pub fn starter() -> Self {
        Self {
            id: "user-1".into(),
            username: "Athlete".into(),
            total_xp: 0,
            total_workouts: 0,
            friends: Vec::new(),
        }
    }
}
