//! CRUD over the user's deck collection.
//!
//! The collection itself lives in `AppState`; these operations keep the
//! precomputed duration and XP fields in sync whenever a deck's exercise
//! list changes. Deck ids are caller-generated timestamp strings with no
//! collision check, a carried-over limitation of the original data model.

use crate::types::{sum_durations, Deck, ExerciseCard, XP_PER_EXERCISE};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Generate a deck id from the current time (millisecond resolution)
pub fn next_deck_id(now: DateTime<Utc>) -> String {
    format!("deck-{}", now.timestamp_millis())
}

/// Partial update applied to an existing deck
#[derive(Clone, Debug, Default)]
pub struct DeckPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub exercises: Option<Vec<ExerciseCard>>,
}

/// Append a deck to the collection.
///
/// Rejects empty titles and empty exercise lists; nothing is appended on
/// rejection.
pub fn add_deck(decks: &mut Vec<Deck>, deck: Deck) -> Result<()> {
    if deck.title.trim().is_empty() {
        return Err(Error::Validation("Please enter a deck name".into()));
    }
    if deck.exercises.is_empty() {
        return Err(Error::Validation("Add at least one exercise".into()));
    }
    tracing::info!(deck_id = %deck.id, "Adding deck");
    decks.push(deck);
    Ok(())
}

/// Merge `patch` into the deck with the given id.
///
/// Replacing the exercise list recomputes both total duration and XP value
/// from the new list; title/description edits leave both untouched.
/// A nonexistent id is a no-op.
pub fn update_deck(decks: &mut [Deck], id: &str, patch: DeckPatch) {
    let Some(deck) = decks.iter_mut().find(|d| d.id == id) else {
        tracing::debug!(deck_id = %id, "Update for unknown deck ignored");
        return;
    };

    if let Some(title) = patch.title {
        deck.title = title;
    }
    if let Some(description) = patch.description {
        deck.description = description;
    }
    if let Some(exercises) = patch.exercises {
        deck.total_duration = sum_durations(&exercises);
        deck.xp_value = exercises.len() as u32 * XP_PER_EXERCISE;
        deck.exercises = exercises;
    }
}

/// Remove the deck with the given id; a nonexistent id is a no-op
pub fn delete_deck(decks: &mut Vec<Deck>, id: &str) {
    decks.retain(|d| d.id != id);
}

/// Decks whose title or description contains `query`, case-insensitively.
///
/// An empty query returns every deck in its original order.
pub fn search_decks<'a>(decks: &'a [Deck], query: &str) -> Vec<&'a Deck> {
    let needle = query.to_lowercase();
    decks
        .iter()
        .filter(|d| {
            d.title.to_lowercase().contains(&needle)
                || d.description.to_lowercase().contains(&needle)
        })
        .collect()
}
