//! Built-in exercise library, starter decks, and leaderboard rivals.
//!
//! This module provides the read-only content catalog for the system.

use crate::types::*;
use chrono::Utc;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// The complete read-only content catalog
#[derive(Clone, Debug)]
pub struct Catalog {
    /// Library of exercise cards available for deck building
    pub exercises: Vec<ExerciseCard>,
    /// System-authored decks seeded into a fresh install
    pub starter_decks: Vec<Deck>,
    /// Fixed comparison profiles shown on the leaderboard
    pub rivals: Vec<UserProfile>,
}

impl Catalog {
    /// Look up a library card by id
    pub fn exercise(&self, id: &str) -> Option<&ExerciseCard> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for card in &self.exercises {
            if card.id.is_empty() {
                errors.push("Exercise card has empty ID".to_string());
            }
            if card.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", card.id));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for card in &self.exercises {
            if !seen.insert(&card.id) {
                errors.push(format!("Duplicate exercise id '{}'", card.id));
            }
        }

        for deck in &self.starter_decks {
            if deck.id.is_empty() {
                errors.push("Starter deck has empty ID".to_string());
            }
            if deck.title.is_empty() {
                errors.push(format!("Deck '{}' has empty title", deck.id));
            }
            if deck.exercises.is_empty() {
                errors.push(format!("Deck '{}' has no exercises", deck.id));
            }
            if deck.created_by != DeckOwner::System {
                errors.push(format!("Starter deck '{}' is not system-owned", deck.id));
            }
        }

        errors
    }
}

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding the content lists on every operation.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in exercises, decks, and rivals
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn card(id: &str, name: &str, description: &str, duration: u32, kind: ExerciseKind) -> ExerciseCard {
    ExerciseCard {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        duration,
        kind,
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    use ExerciseKind::{RepBased, Timed};

    let exercises = vec![
        card("1", "Push-ups", "Classic chest and tricep exercise", 30, Timed),
        card("2", "Squats", "Lower body strength builder", 30, Timed),
        card("3", "Plank", "Core stability hold", 45, Timed),
        card("4", "Burpees", "Full body cardio blast", 20, RepBased),
        card("5", "Lunges", "Leg and glute workout", 20, RepBased),
        card("6", "Mountain Climbers", "Cardio and core combo", 30, Timed),
        card("7", "Jumping Jacks", "Full body warm-up", 30, Timed),
        card("8", "High Knees", "Cardio intensity", 30, Timed),
        card("9", "Tricep Dips", "Arm strengthening", 15, RepBased),
        card("10", "Bicycle Crunches", "Oblique targeting", 20, RepBased),
        card("11", "Wall Sit", "Leg endurance hold", 45, Timed),
        card("12", "Superman Hold", "Lower back strengthening", 30, Timed),
    ];

    let pick = |ids: &[&str]| -> Vec<ExerciseCard> {
        ids.iter()
            .map(|id| {
                exercises
                    .iter()
                    .find(|e| e.id == *id)
                    .expect("starter deck references library card")
                    .clone()
            })
            .collect()
    };

    let starter_decks = vec![
        Deck {
            id: "deck-1".into(),
            title: "Morning Burn".into(),
            description: "Quick 10-min full body wake-up routine".into(),
            created_by: DeckOwner::System,
            exercises: pick(&["1", "2", "7", "3"]),
            total_duration: 135,
            xp_value: 100,
            created_at: Utc::now(),
        },
        Deck {
            id: "deck-2".into(),
            title: "Core Crusher".into(),
            description: "Intense ab workout for steel core".into(),
            created_by: DeckOwner::System,
            exercises: pick(&["3", "10", "6", "12"]),
            total_duration: 125,
            xp_value: 120,
            created_at: Utc::now(),
        },
        Deck {
            id: "deck-3".into(),
            title: "Leg Day".into(),
            description: "Build powerful lower body strength".into(),
            created_by: DeckOwner::System,
            exercises: pick(&["2", "5", "11", "8"]),
            total_duration: 125,
            xp_value: 110,
            created_at: Utc::now(),
        },
    ];

    let rival = |id: &str, username: &str, total_xp: u32, total_workouts: u32| UserProfile {
        id: id.into(),
        username: username.into(),
        total_xp,
        total_workouts,
        friends: Vec::new(),
    };

    let rivals = vec![
        rival("rival-1", "FitnessPro", 2450, 28),
        rival("rival-2", "GymWarrior", 1890, 22),
        rival("rival-3", "IronWill", 1650, 19),
    ];

    Catalog {
        exercises,
        starter_decks,
        rivals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 12);
        assert_eq!(catalog.starter_decks.len(), 3);
        assert_eq!(catalog.rivals.len(), 3);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_starter_deck_totals_match_cards() {
        let catalog = build_default_catalog();
        for deck in &catalog.starter_decks {
            let sum = crate::types::sum_durations(&deck.exercises);
            assert_eq!(
                deck.total_duration, sum,
                "Deck '{}' total duration out of sync with its cards",
                deck.id
            );
        }
    }

    #[test]
    fn test_exercise_lookup() {
        let catalog = get_default_catalog();
        let plank = catalog.exercise("3").unwrap();
        assert_eq!(plank.name, "Plank");
        assert_eq!(plank.kind, ExerciseKind::Timed);
        assert!(catalog.exercise("999").is_none());
    }

    #[test]
    fn test_rivals_sorted_for_display() {
        let catalog = get_default_catalog();
        // Rival XP values descend; the leaderboard depends on stable input order
        assert!(catalog.rivals.windows(2).all(|w| w[0].total_xp >= w[1].total_xp));
    }
}
