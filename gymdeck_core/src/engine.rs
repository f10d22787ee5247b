//! Workout session state machine.
//!
//! The engine owns at most one active session and moves it through
//! `Idle -> InProgress -> Finalizing -> Idle`:
//! - `start` creates a fresh traversal over a deck's card sequence
//! - `advance` is the sole mutator of cursor/completed/skipped
//! - `finalize` turns the traversal into an immutable history record and
//!   applies the XP reward to the profile in one in-memory transaction
//!
//! Invalid calls (advance past the end, finalize with nothing active) are
//! explicit outcome variants here; callers that want the original
//! silent-safety behavior simply ignore them.

use crate::{AppState, Deck, ExerciseCard, WorkoutSession};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Rating applied when the user skips the difficulty prompt
pub const DEFAULT_RATING: u8 = 3;

/// Live traversal state of a single workout attempt
///
/// Invariant: `cursor == completed + skipped` and `cursor <= deck.len()`.
#[derive(Clone, Debug)]
pub struct ActiveSession {
    pub deck: Deck,
    pub cursor: usize,
    pub completed: u32,
    pub skipped: u32,
    pub started_at: DateTime<Utc>,
}

/// Outcome of an `advance` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Cursor moved forward by one
    Advanced { cursor: usize },
    /// Cursor already at the end of the sequence; nothing changed
    AlreadyComplete,
    /// No session is active; nothing changed
    NoSession,
}

/// Outcome of a `finalize` call
#[derive(Clone, Debug)]
pub enum Finalize {
    /// Session recorded; reward applied to the profile
    Completed {
        record: WorkoutSession,
        xp_earned: u32,
    },
    /// No session was active; nothing changed
    NoSession,
}

/// The session state machine; holds at most one active session
#[derive(Debug, Default)]
pub struct SessionEngine {
    active: Option<ActiveSession>,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session over `deck`, replacing any active session silently.
    ///
    /// An empty deck is permitted and is immediately complete.
    pub fn start(&mut self, deck: Deck, now: DateTime<Utc>) {
        if self.active.is_some() {
            tracing::debug!("Replacing active session with a new one");
        }
        tracing::info!(deck_id = %deck.id, "Starting workout session");
        self.active = Some(ActiveSession {
            deck,
            cursor: 0,
            completed: 0,
            skipped: 0,
            started_at: now,
        });
    }

    /// Move the cursor forward one card, crediting it as completed or skipped.
    ///
    /// Refuses to move once the cursor has reached the end of the sequence,
    /// so counts can never exceed the card count.
    pub fn advance(&mut self, skipped: bool) -> Advance {
        let Some(session) = self.active.as_mut() else {
            return Advance::NoSession;
        };

        if session.cursor >= session.deck.len() {
            return Advance::AlreadyComplete;
        }

        session.cursor += 1;
        if skipped {
            session.skipped += 1;
        } else {
            session.completed += 1;
        }

        debug_assert_eq!(
            session.cursor as u32,
            session.completed + session.skipped
        );

        Advance::Advanced {
            cursor: session.cursor,
        }
    }

    /// End the active session: append a history record, grant XP, bump the
    /// workout count, and clear the session. One in-memory transaction on
    /// `state`; either all four effects happen or none do.
    ///
    /// Elapsed time is wall-clock seconds from start to now. XP is
    /// proportional to completed cards only; skips earn nothing.
    pub fn finalize(&mut self, rating: u8, now: DateTime<Utc>, state: &mut AppState) -> Finalize {
        let Some(session) = self.active.take() else {
            return Finalize::NoSession;
        };

        let rating = rating.clamp(1, 5);
        let elapsed = (now - session.started_at).num_seconds().max(0) as u64;
        let xp_earned = compute_xp(session.completed, session.deck.len(), session.deck.xp_value);

        let record = WorkoutSession {
            id: Uuid::new_v4(),
            deck_id: session.deck.id.clone(),
            user_id: state.user.id.clone(),
            completed: session.completed,
            skipped: session.skipped,
            total_duration: elapsed,
            rating,
            timestamp: now,
        };

        state.sessions.push(record.clone());
        state.user.total_xp += xp_earned;
        state.user.total_workouts += 1;

        tracing::info!(
            deck_id = %session.deck.id,
            completed = session.completed,
            skipped = session.skipped,
            xp_earned,
            "Workout session finalized"
        );

        Finalize::Completed { record, xp_earned }
    }

    /// Abandon the active session without recording anything
    pub fn abandon(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("Workout session abandoned");
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Card under the cursor, if the sequence is not exhausted
    pub fn current_exercise(&self) -> Option<&ExerciseCard> {
        let session = self.active.as_ref()?;
        session.deck.exercises.get(session.cursor)
    }

    /// True once every card has been advanced past (trivially true for an
    /// empty deck)
    pub fn is_complete(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|s| s.cursor >= s.deck.len())
    }
}

/// XP reward: `floor(completed / total * xp_value)`, 0 for an empty deck
fn compute_xp(completed: u32, total: usize, xp_value: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / total as f64 * f64::from(xp_value)).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Deck, ExerciseKind};
    use chrono::Duration;

    fn timed_deck(count: usize, xp_value: u32) -> Deck {
        let exercises = (0..count)
            .map(|i| crate::ExerciseCard {
                id: format!("{}", i + 1),
                name: format!("Exercise {}", i + 1),
                description: String::new(),
                duration: 30,
                kind: ExerciseKind::Timed,
            })
            .collect();
        let mut deck = Deck::build_user_deck("deck-test", "Test", "", exercises, Utc::now());
        deck.xp_value = xp_value;
        deck
    }

    #[test]
    fn test_advance_counts_add_up() {
        let mut engine = SessionEngine::new();
        engine.start(timed_deck(4, 100), Utc::now());

        assert!(matches!(engine.advance(false), Advance::Advanced { cursor: 1 }));
        assert!(matches!(engine.advance(true), Advance::Advanced { cursor: 2 }));
        assert!(matches!(engine.advance(false), Advance::Advanced { cursor: 3 }));
        assert!(matches!(engine.advance(true), Advance::Advanced { cursor: 4 }));

        let session = engine.active().unwrap();
        assert_eq!(session.cursor, 4);
        assert_eq!(session.completed + session.skipped, 4);
        assert!(engine.is_complete());
    }

    #[test]
    fn test_advance_past_end_is_noop() {
        let mut engine = SessionEngine::new();
        engine.start(timed_deck(2, 50), Utc::now());

        engine.advance(false);
        engine.advance(false);
        assert_eq!(engine.advance(false), Advance::AlreadyComplete);
        assert_eq!(engine.advance(true), Advance::AlreadyComplete);

        let session = engine.active().unwrap();
        assert_eq!(session.cursor, 2);
        assert_eq!(session.completed, 2);
        assert_eq!(session.skipped, 0);
    }

    #[test]
    fn test_advance_without_session() {
        let mut engine = SessionEngine::new();
        assert_eq!(engine.advance(false), Advance::NoSession);
    }

    #[test]
    fn test_finalize_reward_scenario() {
        // Deck of 4 timed cards, xp 100; complete 3, skip 1, rate 4.
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();
        let start = Utc::now();

        engine.start(timed_deck(4, 100), start);
        engine.advance(false);
        engine.advance(false);
        engine.advance(false);
        engine.advance(true);

        let outcome = engine.finalize(4, start + Duration::seconds(95), &mut state);
        let Finalize::Completed { record, xp_earned } = outcome else {
            panic!("expected completed finalize");
        };

        assert_eq!(xp_earned, 75);
        assert_eq!(record.completed, 3);
        assert_eq!(record.skipped, 1);
        assert_eq!(record.rating, 4);
        assert_eq!(record.total_duration, 95);

        // All four effects are observable together
        assert_eq!(state.user.total_xp, 75);
        assert_eq!(state.user.total_workouts, 1);
        assert_eq!(state.sessions.len(), 1);
        assert!(engine.active().is_none());
    }

    #[test]
    fn test_finalize_without_session_is_noop() {
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();

        assert!(matches!(
            engine.finalize(3, Utc::now(), &mut state),
            Finalize::NoSession
        ));
        assert_eq!(state.user.total_workouts, 0);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_empty_deck_completes_with_zero_reward() {
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();

        engine.start(timed_deck(0, 0), Utc::now());
        assert!(engine.is_complete());
        assert!(engine.current_exercise().is_none());

        let Finalize::Completed { xp_earned, .. } =
            engine.finalize(3, Utc::now(), &mut state)
        else {
            panic!("expected completed finalize");
        };
        assert_eq!(xp_earned, 0);
        assert_eq!(state.user.total_workouts, 1);
    }

    #[test]
    fn test_skipped_cards_earn_no_xp() {
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();

        engine.start(timed_deck(3, 90), Utc::now());
        engine.advance(true);
        engine.advance(true);
        engine.advance(true);

        let Finalize::Completed { xp_earned, .. } =
            engine.finalize(2, Utc::now(), &mut state)
        else {
            panic!("expected completed finalize");
        };
        assert_eq!(xp_earned, 0);
    }

    #[test]
    fn test_start_replaces_active_session() {
        let mut engine = SessionEngine::new();
        engine.start(timed_deck(4, 100), Utc::now());
        engine.advance(false);

        engine.start(timed_deck(2, 50), Utc::now());
        let session = engine.active().unwrap();
        assert_eq!(session.cursor, 0);
        assert_eq!(session.deck.len(), 2);
    }

    #[test]
    fn test_rating_clamped_to_range() {
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();

        engine.start(timed_deck(1, 25), Utc::now());
        engine.advance(false);

        let Finalize::Completed { record, .. } = engine.finalize(9, Utc::now(), &mut state)
        else {
            panic!("expected completed finalize");
        };
        assert_eq!(record.rating, 5);
    }

    #[test]
    fn test_early_finalize_keeps_partial_counts() {
        let mut engine = SessionEngine::new();
        let mut state = AppState::default();

        engine.start(timed_deck(4, 100), Utc::now());
        engine.advance(false);
        engine.advance(true);

        let Finalize::Completed { record, xp_earned } =
            engine.finalize(DEFAULT_RATING, Utc::now(), &mut state)
        else {
            panic!("expected completed finalize");
        };

        assert_eq!(record.completed, 1);
        assert_eq!(record.skipped, 1);
        assert_eq!(xp_earned, 25);
        assert_eq!(record.rating, 3);
    }

    #[test]
    fn test_abandon_records_nothing() {
        let mut engine = SessionEngine::new();
        engine.start(timed_deck(3, 75), Utc::now());
        engine.advance(false);
        engine.abandon();
        assert!(engine.active().is_none());
    }

    #[test]
    fn test_compute_xp_floors() {
        assert_eq!(compute_xp(3, 4, 100), 75);
        assert_eq!(compute_xp(1, 3, 100), 33);
        assert_eq!(compute_xp(2, 3, 100), 66);
        assert_eq!(compute_xp(0, 4, 100), 0);
        assert_eq!(compute_xp(0, 0, 100), 0);
    }
}
