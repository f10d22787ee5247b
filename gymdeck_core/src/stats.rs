//! Leaderboard ranking and derived profile statistics.
//!
//! Ranks the local user against the fixed rival set by cumulative XP and
//! computes the display stats: total sessions, total minutes, average
//! difficulty rating, and the consecutive-day streak.

use crate::{UserProfile, WorkoutSession};
use chrono::NaiveDate;
use std::collections::HashSet;

/// How far back the streak scan looks, matching the upstream window
const STREAK_SCAN_DAYS: u32 = 30;

/// One row of the leaderboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub total_xp: u32,
    pub total_workouts: u32,
    /// True for the local user's own row
    pub is_local: bool,
}

/// Rank the local user and the rival set by descending XP.
///
/// Ties keep their original relative order (the local user is listed first
/// among equals because it is prepended before sorting).
pub fn rank_profiles(local: &UserProfile, rivals: &[UserProfile]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = std::iter::once(LeaderboardEntry {
        id: local.id.clone(),
        username: local.username.clone(),
        total_xp: local.total_xp,
        total_workouts: local.total_workouts,
        is_local: true,
    })
    .chain(rivals.iter().map(|r| LeaderboardEntry {
        id: r.id.clone(),
        username: r.username.clone(),
        total_xp: r.total_xp,
        total_workouts: r.total_workouts,
        is_local: false,
    }))
    .collect();

    // sort_by is stable, preserving input order for equal XP
    entries.sort_by(|a, b| b.total_xp.cmp(&a.total_xp));
    entries
}

/// Derived statistics over a session history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileStats {
    pub total_sessions: usize,
    /// Floor of summed elapsed seconds over 60
    pub total_minutes: u64,
    /// Mean difficulty rating to one decimal place, "0" for empty history
    pub average_rating: String,
}

pub fn profile_stats(sessions: &[WorkoutSession]) -> ProfileStats {
    let total_sessions = sessions.len();
    let total_minutes = sessions.iter().map(|s| s.total_duration).sum::<u64>() / 60;
    let average_rating = if sessions.is_empty() {
        "0".to_string()
    } else {
        let sum: u32 = sessions.iter().map(|s| u32::from(s.rating)).sum();
        format!("{:.1}", f64::from(sum) / total_sessions as f64)
    };

    ProfileStats {
        total_sessions,
        total_minutes,
        average_rating,
    }
}

/// The last `count` sessions, newest first
pub fn recent_sessions(sessions: &[WorkoutSession], count: usize) -> Vec<&WorkoutSession> {
    sessions.iter().rev().take(count).collect()
}

/// Consecutive-day streak ending today.
///
/// Scans backward one calendar day at a time and stops at the first gap,
/// except that a gap on today itself does not end the scan: a user who
/// worked out yesterday but not yet today still shows the running streak.
pub fn current_streak(sessions: &[WorkoutSession], today: NaiveDate) -> u32 {
    if sessions.is_empty() {
        return 0;
    }

    let active_days: HashSet<NaiveDate> =
        sessions.iter().map(|s| s.timestamp.date_naive()).collect();

    let mut streak = 0;
    let mut day = today;

    for i in 0..STREAK_SCAN_DAYS {
        if active_days.contains(&day) {
            streak += 1;
        } else if i > 0 {
            break;
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn profile(id: &str, xp: u32) -> UserProfile {
        UserProfile {
            id: id.into(),
            username: id.into(),
            total_xp: xp,
            total_workouts: 0,
            friends: Vec::new(),
        }
    }

    fn session_days_ago(days: i64, duration: u64, rating: u8) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            deck_id: "deck-1".into(),
            user_id: "user-1".into(),
            completed: 4,
            skipped: 0,
            total_duration: duration,
            rating,
            timestamp: Utc::now() - Duration::days(days),
        }
    }

    #[test]
    fn test_rank_descending_by_xp() {
        let local = profile("user-1", 2000);
        let rivals = vec![profile("rival-1", 2450), profile("rival-2", 1890)];

        let ranked = rank_profiles(&local, &rivals);
        let ids: Vec<_> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["rival-1", "user-1", "rival-2"]);
        assert!(ranked[1].is_local);
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let local = profile("user-1", 1890);
        let rivals = vec![profile("rival-1", 2450), profile("rival-2", 1890)];

        let ranked = rank_profiles(&local, &rivals);
        // Local user was prepended, so it stays ahead of the equal rival
        let ids: Vec<_> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["rival-1", "user-1", "rival-2"]);
    }

    #[test]
    fn test_profile_stats() {
        let sessions = vec![
            session_days_ago(0, 95, 4),
            session_days_ago(1, 150, 3),
            session_days_ago(2, 65, 5),
        ];

        let stats = profile_stats(&sessions);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_minutes, 5); // floor(310 / 60)
        assert_eq!(stats.average_rating, "4.0");
    }

    #[test]
    fn test_profile_stats_empty_history() {
        let stats = profile_stats(&[]);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.average_rating, "0");
    }

    #[test]
    fn test_recent_sessions_newest_first() {
        let sessions = vec![
            session_days_ago(3, 60, 3),
            session_days_ago(2, 60, 3),
            session_days_ago(1, 60, 3),
        ];

        let recent = recent_sessions(&sessions, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, sessions[2].id);
        assert_eq!(recent[1].id, sessions[1].id);
    }

    #[test]
    fn test_streak_tolerates_gap_on_today() {
        // Sessions yesterday and the day before, none today: streak is 2
        let sessions = vec![session_days_ago(1, 60, 3), session_days_ago(2, 60, 3)];
        let today = Utc::now().date_naive();
        assert_eq!(current_streak(&sessions, today), 2);
    }

    #[test]
    fn test_streak_counts_today() {
        let sessions = vec![
            session_days_ago(0, 60, 3),
            session_days_ago(1, 60, 3),
            session_days_ago(2, 60, 3),
        ];
        let today = Utc::now().date_naive();
        assert_eq!(current_streak(&sessions, today), 3);
    }

    #[test]
    fn test_streak_broken_by_older_gap() {
        // Only a session three days ago: the gap on yesterday ends the scan
        let sessions = vec![session_days_ago(3, 60, 3)];
        let today = Utc::now().date_naive();
        assert_eq!(current_streak(&sessions, today), 0);
    }

    #[test]
    fn test_streak_empty_history() {
        let today = Utc::now().date_naive();
        assert_eq!(current_streak(&[], today), 0);
    }

    #[test]
    fn test_streak_multiple_sessions_same_day_count_once() {
        let sessions = vec![
            session_days_ago(1, 60, 3),
            session_days_ago(1, 90, 4),
            session_days_ago(2, 60, 3),
        ];
        let today = Utc::now().date_naive();
        assert_eq!(current_streak(&sessions, today), 2);
    }
}
