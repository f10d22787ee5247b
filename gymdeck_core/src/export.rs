//! CSV export of the session history.
//!
//! Writes the full history as a flat CSV for use outside the app. The
//! store itself stays the single JSON document; this is a one-way export.

use crate::{Result, WorkoutSession};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

/// Flat CSV row for one session record
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: String,
    deck_id: &'a str,
    user_id: &'a str,
    completed: u32,
    skipped: u32,
    duration_seconds: u64,
    rating: u8,
    timestamp: String,
}

impl<'a> From<&'a WorkoutSession> for CsvRow<'a> {
    fn from(s: &'a WorkoutSession) -> Self {
        Self {
            id: s.id.to_string(),
            deck_id: &s.deck_id,
            user_id: &s.user_id,
            completed: s.completed,
            skipped: s.skipped,
            duration_seconds: s.total_duration,
            rating: s.rating,
            timestamp: s.timestamp.to_rfc3339(),
        }
    }
}

/// Write all sessions to `path` as CSV, returning the row count
pub fn export_sessions(sessions: &[WorkoutSession], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for session in sessions {
        writer.serialize(CsvRow::from(session))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} sessions to {:?}", sessions.len(), path);
    Ok(sessions.len())
}
