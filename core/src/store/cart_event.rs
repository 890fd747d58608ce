use super::{parse_text, SimStore};
use crate::{
    error::SimResult,
    event::{CartEvent, TIMESTAMP_FORMAT},
};
use chrono::NaiveDateTime;
use rusqlite::params;
use serde::Serialize;

/// Recommendation totals for a run, computed in SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AcceptanceCounts {
    pub shown:    u64,
    pub accepted: u64,
}

impl AcceptanceCounts {
    pub fn rate(&self) -> f64 {
        if self.shown == 0 {
            0.0
        } else {
            self.accepted as f64 / self.shown as f64
        }
    }
}

fn cart_event_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<CartEvent> {
    Ok(CartEvent {
        event_id:           row.get(0)?,
        session_id:         row.get(1)?,
        item_id:            row.get(2)?,
        timestamp:          parse_text(row, 3, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
        })?,
        cart_position:      row.get::<_, Option<i64>>(4)?.map(|p| p as u32),
        was_recommendation: row.get::<_, i32>(5)? != 0,
        was_accepted:       row.get::<_, Option<i32>>(6)?.map(|a| a != 0),
        position_shown:     row.get::<_, Option<i64>>(7)?.map(|p| p as u32),
    })
}

impl SimStore {
    /// Events of one session, in event id order.
    pub fn events_for_session(&self, run_id: &str, session_id: &str) -> SimResult<Vec<CartEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, session_id, item_id, timestamp, cart_position,
                    was_recommendation, was_accepted, position_shown
             FROM cart_event WHERE run_id = ?1 AND session_id = ?2
             ORDER BY event_id ASC",
        )?;
        let events = stmt
            .query_map(params![run_id, session_id], cart_event_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    pub fn acceptance_counts(&self, run_id: &str) -> SimResult<AcceptanceCounts> {
        let (shown, accepted): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(was_accepted), 0)
             FROM cart_event WHERE run_id = ?1 AND was_recommendation = 1",
            params![run_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(AcceptanceCounts {
            shown:    shown as u64,
            accepted: accepted as u64,
        })
    }
}
