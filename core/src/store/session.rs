use super::{parse_text, SimStore};
use crate::{
    emitter::SimOutput,
    error::SimResult,
    event::{Session, TIMESTAMP_FORMAT},
    types::{DietaryToggle, MealPeriod},
};
use chrono::NaiveDateTime;
use rusqlite::params;

fn session_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        session_id:        row.get(0)?,
        user_id:           row.get(1)?,
        restaurant_id:     row.get(2)?,
        start_time:        parse_text(row, 3, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
        })?,
        meal_period:       parse_text(row, 4, MealPeriod::parse)?,
        zone:              row.get(5)?,
        dietary_toggle:    parse_text(row, 6, DietaryToggle::parse)?,
        order_completed:   row.get::<_, i32>(7)? != 0,
        final_order_value: row.get(8)?,
        num_cart_items:    row.get::<_, i64>(9)? as u32,
    })
}

impl SimStore {
    // ── Sessions and events ────────────────────────────────────

    /// Write a whole run's sessions and cart events in one transaction.
    pub fn insert_output(&self, run_id: &str, output: &SimOutput) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut insert_session = tx.prepare_cached(
                "INSERT INTO session (
                    run_id, session_id, user_id, restaurant_id, start_time, meal_period,
                    zone, dietary_toggle, order_completed, final_order_value, num_cart_items
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for s in output.sessions() {
                insert_session.execute(params![
                    run_id,
                    &s.session_id,
                    &s.user_id,
                    &s.restaurant_id,
                    s.start_time.format(TIMESTAMP_FORMAT).to_string(),
                    s.meal_period.as_str(),
                    &s.zone,
                    s.dietary_toggle.as_str(),
                    if s.order_completed { 1i32 } else { 0i32 },
                    s.final_order_value,
                    s.num_cart_items as i64,
                ])?;
            }

            let mut insert_event = tx.prepare_cached(
                "INSERT INTO cart_event (
                    run_id, event_id, session_id, item_id, timestamp, cart_position,
                    was_recommendation, was_accepted, position_shown
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for e in output.events() {
                insert_event.execute(params![
                    run_id,
                    &e.event_id,
                    &e.session_id,
                    &e.item_id,
                    e.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    e.cart_position.map(|p| p as i64),
                    if e.was_recommendation { 1i32 } else { 0i32 },
                    e.was_accepted.map(|a| if a { 1i32 } else { 0i32 }),
                    e.position_shown.map(|p| p as i64),
                ])?;
            }
        }
        tx.commit()?;
        log::info!(
            "store: wrote {} sessions and {} cart events for run {run_id}",
            output.sessions().len(),
            output.events().len()
        );
        Ok(())
    }

    pub fn sessions_for_run(&self, run_id: &str) -> SimResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, user_id, restaurant_id, start_time, meal_period, zone,
                    dietary_toggle, order_completed, final_order_value, num_cart_items
             FROM session WHERE run_id = ?1
             ORDER BY session_id ASC",
        )?;
        let sessions = stmt
            .query_map(params![run_id], session_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    pub fn session_count(&self, run_id: &str) -> SimResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM session WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }
}
