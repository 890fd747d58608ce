use super::{parse_text, SimStore};
use crate::{
    error::SimResult,
    event::TIMESTAMP_FORMAT,
    history::OrderRecord,
    types::MealPeriod,
};
use chrono::NaiveDateTime;
use rusqlite::params;

fn order_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRecord> {
    Ok(OrderRecord {
        order_id:      row.get(0)?,
        user_id:       row.get(1)?,
        restaurant_id: row.get(2)?,
        order_time:    parse_text(row, 3, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
        })?,
        meal_period:   parse_text(row, 4, MealPeriod::parse)?,
        items_ordered: parse_text(row, 5, |s| serde_json::from_str(s).ok())?,
        order_value:   row.get(6)?,
        was_completed: row.get::<_, i32>(7)? != 0,
    })
}

impl SimStore {
    // ── Order history ──────────────────────────────────────────

    pub fn insert_orders(&self, run_id: &str, orders: &[OrderRecord]) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO order_history (
                    run_id, order_id, user_id, restaurant_id, order_time, meal_period,
                    items_ordered, order_value, was_completed
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for o in orders {
                stmt.execute(params![
                    run_id,
                    &o.order_id,
                    &o.user_id,
                    &o.restaurant_id,
                    o.order_time.format(TIMESTAMP_FORMAT).to_string(),
                    o.meal_period.as_str(),
                    serde_json::to_string(&o.items_ordered)?,
                    o.order_value,
                    if o.was_completed { 1i32 } else { 0i32 },
                ])?;
            }
        }
        tx.commit()?;
        log::info!("store: wrote {} past orders for run {run_id}", orders.len());
        Ok(())
    }

    pub fn orders_for_run(&self, run_id: &str) -> SimResult<Vec<OrderRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, user_id, restaurant_id, order_time, meal_period,
                    items_ordered, order_value, was_completed
             FROM order_history WHERE run_id = ?1
             ORDER BY order_id ASC",
        )?;
        let orders = stmt
            .query_map(params![run_id], order_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    pub fn order_count(&self, run_id: &str) -> SimResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM order_history WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }
}
