//! Record assembly.
//!
//! A `SessionEmitter` collects one session's cart interactions while
//! the simulation runs, then seals them with the completion result.
//! Event ids are numbered across the whole run only when outcomes are
//! assembled into a `SimOutput`, in session order, so they do not
//! depend on which worker simulated which session.

use crate::{
    catalog::MenuItem,
    completion::Completion,
    context::SessionContext,
    error::SessionAbort,
    event::{CartEvent, Session},
    types::{ItemId, SessionId},
};
use chrono::NaiveDateTime;
use serde::Serialize;

pub fn session_id(index: u64) -> SessionId {
    format!("S{:06}", index + 1)
}

pub fn event_id(sequence: u64) -> String {
    format!("E{:07}", sequence)
}

/// A cart event awaiting its run-wide id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    pub item_id: ItemId,
    pub timestamp: NaiveDateTime,
    pub cart_position: Option<u32>,
    pub position_shown: Option<u32>,
    pub was_accepted: Option<bool>,
}

impl PendingEvent {
    fn seal(self, event_id: String, session_id: &SessionId) -> CartEvent {
        CartEvent {
            event_id,
            session_id: session_id.clone(),
            item_id: self.item_id,
            timestamp: self.timestamp,
            cart_position: self.cart_position,
            was_recommendation: self.position_shown.is_some(),
            was_accepted: self.was_accepted,
            position_shown: self.position_shown,
        }
    }
}

pub struct SessionEmitter {
    session_id: SessionId,
    events: Vec<PendingEvent>,
}

impl SessionEmitter {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            events: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn organic_add(&mut self, item: &MenuItem, at: NaiveDateTime, cart_position: u32) {
        self.push(PendingEvent {
            item_id: item.item_id.clone(),
            timestamp: at,
            cart_position: Some(cart_position),
            position_shown: None,
            was_accepted: None,
        });
    }

    /// Record a slate member. `cart_position` is Some iff it was accepted.
    pub fn recommendation(
        &mut self,
        item: &MenuItem,
        at: NaiveDateTime,
        position_shown: u32,
        cart_position: Option<u32>,
    ) {
        debug_assert!(position_shown >= 1, "position_shown is 1-based");
        self.push(PendingEvent {
            item_id: item.item_id.clone(),
            timestamp: at,
            cart_position,
            position_shown: Some(position_shown),
            was_accepted: Some(cart_position.is_some()),
        });
    }

    fn push(&mut self, event: PendingEvent) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.timestamp <= event.timestamp),
            "event timestamps must not go backwards"
        );
        self.events.push(event);
    }

    pub fn finish(
        self,
        index: u64,
        context: &SessionContext<'_>,
        completion: Completion,
        num_cart_items: usize,
    ) -> SessionOutcome {
        let session = Session {
            session_id: self.session_id,
            user_id: context.user.user_id.clone(),
            restaurant_id: context.restaurant.restaurant_id.clone(),
            start_time: context.start_time,
            meal_period: context.meal_period,
            zone: context.restaurant.zone.clone(),
            dietary_toggle: context.dietary_toggle,
            order_completed: completion.order_completed,
            final_order_value: completion.final_order_value,
            num_cart_items: num_cart_items as u32,
        };
        SessionOutcome {
            index,
            session,
            events: self.events,
        }
    }
}

/// A finished session and its not-yet-numbered events.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub index: u64,
    pub session: Session,
    events: Vec<PendingEvent>,
}

impl SessionOutcome {
    pub fn events(&self) -> &[PendingEvent] {
        &self.events
    }
}

/// Sessions aborted before emitting anything, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbortTally {
    pub empty_restaurant_menu: u64,
    pub insufficient_candidates: u64,
}

impl AbortTally {
    pub fn record(&mut self, abort: SessionAbort) {
        match abort {
            SessionAbort::EmptyRestaurantMenu => self.empty_restaurant_menu += 1,
            SessionAbort::InsufficientCandidates { .. } => self.insufficient_candidates += 1,
            // Never reaches the session level; the round loop absorbs it.
            SessionAbort::InsufficientRecommendationSlate { .. } => {}
        }
    }

    pub fn total(&self) -> u64 {
        self.empty_restaurant_menu + self.insufficient_candidates
    }
}

/// The immutable result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct SimOutput {
    sessions: Vec<Session>,
    events: Vec<CartEvent>,
    aborted: AbortTally,
}

impl SimOutput {
    /// Number outcomes' events from `E0000001` in ascending session index.
    pub fn assemble(mut outcomes: Vec<SessionOutcome>, aborted: AbortTally) -> Self {
        outcomes.sort_by_key(|o| o.index);

        let mut sessions = Vec::with_capacity(outcomes.len());
        let mut events = Vec::new();
        let mut sequence = 0u64;
        for outcome in outcomes {
            let session_id = outcome.session.session_id.clone();
            for pending in outcome.events {
                sequence += 1;
                events.push(pending.seal(event_id(sequence), &session_id));
            }
            sessions.push(outcome.session);
        }

        Self {
            sessions,
            events,
            aborted,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn events(&self) -> &[CartEvent] {
        &self.events
    }

    pub fn aborted(&self) -> AbortTally {
        self.aborted
    }

    /// Events of one session, in emission order.
    pub fn events_for<'a>(&'a self, session_id: &'a str) -> impl Iterator<Item = &'a CartEvent> + 'a {
        self.events.iter().filter(move |e| e.session_id == session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded_and_one_based() {
        assert_eq!(session_id(0), "S000001");
        assert_eq!(session_id(14_999), "S015000");
        assert_eq!(event_id(1), "E0000001");
    }

    #[test]
    fn tally_ignores_slate_shortfall() {
        let mut tally = AbortTally::default();
        tally.record(SessionAbort::EmptyRestaurantMenu);
        tally.record(SessionAbort::InsufficientCandidates { eligible: 1 });
        tally.record(SessionAbort::InsufficientRecommendationSlate { remaining: 2 });
        assert_eq!(tally.total(), 2);
    }
}
