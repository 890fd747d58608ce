//! Simulation constants.
//!
//! Every tunable of the session funnel lives here. `SimConfig::default()`
//! carries the calibrated reference values; `SimConfig::load()` reads a
//! JSON override file in which any field may be omitted.

use crate::{
    error::{SimError, SimResult},
    types::{Price, Segment},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An inclusive integer range `[min, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntRange {
    pub min: u64,
    pub max: u64,
}

impl IntRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    fn check(&self, name: &str) -> SimResult<()> {
        if self.min > self.max {
            return Err(invalid(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ── Acceptance model ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceConfig {
    /// Calibration constant. Drives the aggregate 8–12% acceptance rate.
    pub base_probability: f64,
    pub position_decay: f64,
    pub budget_price_threshold: Price,
    pub budget_price_factor: f64,
    pub premium_price_threshold: Price,
    pub premium_price_factor: f64,
    pub novelty_factor: f64,
    pub bestseller_factor: f64,
    /// Clamp the stacked product to [0, 1] before the Bernoulli draw.
    pub clamp_probability: bool,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.12,
            position_decay: 0.15,
            budget_price_threshold: 200,
            budget_price_factor: 0.50,
            premium_price_threshold: 80,
            premium_price_factor: 0.70,
            novelty_factor: 1.50,
            bestseller_factor: 1.30,
            clamp_probability: true,
        }
    }
}

// ── Completion model ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub segment_base: HashMap<Segment, f64>,
    /// Distinct cart items needed for the multi-item bonus.
    pub multi_item_threshold: usize,
    pub multi_item_bonus: f64,
    pub cap: f64,
}

impl CompletionConfig {
    pub fn base_for(&self, segment: Segment) -> f64 {
        self.segment_base.get(&segment).copied().unwrap_or(0.0)
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            segment_base: [
                (Segment::Budget, 0.72),
                (Segment::Premium, 0.85),
                (Segment::Health, 0.78),
                (Segment::Family, 0.85),
                (Segment::Occasional, 0.65),
            ]
            .into(),
            multi_item_threshold: 3,
            multi_item_bonus: 0.10,
            cap: 0.95,
        }
    }
}

// ── Order history ─────────────────────────────────────────────────

/// Past orders generated alongside the sessions as model training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub num_orders: u64,
    pub favourite_cuisine_probability: f64,
    /// Items per order, by segment. Capped by the menu size.
    pub items_per_order: HashMap<Segment, IntRange>,
    pub completion_probability: f64,
    /// Orders before this many weeks into the window are training data.
    pub train_weeks: i64,
    /// Orders in the week after the training weeks are validation data.
    pub validation_weeks: i64,
}

impl HistoryConfig {
    pub fn items_for(&self, segment: Segment) -> IntRange {
        self.items_per_order
            .get(&segment)
            .copied()
            .unwrap_or(IntRange::new(1, 1))
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            num_orders: 30_000,
            favourite_cuisine_probability: 0.70,
            items_per_order: [
                (Segment::Budget, IntRange::new(1, 3)),
                (Segment::Premium, IntRange::new(2, 5)),
                (Segment::Health, IntRange::new(1, 3)),
                (Segment::Family, IntRange::new(3, 7)),
                (Segment::Occasional, IntRange::new(1, 4)),
            ]
            .into(),
            completion_probability: 0.92,
            train_weeks: 3,
            validation_weeks: 1,
        }
    }
}

// ── Session funnel ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub num_sessions: u64,

    /// Sessions start on a whole day in `[window_start, window_end)`.
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// (hour of day, weight) pairs for the session start hour.
    pub hour_weights: Vec<(u32, f64)>,

    pub favourite_cuisine_probability: f64,
    pub diet_switch_probability: f64,
    /// Weight of "veg" on the coin flipped for users who switch diet
    /// without a standing veg or vegan preference.
    pub diet_switch_veg_weight: f64,
    pub min_eligible_items: usize,

    pub rounds: IntRange,
    pub slate_size: IntRange,
    pub min_slate_candidates: usize,
    pub organic_insert_probability: f64,

    pub first_add_delay_secs: IntRange,
    pub round_delay_secs: IntRange,
    pub organic_insert_delay_secs: IntRange,

    pub acceptance: AcceptanceConfig,
    pub completion: CompletionConfig,
    pub history: HistoryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_sessions: 15_000,
            window_start: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid calendar date"),
            window_end: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid calendar date"),
            hour_weights: vec![
                (8, 0.03),
                (9, 0.03),
                (10, 0.04),
                (12, 0.12),
                (13, 0.12),
                (14, 0.08),
                (19, 0.12),
                (20, 0.15),
                (21, 0.12),
                (22, 0.08),
                (23, 0.05),
                (0, 0.03),
                (1, 0.03),
            ],
            favourite_cuisine_probability: 0.60,
            diet_switch_probability: 0.12,
            diet_switch_veg_weight: 0.40,
            min_eligible_items: 2,
            rounds: IntRange::new(1, 3),
            slate_size: IntRange::new(8, 10),
            min_slate_candidates: 3,
            organic_insert_probability: 0.30,
            // Whole seconds, both ends included.
            first_add_delay_secs: IntRange::new(5, 29),
            round_delay_secs: IntRange::new(10, 59),
            organic_insert_delay_secs: IntRange::new(5, 19),
            acceptance: AcceptanceConfig::default(),
            completion: CompletionConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load overrides from a JSON file. Omitted fields keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for unit and integration tests: reference constants,
    /// a small session count.
    pub fn default_test() -> Self {
        Self {
            num_sessions: 500,
            history: HistoryConfig {
                num_orders: 500,
                ..HistoryConfig::default()
            },
            ..Self::default()
        }
    }

    /// Number of whole days sessions may start on.
    pub fn window_days(&self) -> i64 {
        (self.window_end - self.window_start).num_days()
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.window_days() <= 0 {
            return Err(invalid(format!(
                "window_end {} must be after window_start {}",
                self.window_end, self.window_start
            )));
        }
        if self.hour_weights.is_empty() {
            return Err(invalid("hour_weights must not be empty".into()));
        }
        if let Some((h, _)) = self.hour_weights.iter().find(|(h, _)| *h > 23) {
            return Err(invalid(format!("hour_weights: hour {h} out of range")));
        }
        if self.hour_weights.iter().any(|(_, w)| *w < 0.0)
            || self.hour_weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0
        {
            return Err(invalid("hour_weights must be non-negative with a positive sum".into()));
        }

        for (name, p) in [
            ("favourite_cuisine_probability", self.favourite_cuisine_probability),
            ("diet_switch_probability", self.diet_switch_probability),
            ("diet_switch_veg_weight", self.diet_switch_veg_weight),
            ("organic_insert_probability", self.organic_insert_probability),
            ("completion.multi_item_bonus", self.completion.multi_item_bonus),
            ("history.favourite_cuisine_probability", self.history.favourite_cuisine_probability),
            ("history.completion_probability", self.history.completion_probability),
            ("completion.cap", self.completion.cap),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be in [0, 1], got {p}")));
            }
        }

        self.rounds.check("rounds")?;
        self.slate_size.check("slate_size")?;
        self.first_add_delay_secs.check("first_add_delay_secs")?;
        self.round_delay_secs.check("round_delay_secs")?;
        self.organic_insert_delay_secs.check("organic_insert_delay_secs")?;
        if self.slate_size.min == 0 {
            return Err(invalid("slate_size.min must be at least 1".into()));
        }
        if self.min_eligible_items == 0 {
            return Err(invalid("min_eligible_items must be at least 1".into()));
        }

        if self.acceptance.base_probability <= 0.0 {
            return Err(invalid(format!(
                "acceptance.base_probability must be positive, got {}",
                self.acceptance.base_probability
            )));
        }
        if self.history.train_weeks < 0 || self.history.validation_weeks < 0 {
            return Err(invalid("history split weeks must not be negative".into()));
        }
        for segment in Segment::ALL {
            let items = self.history.items_for(segment);
            items.check("history.items_per_order")?;
            if items.min == 0 {
                return Err(invalid(format!(
                    "history.items_per_order for {segment} must start at 1"
                )));
            }
        }

        for segment in Segment::ALL {
            match self.completion.segment_base.get(&segment) {
                Some(p) if (0.0..=1.0).contains(p) => {}
                Some(p) => {
                    return Err(invalid(format!(
                        "completion base for {segment} must be in [0, 1], got {p}"
                    )))
                }
                None => {
                    return Err(invalid(format!("completion base missing for {segment}")))
                }
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> SimError {
    SimError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
        assert_eq!(SimConfig::default().window_days(), 35);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "seed": 7, "acceptance": { "base_probability": 0.2 } }"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.acceptance.base_probability, 0.2);
        assert_eq!(config.acceptance.bestseller_factor, 1.30);
        assert_eq!(config.slate_size, IntRange::new(8, 10));
        assert_eq!(config.completion.base_for(Segment::Occasional), 0.65);
    }

    #[test]
    fn delay_defaults_are_whole_second_ranges() {
        let config = SimConfig::default();
        assert_eq!(config.first_add_delay_secs, IntRange::new(5, 29));
        assert_eq!(config.round_delay_secs, IntRange::new(10, 59));
        assert_eq!(config.organic_insert_delay_secs, IntRange::new(5, 19));
    }

    #[test]
    fn history_defaults_and_validation() {
        let mut config = SimConfig::default();
        assert_eq!(config.history.num_orders, 30_000);
        assert_eq!(config.history.items_for(Segment::Family), IntRange::new(3, 7));
        assert_eq!(config.history.items_for(Segment::Premium), IntRange::new(2, 5));

        config
            .history
            .items_per_order
            .insert(Segment::Budget, IntRange::new(0, 2));
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = SimConfig {
            rounds: IntRange::new(3, 1),
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn missing_segment_base_is_rejected() {
        let mut config = SimConfig::default();
        config.completion.segment_base.remove(&Segment::Health);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }
}
