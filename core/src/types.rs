//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = String;
pub type RestaurantId = String;
pub type ItemId = String;
pub type SessionId = String;
pub type EventId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Menu price in whole currency units.
pub type Price = i64;

/// Behavioural segment of a user. Serialized with its display label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Segment {
    Budget,
    Premium,
    Health,
    Family,
    Occasional,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Self::Budget,
        Self::Premium,
        Self::Health,
        Self::Family,
        Self::Occasional,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Budget     => "Budget",
            Self::Premium    => "Premium",
            Self::Health     => "Health",
            Self::Family     => "Family",
            Self::Occasional => "Occasional",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user's standing dietary preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    Veg,
    Vegan,
    #[serde(rename = "non-veg")]
    NonVeg,
    None,
}

/// The per-session dietary restriction actually applied to the menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DietaryToggle {
    None,
    Veg,
    Vegan,
    #[serde(rename = "non-veg")]
    NonVeg,
}

impl DietaryToggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None   => "none",
            Self::Veg    => "veg",
            Self::Vegan  => "vegan",
            Self::NonVeg => "non-veg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none"    => Some(Self::None),
            "veg"     => Some(Self::Veg),
            "vegan"   => Some(Self::Vegan),
            "non-veg" => Some(Self::NonVeg),
            _         => None,
        }
    }

    /// Veg and vegan toggles restrict the menu to veg-flagged items.
    /// A non-veg toggle leaves the menu unchanged.
    pub fn requires_veg(&self) -> bool {
        matches!(self, Self::Veg | Self::Vegan)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

impl MealPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            7..=10  => Self::Breakfast,
            11..=14 => Self::Lunch,
            19..=22 => Self::Dinner,
            _       => Self::LateNight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch     => "lunch",
            Self::Dinner    => "dinner",
            Self::LateNight => "late_night",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast"  => Some(Self::Breakfast),
            "lunch"      => Some(Self::Lunch),
            "dinner"     => Some(Self::Dinner),
            "late_night" => Some(Self::LateNight),
            _            => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Main,
    Combo,
    Bread,
    Rice,
    Side,
    Beverage,
    Dessert,
    Appetizer,
    Soup,
}

impl Category {
    /// Add-on categories whose first appearance in a cart is boosted.
    pub fn is_novelty(&self) -> bool {
        matches!(self, Self::Beverage | Self::Dessert | Self::Bread | Self::Side)
    }

    /// Categories preferred for the opening organic add.
    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Main | Self::Combo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main      => "main",
            Self::Combo     => "combo",
            Self::Bread     => "bread",
            Self::Rice      => "rice",
            Self::Side      => "side",
            Self::Beverage  => "beverage",
            Self::Dessert   => "dessert",
            Self::Appetizer => "appetizer",
            Self::Soup      => "soup",
        }
    }
}
