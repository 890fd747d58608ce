//! Read-only catalog of users, restaurants and menu items.
//!
//! RULE: The simulation never mutates the catalog. Sessions refer to
//! menu items by their position in `Catalog::items()`.

use crate::{
    error::{SimError, SimResult},
    types::{Category, DietaryPreference, ItemId, Price, RestaurantId, Segment, UserId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Position of a menu item in `Catalog::items()`.
pub type ItemRef = usize;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub segment: Segment,
    pub dietary_preference: DietaryPreference,
    /// Weekdays (0 = Monday) on which the user always eats veg.
    #[serde(default)]
    pub veg_days: BTreeSet<u8>,
    #[serde(default)]
    pub favourite_cuisines: BTreeSet<String>,
}

impl User {
    pub fn is_veg_day(&self, weekday: u8) -> bool {
        self.veg_days.contains(&weekday)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl PriceTier {
    pub fn price_multiplier(&self) -> f64 {
        match self {
            Self::Budget  => 0.75,
            Self::Mid     => 1.0,
            Self::Premium => 1.40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub name: String,
    pub zone: String,
    pub primary_cuisine: String,
    #[serde(default)]
    pub price_tier: PriceTier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub item_id: ItemId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: String,
    pub price: Price,
    pub veg_flag: bool,
    pub availability: bool,
    pub bestseller_flag: bool,
}

/// The catalog snapshot plus lookup indexes built once at construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    users: Vec<User>,
    restaurants: Vec<Restaurant>,
    items: Vec<MenuItem>,
    item_index: HashMap<ItemId, ItemRef>,
    menu_index: HashMap<RestaurantId, Vec<ItemRef>>,
    cuisine_index: HashMap<String, Vec<usize>>,
}

const USERS_FILE: &str = "users.json";
const RESTAURANTS_FILE: &str = "restaurants.json";
const MENU_ITEMS_FILE: &str = "menu_items.json";

impl Catalog {
    pub fn new(
        users: Vec<User>,
        restaurants: Vec<Restaurant>,
        items: Vec<MenuItem>,
    ) -> SimResult<Self> {
        if users.is_empty() {
            return Err(SimError::EmptyCatalog { collection: "users" });
        }
        if restaurants.is_empty() {
            return Err(SimError::EmptyCatalog { collection: "restaurants" });
        }

        let mut item_index = HashMap::with_capacity(items.len());
        let mut menu_index: HashMap<RestaurantId, Vec<ItemRef>> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            if item_index.insert(item.item_id.clone(), i).is_some() {
                return Err(SimError::InvalidConfig {
                    reason: format!("duplicate item_id {} in menu items", item.item_id),
                });
            }
            menu_index.entry(item.restaurant_id.clone()).or_default().push(i);
        }

        let mut cuisine_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, r) in restaurants.iter().enumerate() {
            cuisine_index.entry(r.primary_cuisine.clone()).or_default().push(i);
        }

        Ok(Self {
            users,
            restaurants,
            items,
            item_index,
            menu_index,
            cuisine_index,
        })
    }

    /// Load `users.json`, `restaurants.json` and `menu_items.json`
    /// from `data_dir`. Each file holds a JSON array of records.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let users: Vec<User> = read_json(data_dir, USERS_FILE)?;
        let restaurants: Vec<Restaurant> = read_json(data_dir, RESTAURANTS_FILE)?;
        let items: Vec<MenuItem> = read_json(data_dir, MENU_ITEMS_FILE)?;
        let catalog = Self::new(users, restaurants, items)?;
        log::info!(
            "catalog: loaded {} users, {} restaurants, {} items from {data_dir}",
            catalog.users.len(),
            catalog.restaurants.len(),
            catalog.items.len()
        );
        Ok(catalog)
    }

    /// Write the three collections to `data_dir` in the layout `load` reads.
    pub fn save(&self, data_dir: &str) -> SimResult<()> {
        std::fs::create_dir_all(data_dir)?;
        write_json(data_dir, USERS_FILE, &self.users)?;
        write_json(data_dir, RESTAURANTS_FILE, &self.restaurants)?;
        write_json(data_dir, MENU_ITEMS_FILE, &self.items)?;
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, item_ref: ItemRef) -> &MenuItem {
        &self.items[item_ref]
    }

    pub fn item_by_id(&self, item_id: &str) -> Option<&MenuItem> {
        self.item_index.get(item_id).map(|&i| &self.items[i])
    }

    /// Every menu row of a restaurant, available or not.
    pub fn menu_for(&self, restaurant_id: &str) -> &[ItemRef] {
        self.menu_index
            .get(restaurant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions of restaurants whose primary cuisine is in `cuisines`,
    /// in catalog order.
    pub fn restaurants_with_cuisines(&self, cuisines: &BTreeSet<String>) -> Vec<usize> {
        let mut matching: Vec<usize> = cuisines
            .iter()
            .filter_map(|c| self.cuisine_index.get(c))
            .flatten()
            .copied()
            .collect();
        matching.sort_unstable();
        matching
    }
}

fn read_json<T: serde::de::DeserializeOwned>(data_dir: &str, file: &str) -> anyhow::Result<T> {
    let path = Path::new(data_dir).join(file);
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))
}

fn write_json<T: Serialize>(data_dir: &str, file: &str, value: &T) -> SimResult<()> {
    let path = Path::new(data_dir).join(file);
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
