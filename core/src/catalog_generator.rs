//! Synthetic catalog generation.
//!
//! Produces restaurants, menus and users from a single deterministic
//! stream. Used by sim-runner when no catalog directory is given, and
//! by tests that need a realistically shaped menu.

use crate::{
    catalog::{Catalog, MenuItem, PriceTier, Restaurant, User},
    error::SimResult,
    name_generator::NameGenerator,
    rng::SessionRng,
    types::{Category, DietaryPreference, Segment},
};
use std::collections::BTreeSet;

pub const CUISINES: [(&str, f64); 10] = [
    ("North Indian", 0.25),
    ("South Indian", 0.15),
    ("Chinese", 0.15),
    ("Mughlai", 0.08),
    ("Biryani", 0.10),
    ("Street Food", 0.08),
    ("Italian", 0.07),
    ("Continental", 0.04),
    ("Desserts & Bakery", 0.04),
    ("Cafe", 0.04),
];

pub const ZONES: [&str; 5] = ["Central", "North", "South", "East", "West"];

const PRICE_TIERS: [(PriceTier, f64); 3] = [
    (PriceTier::Budget, 0.35),
    (PriceTier::Mid, 0.45),
    (PriceTier::Premium, 0.20),
];

const SEGMENTS: [(Segment, f64); 5] = [
    (Segment::Budget, 0.30),
    (Segment::Premium, 0.15),
    (Segment::Health, 0.10),
    (Segment::Family, 0.20),
    (Segment::Occasional, 0.25),
];

const HEALTH_DIETS: [(DietaryPreference, f64); 4] = [
    (DietaryPreference::Veg, 0.40),
    (DietaryPreference::Vegan, 0.20),
    (DietaryPreference::NonVeg, 0.20),
    (DietaryPreference::None, 0.20),
];

const GENERAL_DIETS: [(DietaryPreference, f64); 3] = [
    (DietaryPreference::Veg, 0.35),
    (DietaryPreference::NonVeg, 0.45),
    (DietaryPreference::None, 0.20),
];

/// Weights for a user having 0, 1, 2 or 3 fixed veg days.
const VEG_DAY_COUNT_WEIGHTS: [f64; 4] = [0.50, 0.25, 0.15, 0.10];

const AVAILABILITY_RATE: f64 = 0.95;
const BESTSELLER_RATE: f64 = 0.15;

/// Catalog size knobs.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSpec {
    pub restaurants: usize,
    pub users: usize,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            restaurants: 100,
            users: 5000,
        }
    }
}

/// One dish template: (category, name, veg, price_lo, price_hi, subcategory).
type Dish = (Category, &'static str, bool, u32, u32, &'static str);

pub fn generate_catalog(spec: &CatalogSpec, rng: &mut SessionRng) -> SimResult<Catalog> {
    let restaurants = generate_restaurants(spec.restaurants, rng);
    let items = generate_menu_items(&restaurants, rng);
    let users = generate_users(spec.users, rng);
    log::info!(
        "catalog: generated {} restaurants, {} menu items, {} users",
        restaurants.len(),
        items.len(),
        users.len()
    );
    Catalog::new(users, restaurants, items)
}

fn weighted<T: Copy>(table: &[(T, f64)], rng: &mut SessionRng) -> T {
    let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
    table[rng.weighted_index(&weights)].0
}

fn generate_restaurants(n: usize, rng: &mut SessionRng) -> Vec<Restaurant> {
    let mut names = NameGenerator::new();
    (0..n)
        .map(|i| {
            let cuisine = weighted(&CUISINES, rng);
            let zone = rng.pick(&ZONES).copied().unwrap_or("Central");
            let price_tier = weighted(&PRICE_TIERS, rng);
            Restaurant {
                restaurant_id: format!("R{:04}", i + 1),
                name: names.restaurant_name(cuisine, rng),
                zone: zone.to_string(),
                primary_cuisine: cuisine.to_string(),
                price_tier,
            }
        })
        .collect()
}

fn generate_menu_items(restaurants: &[Restaurant], rng: &mut SessionRng) -> Vec<MenuItem> {
    let mut items = Vec::new();
    for rest in restaurants {
        let dishes = dishes_for(&rest.primary_cuisine);
        let multiplier = rest.price_tier.price_multiplier();

        // Group by category, preserving table order.
        let mut categories: Vec<Category> = Vec::new();
        for d in dishes {
            if !categories.contains(&d.0) {
                categories.push(d.0);
            }
        }

        for category in categories {
            let group: Vec<&Dish> = dishes.iter().filter(|d| d.0 == category).collect();
            let keep = if category == Category::Combo {
                rng.range_inclusive(1, group.len() as u64) as usize
            } else {
                let share = 0.60 + rng.next_f64() * 0.35;
                ((group.len() as f64 * share) as usize).max(1)
            };

            for idx in rng.sample_indices(group.len(), keep) {
                let (cat, name, veg, lo, hi, subcat) = *group[idx];
                let base = lo as f64 + rng.next_f64() * (hi - lo) as f64;
                items.push(MenuItem {
                    item_id: format!("I{:05}", items.len() + 1),
                    restaurant_id: rest.restaurant_id.clone(),
                    name: name.to_string(),
                    category: cat,
                    subcategory: subcat.to_string(),
                    price: (base * multiplier) as i64,
                    veg_flag: veg,
                    availability: rng.chance(AVAILABILITY_RATE),
                    bestseller_flag: rng.chance(BESTSELLER_RATE),
                });
            }
        }
    }
    items
}

fn generate_users(n: usize, rng: &mut SessionRng) -> Vec<User> {
    (0..n)
        .map(|i| {
            let segment = weighted(&SEGMENTS, rng);
            let dietary_preference = if segment == Segment::Health {
                weighted(&HEALTH_DIETS, rng)
            } else {
                weighted(&GENERAL_DIETS, rng)
            };

            let veg_day_count = rng.weighted_index(&VEG_DAY_COUNT_WEIGHTS);
            let veg_days: BTreeSet<u8> = rng
                .sample_indices(7, veg_day_count)
                .into_iter()
                .map(|d| d as u8)
                .collect();

            let favourite_count = rng.range_inclusive(1, 3) as usize;
            let favourite_cuisines: BTreeSet<String> = rng
                .sample_indices(CUISINES.len(), favourite_count)
                .into_iter()
                .map(|c| CUISINES[c].0.to_string())
                .collect();

            User {
                user_id: format!("U{:05}", i + 1),
                segment,
                dietary_preference,
                veg_days,
                favourite_cuisines,
            }
        })
        .collect()
}

fn dishes_for(cuisine: &str) -> &'static [Dish] {
    use Category::*;
    match cuisine {
        "North Indian" => &[
            (Main, "Butter Chicken", false, 249, 349, "curry"),
            (Main, "Paneer Butter Masala", true, 209, 299, "curry"),
            (Main, "Dal Makhani", true, 179, 259, "curry"),
            (Main, "Kadai Paneer", true, 199, 289, "curry"),
            (Main, "Chole Masala", true, 149, 219, "curry"),
            (Main, "Mutton Rogan Josh", false, 329, 449, "curry"),
            (Main, "Egg Curry", false, 149, 219, "curry"),
            (Bread, "Butter Naan", true, 45, 69, "naan"),
            (Bread, "Garlic Naan", true, 55, 79, "naan"),
            (Bread, "Tandoori Roti", true, 30, 49, "roti"),
            (Bread, "Laccha Paratha", true, 50, 79, "paratha"),
            (Rice, "Jeera Rice", true, 119, 179, "rice"),
            (Rice, "Veg Pulao", true, 149, 219, "rice"),
            (Side, "Boondi Raita", true, 49, 79, "accompaniment"),
            (Side, "Roasted Papad", true, 25, 39, "accompaniment"),
            (Side, "Green Salad", true, 39, 69, "salad"),
            (Beverage, "Sweet Lassi", true, 59, 99, "lassi"),
            (Beverage, "Masala Chaas", true, 39, 59, "buttermilk"),
            (Beverage, "Coca Cola 300ml", true, 40, 60, "soft_drink"),
            (Dessert, "Gulab Jamun (2 Pcs)", true, 59, 99, "indian_sweet"),
            (Dessert, "Gajar Ka Halwa", true, 79, 119, "indian_sweet"),
            (Appetizer, "Paneer Tikka (6 Pcs)", true, 189, 269, "tikka"),
            (Appetizer, "Chicken Tikka (6 Pcs)", false, 209, 309, "tikka"),
            (Combo, "North Indian Thali Veg", true, 249, 349, "thali"),
            (Combo, "Butter Chicken Meal", false, 329, 429, "meal_combo"),
        ],
        "South Indian" => &[
            (Main, "Masala Dosa", true, 99, 149, "dosa"),
            (Main, "Rava Dosa", true, 99, 139, "dosa"),
            (Main, "Idli (3 Pcs)", true, 59, 89, "idli"),
            (Main, "Medu Vada (2 Pcs)", true, 69, 99, "vada"),
            (Main, "Uttapam", true, 89, 129, "uttapam"),
            (Main, "Chicken Chettinad", false, 229, 329, "curry"),
            (Side, "Sambar", true, 39, 59, "accompaniment"),
            (Side, "Coconut Chutney", true, 29, 49, "accompaniment"),
            (Rice, "Curd Rice", true, 89, 129, "rice"),
            (Rice, "Lemon Rice", true, 99, 139, "rice"),
            (Beverage, "Filter Coffee", true, 39, 69, "coffee"),
            (Beverage, "Buttermilk", true, 29, 49, "buttermilk"),
            (Beverage, "Rose Milk", true, 49, 79, "milk_drink"),
            (Dessert, "Payasam", true, 69, 109, "indian_sweet"),
            (Dessert, "Mysore Pak", true, 49, 79, "indian_sweet"),
            (Combo, "South Indian Thali", true, 199, 279, "thali"),
            (Combo, "Mini Tiffin Combo", true, 149, 199, "meal_combo"),
        ],
        "Chinese" => &[
            (Main, "Veg Fried Rice", true, 149, 219, "fried_rice"),
            (Main, "Chicken Fried Rice", false, 179, 259, "fried_rice"),
            (Main, "Veg Hakka Noodles", true, 149, 219, "noodles"),
            (Main, "Schezwan Noodles", true, 159, 229, "noodles"),
            (Main, "Chilli Chicken", false, 199, 279, "dry_prep"),
            (Main, "Chilli Paneer", true, 179, 259, "dry_prep"),
            (Side, "Veg Spring Rolls (4 Pcs)", true, 109, 159, "spring_roll"),
            (Side, "Chicken Momos (6 Pcs)", false, 119, 179, "momos"),
            (Side, "Veg Momos (6 Pcs)", true, 99, 159, "momos"),
            (Soup, "Hot and Sour Soup", true, 99, 149, "soup"),
            (Soup, "Sweet Corn Soup", true, 89, 139, "soup"),
            (Beverage, "Iced Lemon Tea", true, 59, 89, "iced_tea"),
            (Beverage, "Fresh Lime Soda", true, 49, 79, "soda"),
            (Dessert, "Honey Noodles with Ice Cream", true, 129, 179, "western_dessert"),
            (Combo, "Chinese Combo for 1", true, 199, 279, "meal_combo"),
            (Combo, "Chinese Feast for 2", true, 399, 499, "meal_combo"),
        ],
        "Mughlai" => &[
            (Main, "Nihari", false, 299, 399, "curry"),
            (Main, "Chicken Korma", false, 269, 369, "curry"),
            (Main, "Veg Korma", true, 219, 299, "curry"),
            (Main, "Keema Matar", false, 229, 309, "curry"),
            (Bread, "Sheermal", true, 59, 89, "naan"),
            (Bread, "Roomali Roti", true, 39, 59, "roti"),
            (Bread, "Naan", true, 39, 59, "naan"),
            (Rice, "Zafrani Rice", true, 149, 219, "rice"),
            (Side, "Mint Raita", true, 49, 79, "accompaniment"),
            (Side, "Sirka Pyaz", true, 29, 49, "accompaniment"),
            (Appetizer, "Galouti Kebab (4 Pcs)", false, 249, 349, "kebab"),
            (Appetizer, "Tandoori Paneer Tikka", true, 189, 269, "tikka"),
            (Beverage, "Thandai", true, 79, 119, "milk_drink"),
            (Beverage, "Rose Sharbat", true, 49, 79, "sharbat"),
            (Dessert, "Phirni", true, 79, 119, "indian_sweet"),
            (Dessert, "Shahi Tukda", true, 89, 129, "indian_sweet"),
            (Combo, "Royal Mughlai Thali", false, 449, 599, "thali"),
        ],
        "Biryani" => &[
            (Main, "Chicken Biryani", false, 219, 319, "biryani"),
            (Main, "Mutton Biryani", false, 279, 399, "biryani"),
            (Main, "Veg Biryani", true, 179, 259, "biryani"),
            (Main, "Egg Biryani", false, 169, 249, "biryani"),
            (Main, "Paneer Biryani", true, 199, 279, "biryani"),
            (Side, "Mirchi Ka Salan", true, 69, 109, "salan"),
            (Side, "Raita", true, 49, 79, "accompaniment"),
            (Side, "Boiled Egg (2 Pcs)", false, 39, 59, "accompaniment"),
            (Beverage, "Pepsi 300ml", true, 40, 60, "soft_drink"),
            (Beverage, "Water Bottle 1L", true, 20, 30, "water"),
            (Dessert, "Double Ka Meetha", true, 79, 119, "indian_sweet"),
            (Appetizer, "Chicken 65", false, 179, 259, "dry_prep"),
            (Appetizer, "Paneer 65", true, 159, 239, "dry_prep"),
            (Combo, "Biryani Combo", false, 279, 369, "meal_combo"),
            (Combo, "Family Biryani Pack", false, 499, 699, "meal_combo"),
        ],
        "Street Food" => &[
            (Main, "Pav Bhaji", true, 89, 139, "pav_bhaji"),
            (Main, "Vada Pav", true, 29, 49, "vada_pav"),
            (Main, "Pani Puri (6 Pcs)", true, 49, 79, "chaat"),
            (Main, "Bhel Puri", true, 49, 79, "chaat"),
            (Main, "Chole Bhature", true, 99, 149, "bhature"),
            (Main, "Samosa (2 Pcs)", true, 39, 59, "samosa"),
            (Side, "Extra Pav (2 Pcs)", true, 20, 30, "bread"),
            (Side, "Green Chutney", true, 15, 25, "accompaniment"),
            (Beverage, "Masala Chai", true, 20, 39, "tea"),
            (Beverage, "Sugarcane Juice", true, 39, 59, "juice"),
            (Beverage, "Mango Shake", true, 69, 99, "shake"),
            (Dessert, "Rabri Falooda", true, 89, 129, "falooda"),
            (Dessert, "Jalebi (250g)", true, 59, 89, "indian_sweet"),
            (Combo, "Street Food Platter", true, 149, 199, "meal_combo"),
        ],
        "Italian" => &[
            (Main, "Margherita Pizza Regular", true, 199, 279, "pizza"),
            (Main, "Pepperoni Pizza Regular", false, 249, 349, "pizza"),
            (Main, "Penne Arrabiata", true, 179, 259, "pasta"),
            (Main, "Alfredo Pasta", true, 199, 279, "pasta"),
            (Main, "Lasagna", false, 249, 349, "pasta"),
            (Side, "Garlic Bread (4 Pcs)", true, 89, 129, "bread"),
            (Side, "Caesar Salad", true, 129, 179, "salad"),
            (Beverage, "Virgin Mojito", true, 89, 129, "mocktail"),
            (Beverage, "Cold Coffee", true, 79, 119, "coffee"),
            (Dessert, "Tiramisu", true, 149, 199, "western_dessert"),
            (Dessert, "Chocolate Brownie", true, 99, 149, "western_dessert"),
            (Combo, "Italian Meal for 1", true, 299, 399, "meal_combo"),
        ],
        "Continental" => &[
            (Main, "Grilled Chicken Steak", false, 279, 379, "steak"),
            (Main, "Fish and Chips", false, 249, 349, "fish"),
            (Main, "Veg Burger", true, 129, 179, "burger"),
            (Main, "Club Sandwich Veg", true, 139, 199, "sandwich"),
            (Side, "French Fries", true, 79, 119, "fries"),
            (Side, "Coleslaw", true, 49, 79, "salad"),
            (Beverage, "Fresh Orange Juice", true, 79, 119, "juice"),
            (Beverage, "Coca Cola 300ml", true, 40, 60, "soft_drink"),
            (Dessert, "Chocolate Lava Cake", true, 149, 199, "western_dessert"),
            (Dessert, "New York Cheesecake", true, 169, 229, "western_dessert"),
            (Appetizer, "Nachos with Salsa", true, 129, 179, "appetizer"),
            (Appetizer, "Chicken Wings (6 Pcs)", false, 179, 249, "wings"),
        ],
        "Desserts & Bakery" => &[
            (Dessert, "Chocolate Truffle Cake Slice", true, 99, 149, "cake"),
            (Dessert, "Red Velvet Cake Slice", true, 109, 159, "cake"),
            (Dessert, "Chocolate Mousse", true, 89, 129, "mousse"),
            (Dessert, "Rasgulla (4 Pcs)", true, 69, 99, "indian_sweet"),
            (Dessert, "Veg Puff", true, 29, 49, "puff"),
            (Dessert, "Chicken Puff", false, 39, 59, "puff"),
            (Dessert, "Fruit Tart", true, 89, 129, "tart"),
            (Beverage, "Hot Chocolate", true, 89, 129, "hot_drink"),
            (Beverage, "Cappuccino", true, 79, 109, "coffee"),
            (Combo, "Dessert Box", true, 249, 349, "meal_combo"),
            (Combo, "Cake and Coffee Combo", true, 149, 199, "meal_combo"),
        ],
        "Cafe" => &[
            (Beverage, "Americano", true, 79, 109, "coffee"),
            (Beverage, "Latte", true, 99, 139, "coffee"),
            (Beverage, "Cold Brew", true, 109, 149, "coffee"),
            (Beverage, "Matcha Latte", true, 129, 169, "tea"),
            (Beverage, "Berry Smoothie", true, 119, 159, "smoothie"),
            (Beverage, "Masala Chai", true, 49, 69, "tea"),
            (Side, "Grilled Sandwich Veg", true, 99, 139, "sandwich"),
            (Side, "Grilled Sandwich Chicken", false, 119, 159, "sandwich"),
            (Side, "Croissant", true, 59, 89, "pastry"),
            (Dessert, "Blueberry Muffin", true, 59, 89, "muffin"),
            (Dessert, "Banana Bread", true, 69, 99, "bread"),
            (Combo, "Breakfast Combo", true, 149, 199, "meal_combo"),
        ],
        _ => &[],
    }
}
