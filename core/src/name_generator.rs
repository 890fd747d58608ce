//! Deterministic restaurant name generation using curated lists.
//!
//! All generation is deterministic (same RNG seed = same names).

use crate::rng::SessionRng;
use std::collections::HashSet;

/// Attempts at a fresh name before a duplicate is accepted.
const MAX_NAME_ATTEMPTS: usize = 20;

/// Deterministic name generator for restaurants.
pub struct NameGenerator {
    used: HashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { used: HashSet::new() }
    }

    /// Generate a restaurant name in the style of its cuisine.
    /// Retries a bounded number of times to avoid repeats.
    pub fn restaurant_name(&mut self, cuisine: &str, rng: &mut SessionRng) -> String {
        let templates = Self::templates_for(cuisine);
        let mut name = String::new();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let template = rng.pick(templates).copied().unwrap_or("{} Restaurant");
            let family = Self::family_name(rng);
            name = template.replace("{}", family);
            if !self.used.contains(&name) {
                break;
            }
        }
        self.used.insert(name.clone());
        name
    }

    pub fn family_name(rng: &mut SessionRng) -> &'static str {
        rng.pick(Self::family_names()).copied().unwrap_or("Sharma")
    }

    fn templates_for(cuisine: &str) -> &'static [&'static str] {
        match cuisine {
            "North Indian"      => &["{}'s Dhaba", "Punjab {}", "{} Kitchen", "Desi {}"],
            "South Indian"      => &["{} Tiffins", "Sagar {}", "Udupi {}", "{} Dosa Corner"],
            "Chinese"           => &["{} Wok", "Dragon {}", "{} Chinese Kitchen", "Orient {}"],
            "Mughlai"           => &["{} Darbar", "Royal {}", "Nawab {}"],
            "Biryani"           => &["{} Biryani House", "Paradise {}", "{} Biryani Centre"],
            "Street Food"       => &["{}'s Chaat", "Bombay {}", "{} Street Bites"],
            "Italian"           => &["{}'s Pizzeria", "La {}", "{} Italian Kitchen"],
            "Continental"       => &["{}'s Cafe", "The {} Kitchen", "{} Diner"],
            "Desserts & Bakery" => &["{} Bakery", "Sweet {}", "The {} Patisserie"],
            "Cafe"              => &["Cafe {}", "{}'s Coffee", "{} Brew"],
            _                   => &["{} Restaurant"],
        }
    }

    fn family_names() -> &'static [&'static str] {
        &[
            "Sharma", "Verma", "Gupta", "Mehta", "Kapoor", "Malhotra", "Agarwal", "Bansal",
            "Iyer", "Iyengar", "Nair", "Menon", "Pillai", "Reddy", "Rao", "Naidu",
            "Chatterjee", "Banerjee", "Mukherjee", "Bose", "Das", "Ghosh", "Sen", "Dutta",
            "Patel", "Shah", "Desai", "Joshi", "Kulkarni", "Deshpande", "Patil", "Pawar",
            "Singh", "Gill", "Sandhu", "Dhillon", "Grewal", "Sidhu", "Bajwa", "Chawla",
            "Khan", "Qureshi", "Siddiqui", "Ansari", "Sheikh", "Mirza", "Hussain", "Rizvi",
            "Fernandes", "D'Souza", "Pereira", "Rodrigues", "Gomes", "Pinto", "Lobo", "Dias",
        ]
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}
