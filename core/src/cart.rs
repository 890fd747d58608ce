//! In-session cart state.
//!
//! An id set for membership plus an ordered (category, price) list,
//! so novelty and position checks never rescan the menu.

use crate::{
    catalog::{ItemRef, MenuItem},
    types::{Category, Price},
};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Cart {
    members: HashSet<ItemRef>,
    lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub item: ItemRef,
    pub category: Category,
    pub price: Price,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item and return its 1-based cart position.
    /// Returns None if the item is already in the cart.
    pub fn add(&mut self, item_ref: ItemRef, item: &MenuItem) -> Option<u32> {
        if !self.members.insert(item_ref) {
            return None;
        }
        self.lines.push(CartLine {
            item: item_ref,
            category: item.category,
            price: item.price,
        });
        Some(self.lines.len() as u32)
    }

    pub fn contains(&self, item_ref: ItemRef) -> bool {
        self.members.contains(&item_ref)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.lines.iter().any(|l| l.category == category)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_price(&self) -> Price {
        self.lines.iter().map(|l| l.price).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}
