//! Player - Stats, abilities, items and equipment for one session

mod action;

pub use action::{ActionError, PlayerAction};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stat holding current hit points
pub const HIT_POINTS: &str = "HP";
/// Stat holding the hit point ceiling for healing
pub const MAX_HIT_POINTS: &str = "MAX_HP";
/// Stat compared against enemy combat skill
pub const COMBAT_SKILL: &str = "CS";
/// Stat counting carried meals
pub const MEALS: &str = "MEAL";

/// Mutable player state
///
/// Only the encounter loop and validated action commands change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Numeric stats by name; absent stats read as 0
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    /// Boolean abilities (disciplines, skills) by name
    #[serde(default)]
    pub abilities: BTreeMap<String, bool>,
    /// Possessed items
    #[serde(default)]
    pub items: BTreeSet<String>,
    /// Equipped item by slot
    #[serde(default)]
    pub equipment: BTreeMap<String, String>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a stat
    pub fn with_stat(mut self, name: impl Into<String>, value: i32) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    /// Builder: grant an ability
    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        self.abilities.insert(name.into(), true);
        self
    }

    /// Builder: add an item
    pub fn with_item(mut self, name: impl Into<String>) -> Self {
        self.items.insert(name.into());
        self
    }

    pub fn stat(&self, name: &str) -> i32 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn set_stat(&mut self, name: impl Into<String>, value: i32) {
        self.stats.insert(name.into(), value);
    }

    /// Add `delta` to a stat, returning the new value
    pub fn adjust_stat(&mut self, name: &str, delta: i32) -> i32 {
        let value = self.stat(name).saturating_add(delta);
        self.stats.insert(name.to_string(), value);
        value
    }

    pub fn hit_points(&self) -> i32 {
        self.stat(HIT_POINTS)
    }

    pub fn combat_skill(&self) -> i32 {
        self.stat(COMBAT_SKILL)
    }

    /// Healing ceiling; falls back to current hit points when never recorded
    pub fn max_hit_points(&self) -> i32 {
        self.stats
            .get(MAX_HIT_POINTS)
            .copied()
            .unwrap_or_else(|| self.hit_points())
    }

    /// Apply combat losses to hit points
    pub fn take_damage(&mut self, amount: u32) {
        let delta = i32::try_from(amount).unwrap_or(i32::MAX);
        self.adjust_stat(HIT_POINTS, -delta);
    }

    /// Restore hit points up to the ceiling, returning how many were restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hit_points();
        let after = before.saturating_add(amount).min(self.max_hit_points()).max(before);
        self.set_stat(HIT_POINTS, after);
        after - before
    }

    pub fn is_defeated(&self) -> bool {
        self.hit_points() <= 0
    }

    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.get(name).copied().unwrap_or(false)
    }

    pub fn grant_ability(&mut self, name: impl Into<String>) {
        self.abilities.insert(name.into(), true);
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.contains(name)
    }

    pub fn add_item(&mut self, name: impl Into<String>) {
        self.items.insert(name.into());
    }

    /// Remove an item, returning whether it was held
    pub fn remove_item(&mut self, name: &str) -> bool {
        self.items.remove(name)
    }

    /// Equip an item, returning what the slot held before
    pub fn equip(&mut self, slot: impl Into<String>, item: impl Into<String>) -> Option<String> {
        self.equipment.insert(slot.into(), item.into())
    }

    /// Lines of the status block shown between prompts
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (name, value) in &self.stats {
            lines.push(format!("{}: {}", name, value));
        }
        for (name, active) in &self.abilities {
            if *active {
                lines.push(format!("Ability: {}", name));
            }
        }
        let items: Vec<&str> = self.items.iter().map(String::as_str).collect();
        lines.push(format!("Items: [{}]", items.join(", ")));
        let equipped: Vec<String> = self
            .equipment
            .iter()
            .map(|(slot, item)| format!("{}={}", slot, item))
            .collect();
        lines.push(format!("Equipment: [{}]", equipped.join(", ")));
        lines
    }
}
