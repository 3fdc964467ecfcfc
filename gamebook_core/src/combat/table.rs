//! CombatResultTable - Immutable lookup from (roll, ratio) to damage

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lowest combat ratio the table is keyed on
pub const MIN_RATIO: i32 = -11;
/// Highest combat ratio the table is keyed on
pub const MAX_RATIO: i32 = 11;
/// Rolls are drawn from `0..ROLL_SIDES`
pub const ROLL_SIDES: u8 = 10;

/// Composite key into the combat result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatKey {
    /// Random roll in 0..=9
    pub roll: u8,
    /// Combat ratio already clamped to -11..=11
    pub ratio: i32,
}

impl CombatKey {
    pub fn new(roll: u8, ratio: i32) -> Self {
        CombatKey { roll, ratio }
    }

    /// Whether the key lies inside the table's domain
    pub fn in_domain(&self) -> bool {
        self.roll < ROLL_SIDES && (MIN_RATIO..=MAX_RATIO).contains(&self.ratio)
    }
}

/// Damage dealt to both sides by a single blow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Hit points the enemy loses
    pub enemy_loss: u32,
    /// Hit points the player loses
    pub player_loss: u32,
    /// Killing-blow marker carried from the authored table
    pub is_killed: bool,
}

impl DamageOutcome {
    pub fn new(enemy_loss: u32, player_loss: u32) -> Self {
        DamageOutcome {
            enemy_loss,
            player_loss,
            is_killed: false,
        }
    }

    /// The outcome used when the table has no entry for a key
    pub fn zero() -> Self {
        Self::default()
    }
}

/// The combat result table, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct CombatResultTable {
    entries: HashMap<CombatKey, DamageOutcome>,
}

impl CombatResultTable {
    /// Create an empty table
    pub fn new() -> Self {
        CombatResultTable {
            entries: HashMap::new(),
        }
    }

    /// Insert an entry; a later entry for the same key replaces the earlier one
    pub fn insert(&mut self, key: CombatKey, outcome: DamageOutcome) {
        self.entries.insert(key, outcome);
    }

    pub fn get(&self, key: &CombatKey) -> Option<&DamageOutcome> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of the full domain that have no authored entry, in roll-major order
    pub fn missing_keys(&self) -> Vec<CombatKey> {
        (0..ROLL_SIDES)
            .flat_map(|roll| (MIN_RATIO..=MAX_RATIO).map(move |ratio| CombatKey::new(roll, ratio)))
            .filter(|key| !self.entries.contains_key(key))
            .collect()
    }
}

impl FromIterator<(CombatKey, DamageOutcome)> for CombatResultTable {
    fn from_iter<T: IntoIterator<Item = (CombatKey, DamageOutcome)>>(iter: T) -> Self {
        CombatResultTable {
            entries: iter.into_iter().collect(),
        }
    }
}
