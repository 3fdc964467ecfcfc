//! Combat resolution - Turn a skill differential and a roll into damage

use super::dice::RollSource;
use super::table::{CombatKey, CombatResultTable, DamageOutcome, MAX_RATIO, MIN_RATIO};
use std::sync::Arc;

/// Clamp a raw combat ratio into the table's domain
///
/// Values at or below -11 collapse to -11, values at or above 11 collapse
/// to 11, everything in between passes through.
pub fn normalize_ratio(ratio: i32) -> i32 {
    ratio.clamp(MIN_RATIO, MAX_RATIO)
}

/// Everything a single blow produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The key that was looked up
    pub key: CombatKey,
    /// Damage to apply to both sides
    pub outcome: DamageOutcome,
    /// False when the table had no entry and a zero outcome was substituted
    pub table_hit: bool,
}

/// Resolves blows against a shared combat result table
#[derive(Debug, Clone)]
pub struct CombatResolver {
    table: Arc<CombatResultTable>,
}

impl CombatResolver {
    pub fn new(table: Arc<CombatResultTable>) -> Self {
        CombatResolver { table }
    }

    /// Resolve one blow, drawing the roll from the session's source
    ///
    /// Pure with respect to both combatants: the caller applies the losses.
    pub fn resolve<R: RollSource + ?Sized>(
        &self,
        player_skill: i32,
        enemy_skill: i32,
        rolls: &mut R,
    ) -> Resolution {
        let roll = rolls.roll();
        self.resolve_with_roll(player_skill, enemy_skill, roll)
    }

    /// Resolve one blow with a known roll (for replays and deterministic testing)
    pub fn resolve_with_roll(&self, player_skill: i32, enemy_skill: i32, roll: u8) -> Resolution {
        let ratio = normalize_ratio(player_skill.saturating_sub(enemy_skill));
        let key = CombatKey::new(roll, ratio);

        match self.table.get(&key) {
            Some(outcome) => Resolution {
                key,
                outcome: *outcome,
                table_hit: true,
            },
            None => {
                tracing::warn!(roll, ratio, "no combat table entry; blow deals no damage");
                Resolution {
                    key,
                    outcome: DamageOutcome::zero(),
                    table_hit: false,
                }
            }
        }
    }
}
