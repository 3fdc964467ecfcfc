//! Combat - Result table, roll sources and blow resolution

mod dice;
mod resolution;
mod table;

pub use dice::{RngRolls, RollSource, ScriptedRolls};
pub use resolution::{normalize_ratio, CombatResolver, Resolution};
pub use table::{CombatKey, CombatResultTable, DamageOutcome, MAX_RATIO, MIN_RATIO, ROLL_SIDES};
