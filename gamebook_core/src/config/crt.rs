//! Combat result table loading

use super::ConfigError;
use crate::combat::{CombatKey, CombatResultTable, DamageOutcome};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One authored row of the combat result table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrtEntry {
    #[serde(rename = "RandNum")]
    pub rand_num: u8,
    #[serde(rename = "ComRatio")]
    pub com_ratio: i32,
    #[serde(rename = "EnemyLoss", default)]
    pub enemy_loss: u32,
    #[serde(rename = "PlayerLoss", default)]
    pub player_loss: u32,
    #[serde(rename = "IsKilled", default)]
    pub is_killed: bool,
}

/// Container for the table's rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrtDocument {
    pub results: Vec<CrtEntry>,
}

impl CrtDocument {
    /// Build the lookup table, rejecting rows that could never be looked up
    pub fn into_table(self) -> Result<CombatResultTable, ConfigError> {
        let mut table = CombatResultTable::new();
        for entry in self.results {
            let key = CombatKey::new(entry.rand_num, entry.com_ratio);
            if !key.in_domain() {
                return Err(ConfigError::ValidationError(format!(
                    "combat table entry out of range: RandNum {} ComRatio {}",
                    entry.rand_num, entry.com_ratio
                )));
            }
            table.insert(
                key,
                DamageOutcome {
                    enemy_loss: entry.enemy_loss,
                    player_loss: entry.player_loss,
                    is_killed: entry.is_killed,
                },
            );
        }

        let missing = table.missing_keys().len();
        if missing > 0 {
            tracing::warn!(missing, "combat table has gaps; those blows will deal no damage");
        }
        Ok(table)
    }
}

/// Load the combat result table from a TOML or JSON file
pub fn load_combat_table(path: &Path) -> Result<CombatResultTable, ConfigError> {
    let document: CrtDocument = super::load_document(path)?;
    document.into_table()
}

/// Load the combat result table from a TOML string
pub fn parse_combat_table(content: &str) -> Result<CombatResultTable, ConfigError> {
    let document: CrtDocument = super::parse_toml(content)?;
    document.into_table()
}
