//! LoneWolfRules - Combat result table rules with Kai disciplines

use super::{RuleError, RuleSettings, RuleSystem, DEFAULT_SYSTEM};
use crate::combat::{CombatResolver, CombatResultTable, RollSource};
use crate::config::{load_combat_table, GameConfig};
use crate::graph::{Node, NodeKind};
use crate::player::{ActionError, Player, PlayerAction, COMBAT_SKILL, HIT_POINTS, MEALS};
use crate::session::SessionError;
use crate::traversal::{self, Combat, Console, Pacing, Transition};
use std::path::PathBuf;
use std::sync::Arc;

/// Ability that lets `heal` restore hit points
pub const HEALING: &str = "Healing";
/// Ability that makes `eat_meal` free
pub const HUNTING: &str = "Hunting";

const HEAL_AMOUNT: i32 = 1;
const MEAL_AMOUNT: i32 = 3;

/// Rules for gamebooks resolved on a combat result table
pub struct LoneWolfRules {
    crt_path: PathBuf,
    resolver: Option<CombatResolver>,
    rolls: Box<dyn RollSource>,
    pacing: Pacing,
}

impl LoneWolfRules {
    pub fn from_settings(settings: RuleSettings) -> Self {
        LoneWolfRules {
            crt_path: settings.crt_path,
            resolver: settings.table.map(CombatResolver::new),
            rolls: settings.rolls,
            pacing: settings.pacing,
        }
    }

    /// Registry constructor
    pub fn boxed(settings: RuleSettings) -> Box<dyn RuleSystem> {
        Box::new(Self::from_settings(settings))
    }

    /// Rules over an already loaded table; `initialize` has nothing left to load
    pub fn with_table(table: Arc<CombatResultTable>, rolls: Box<dyn RollSource>) -> Self {
        LoneWolfRules {
            crt_path: PathBuf::new(),
            resolver: Some(CombatResolver::new(table)),
            rolls,
            pacing: Pacing::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

impl RuleSystem for LoneWolfRules {
    fn name(&self) -> &str {
        DEFAULT_SYSTEM
    }

    fn initialize(&mut self, config: &GameConfig) -> Result<(), RuleError> {
        if self.resolver.is_none() {
            let table = load_combat_table(&self.crt_path)?;
            tracing::info!(entries = table.len(), path = %self.crt_path.display(), "combat table loaded");
            self.resolver = Some(CombatResolver::new(Arc::new(table)));
        }

        let has_encounters = config.nodes.iter().any(|n| n.node_type == "encounter");
        let stats = &config.player.stats;
        if has_encounters && !(stats.contains_key(HIT_POINTS) && stats.contains_key(COMBAT_SKILL)) {
            tracing::warn!("story has encounters but the player is missing HP or CS; they read as 0");
        }
        Ok(())
    }

    fn handle_node(
        &mut self,
        node: &Node,
        player: &mut Player,
        console: &mut dyn Console,
    ) -> Result<Transition, SessionError> {
        match &node.kind {
            NodeKind::Narrative { choices } => traversal::narrative(&node.id, choices, player, console),
            NodeKind::Encounter { enemies, outcomes } => {
                let resolver = self
                    .resolver
                    .as_ref()
                    .ok_or_else(|| RuleError::NotInitialized(DEFAULT_SYSTEM.to_string()))?;
                let combat = Combat {
                    resolver,
                    rolls: &mut *self.rolls,
                    pacing: self.pacing,
                };
                traversal::encounter(&node.id, enemies, outcomes, player, combat, console)
            }
            NodeKind::RandomizedBranch { outcomes } => {
                traversal::randomized_branch(&node.id, outcomes, player, &mut *self.rolls, console)
            }
            NodeKind::Terminal | NodeKind::Unrecognized { .. } => Err(SessionError::NotHandled {
                system: DEFAULT_SYSTEM.to_string(),
                node: node.id.clone(),
                kind: node.kind.name().to_string(),
            }),
        }
    }

    fn update_player(&mut self, player: &mut Player, action: PlayerAction) -> Result<String, ActionError> {
        match action {
            PlayerAction::Heal => {
                if !player.has_ability(HEALING) {
                    return Err(ActionError::MissingRequirement {
                        action: "heal",
                        requirement: format!("the {} ability", HEALING),
                    });
                }
                let restored = player.heal(HEAL_AMOUNT);
                Ok(format!("You recover {} HP (HP: {}).", restored, player.hit_points()))
            }
            PlayerAction::EatMeal => {
                if player.has_ability(HUNTING) {
                    let restored = player.heal(MEAL_AMOUNT);
                    return Ok(format!(
                        "You hunt for food and recover {} HP (HP: {}).",
                        restored,
                        player.hit_points()
                    ));
                }
                if player.stat(MEALS) <= 0 {
                    return Err(ActionError::MissingRequirement {
                        action: "eat_meal",
                        requirement: "a meal".to_string(),
                    });
                }
                let left = player.adjust_stat(MEALS, -1);
                let restored = player.heal(MEAL_AMOUNT);
                Ok(format!(
                    "You eat a meal and recover {} HP (HP: {}, meals left: {}).",
                    restored,
                    player.hit_points(),
                    left
                ))
            }
            PlayerAction::Skip | PlayerAction::Status => Err(ActionError::Unsupported(action.keyword())),
        }
    }
}
