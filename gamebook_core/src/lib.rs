//! gamebook_core - Engine for interactive gamebooks
//!
//! This library provides:
//! - StoryGraph: Nodes loaded from a story file and linked by id
//! - CombatResultTable: Damage lookup by roll and combat ratio
//! - Player: Stats, abilities and items that gate choices
//! - RuleSystem: Pluggable rule sets, selected through a RuleRegistry
//! - Session: The state machine that walks a story from start to a terminal node

pub mod combat;
pub mod condition;
pub mod config;
pub mod graph;
pub mod player;
pub mod prelude;
pub mod rules;
pub mod session;
pub mod traversal;
pub mod types;

// Re-export core types for convenience
pub use combat::{CombatKey, CombatResolver, CombatResultTable, DamageOutcome, RngRolls, RollSource, ScriptedRolls};
pub use config::{load_combat_table, ConfigError, GameConfig};
pub use graph::{Choice, Enemy, Gate, Node, NodeKind, Outcome, StoryGraph};
pub use player::{ActionError, Player, PlayerAction};
pub use rules::{LoneWolfRules, RuleError, RuleRegistry, RuleSettings, RuleSystem, DEFAULT_SYSTEM};
pub use session::{Session, SessionEnd, SessionError, Step};
pub use traversal::{Console, LineConsole, Pacing, Tone, Transition, TransitionReason};
pub use types::NodeId;
