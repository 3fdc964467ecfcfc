//! Prelude module for convenient imports
//!
//! ```rust
//! use gamebook_core::prelude::*;
//! ```

// Story
pub use crate::graph::{Choice, Enemy, Node, NodeKind, Outcome, StoryGraph};
pub use crate::types::NodeId;

// Player
pub use crate::player::{Player, PlayerAction};

// Combat
pub use crate::combat::{CombatResolver, CombatResultTable, RngRolls, RollSource};

// Rules and sessions
pub use crate::rules::{RuleRegistry, RuleSettings, RuleSystem};
pub use crate::session::{Session, SessionEnd};
pub use crate::traversal::{Console, LineConsole, Pacing, Tone};

// Config
pub use crate::config::GameConfig;
