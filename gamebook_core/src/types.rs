//! Core identifiers shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the sentinel node every defeat and structural error is routed to
pub const GAME_OVER: &str = "game_over";

/// Outcome tag selected once every enemy of an encounter is defeated
pub const COMBAT_WON: &str = "combat_won";

/// Identifier for a story node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// The game-over sentinel id
    pub fn game_over() -> Self {
        NodeId(GAME_OVER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_game_over(&self) -> bool {
        self.0 == GAME_OVER
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
