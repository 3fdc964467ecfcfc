//! Player action commands entered between node transitions

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected action command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    Unknown(String),
    #[error("Action '{action}' requires {requirement}")]
    MissingRequirement {
        action: &'static str,
        requirement: String,
    },
    #[error("Action '{0}' is not supported by this rule system")]
    Unsupported(&'static str),
}

/// A command typed at the action prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Continue without doing anything
    Skip,
    /// Show the status block
    Status,
    /// Restore hit points using a healing ability
    Heal,
    /// Eat a meal
    EatMeal,
}

impl PlayerAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            PlayerAction::Skip => "skip",
            PlayerAction::Status => "status",
            PlayerAction::Heal => "heal",
            PlayerAction::EatMeal => "eat_meal",
        }
    }

    /// Keywords listed in the action prompt
    pub fn keywords() -> &'static [&'static str] {
        &["heal", "eat_meal", "status", "skip"]
    }
}

impl FromStr for PlayerAction {
    type Err = ActionError;

    /// An empty line counts as `skip`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "skip" => Ok(PlayerAction::Skip),
            "status" => Ok(PlayerAction::Status),
            "heal" => Ok(PlayerAction::Heal),
            "eat_meal" => Ok(PlayerAction::EatMeal),
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
