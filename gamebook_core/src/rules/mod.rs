//! Rule systems - Pluggable gamebook rule sets behind one trait

mod lone_wolf;

pub use lone_wolf::{LoneWolfRules, HEALING, HUNTING};

use crate::combat::{CombatResultTable, RollSource};
use crate::config::{ConfigError, GameConfig};
use crate::graph::Node;
use crate::player::{ActionError, Player, PlayerAction};
use crate::session::SessionError;
use crate::traversal::{Console, Pacing, Transition};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Name used when a story does not pick a rule system
pub const DEFAULT_SYSTEM: &str = "lonewolf";

/// Rule system selection and setup error
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Unknown rule system: {0}")]
    UnknownSystem(String),
    #[error("Rule system '{0}' used before initialization")]
    NotInitialized(String),
    #[error("Failed to initialize rule system: {0}")]
    Config(#[from] ConfigError),
}

/// A gamebook rule set
///
/// The session owns the traversal loop; a rule system decides how each
/// non-terminal node is played and how action commands change the player.
pub trait RuleSystem {
    /// Registry name of this rule system
    fn name(&self) -> &str;

    /// Load whatever the rules need before the first node is handled
    fn initialize(&mut self, config: &GameConfig) -> Result<(), RuleError>;

    /// Play a narrative, encounter or randomized-branch node
    fn handle_node(
        &mut self,
        node: &Node,
        player: &mut Player,
        console: &mut dyn Console,
    ) -> Result<Transition, SessionError>;

    /// Apply an action command entered between nodes, returning what happened
    fn update_player(&mut self, player: &mut Player, action: PlayerAction)
        -> Result<String, ActionError>;
}

/// What a rule system is built from
pub struct RuleSettings {
    /// Combat result table file, read on initialize when no table is given
    pub crt_path: PathBuf,
    /// Already loaded table shared between sessions
    pub table: Option<Arc<CombatResultTable>>,
    /// The session's own roll source
    pub rolls: Box<dyn RollSource>,
    pub pacing: Pacing,
}

/// Constructor stored in the registry
pub type RuleConstructor = fn(RuleSettings) -> Box<dyn RuleSystem>;

/// Rule system registry
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    /// Mapping from system name to constructor
    constructors: HashMap<String, RuleConstructor>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RuleRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Register a rule system under a name
    pub fn register(&mut self, name: impl Into<String>, constructor: RuleConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Registry with the built-in rule systems
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_SYSTEM, LoneWolfRules::boxed);
        registry
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the rule system registered under `name`; empty selects the default
    pub fn create(&self, name: &str, settings: RuleSettings) -> Result<Box<dyn RuleSystem>, RuleError> {
        let name = if name.is_empty() { DEFAULT_SYSTEM } else { name };
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RuleError::UnknownSystem(name.to_string()))?;
        Ok(constructor(settings))
    }
}
