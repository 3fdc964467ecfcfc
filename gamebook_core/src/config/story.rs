//! Story document loading - raw TOML schema and conversion to the graph

use super::ConfigError;
use crate::graph::{Choice, Enemy, Gate, Node, NodeKind, Outcome, StoryGraph};
use crate::player::{Player, HIT_POINTS, MAX_HIT_POINTS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The whole story document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rule system name; empty selects the default
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Starting player state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    #[serde(default)]
    pub attributes: BTreeMap<String, bool>,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub equipment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<ChoiceConfig>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceConfig {
    pub description: String,
    pub next_node_id: String,
    #[serde(default)]
    pub required_discipline: Option<String>,
    #[serde(default)]
    pub required_item: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeConfig {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_int: Vec<i32>,
    pub next_node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyConfig {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "HP")]
    pub hp: i32,
    #[serde(rename = "CS")]
    pub cs: i32,
}

impl GameConfig {
    /// Load a story document from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        super::load_document(path)
    }

    /// Parse a story document from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        super::parse_toml(content)
    }

    /// Build the immutable story graph
    pub fn story(&self) -> Result<StoryGraph, ConfigError> {
        StoryGraph::new(self.nodes.iter().map(NodeConfig::to_node))
    }

    /// Build the starting player
    ///
    /// `MAX_HP` defaults to the starting `HP` so healing has a ceiling.
    pub fn player(&self) -> Player {
        let mut player = Player {
            stats: self.player.stats.clone(),
            abilities: self.player.attributes.clone(),
            items: self.player.inventory.iter().cloned().collect(),
            equipment: self.player.equipment.clone(),
        };
        if !player.stats.contains_key(MAX_HIT_POINTS) {
            if let Some(hp) = player.stats.get(HIT_POINTS).copied() {
                player.set_stat(MAX_HIT_POINTS, hp);
            }
        }
        player
    }
}

impl NodeConfig {
    pub fn to_node(&self) -> Node {
        let kind = match self.node_type.as_str() {
            "story" | "narrative" => NodeKind::Narrative {
                choices: self.choices.iter().map(ChoiceConfig::to_choice).collect(),
            },
            "encounter" => NodeKind::Encounter {
                enemies: self.enemies.iter().map(EnemyConfig::to_enemy).collect(),
                outcomes: self.outcomes.iter().map(OutcomeConfig::to_outcome).collect(),
            },
            "random_roll" | "randomized_branch" => NodeKind::RandomizedBranch {
                outcomes: self.outcomes.iter().map(OutcomeConfig::to_outcome).collect(),
            },
            "end" | "terminal" => NodeKind::Terminal,
            other => NodeKind::Unrecognized {
                kind: other.to_string(),
            },
        };
        Node::new(self.id.as_str(), self.text.as_str(), kind)
    }
}

impl ChoiceConfig {
    pub fn to_choice(&self) -> Choice {
        let mut choice = Choice::new(self.description.as_str(), self.next_node_id.as_str());
        if let Some(discipline) = &self.required_discipline {
            choice = choice.gated(Gate::Ability(discipline.clone()));
        }
        if let Some(item) = &self.required_item {
            choice = choice.gated(Gate::Item(item.clone()));
        }
        choice
    }
}

impl OutcomeConfig {
    pub fn to_outcome(&self) -> Outcome {
        Outcome {
            description: self.description.clone(),
            tag: self.condition.clone(),
            rolls: self.condition_int.clone(),
            next: self.next_node_id.as_str().into(),
        }
    }
}

impl EnemyConfig {
    pub fn to_enemy(&self) -> Enemy {
        Enemy::new(self.name.as_str(), self.hp, self.cs)
    }
}
