//! Node - A single step of the story and the data its kind needs

use crate::types::{NodeId, COMBAT_WON};
use serde::{Deserialize, Serialize};

/// A requirement a choice can be gated on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// The player's ability map must hold `true` for this name
    Ability(String),
    /// The player must possess this item (exact, case-sensitive)
    Item(String),
}

/// A menu entry on a narrative node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub description: String,
    pub next: NodeId,
    /// Satisfying any one gate makes the choice eligible; empty means ungated
    #[serde(default)]
    pub gates: Vec<Gate>,
}

impl Choice {
    pub fn new(description: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Choice {
            description: description.into(),
            next: next.into(),
            gates: Vec::new(),
        }
    }

    /// Add a gate to the choice
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn is_gated(&self) -> bool {
        !self.gates.is_empty()
    }
}

/// Where an encounter or a randomized branch leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub description: Option<String>,
    /// String tag such as `combat_won`
    #[serde(default)]
    pub tag: Option<String>,
    /// Rolls that select this outcome in a randomized branch
    #[serde(default)]
    pub rolls: Vec<i32>,
    pub next: NodeId,
}

impl Outcome {
    /// Outcome selected by a string tag
    pub fn tagged(tag: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Outcome {
            description: None,
            tag: Some(tag.into()),
            rolls: Vec::new(),
            next: next.into(),
        }
    }

    /// Outcome selected by roll membership
    pub fn on_rolls(rolls: impl IntoIterator<Item = i32>, next: impl Into<NodeId>) -> Self {
        Outcome {
            description: None,
            tag: None,
            rolls: rolls.into_iter().collect(),
            next: next.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn matches_roll(&self, roll: u8) -> bool {
        self.rolls.contains(&i32::from(roll))
    }

    /// Menu label: the description, or the target id when none was authored
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(self.next.as_str())
    }
}

/// An opponent in an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub hit_points: i32,
    pub combat_skill: i32,
}

impl Enemy {
    pub fn new(name: impl Into<String>, hit_points: i32, combat_skill: i32) -> Self {
        Enemy {
            name: name.into(),
            hit_points,
            combat_skill,
        }
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hit_points = self
            .hit_points
            .saturating_sub(i32::try_from(amount).unwrap_or(i32::MAX));
    }

    pub fn is_defeated(&self) -> bool {
        self.hit_points <= 0
    }
}

/// What a node does, carrying only the fields that kind needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Player picks among choices
    Narrative { choices: Vec<Choice> },
    /// Enemies are fought in order, then the `combat_won` outcome is taken
    Encounter {
        enemies: Vec<Enemy>,
        outcomes: Vec<Outcome>,
    },
    /// A roll decides which outcome is taken
    RandomizedBranch { outcomes: Vec<Outcome> },
    /// End of the story
    Terminal,
    /// An authored type the engine does not know; halts the session when reached
    Unrecognized { kind: String },
}

impl NodeKind {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Narrative { .. } => "narrative",
            NodeKind::Encounter { .. } => "encounter",
            NodeKind::RandomizedBranch { .. } => "randomized-branch",
            NodeKind::Terminal => "terminal",
            NodeKind::Unrecognized { kind } => kind,
        }
    }
}

/// A node of the story graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            text: text.into(),
            kind,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal)
    }

    /// Every node id this node can lead to, in authored order
    pub fn targets(&self) -> Vec<&NodeId> {
        match &self.kind {
            NodeKind::Narrative { choices } => choices.iter().map(|c| &c.next).collect(),
            NodeKind::Encounter { outcomes, .. } | NodeKind::RandomizedBranch { outcomes } => {
                outcomes.iter().map(|o| &o.next).collect()
            }
            NodeKind::Terminal | NodeKind::Unrecognized { .. } => Vec::new(),
        }
    }
}

/// Find the outcome an encounter takes once every enemy is down
pub fn combat_won_outcome(outcomes: &[Outcome]) -> Option<&Outcome> {
    outcomes.iter().find(|o| o.has_tag(COMBAT_WON))
}
