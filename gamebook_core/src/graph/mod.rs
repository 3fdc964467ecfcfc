//! Story graph - Nodes keyed by id, in authored order

mod node;

pub use node::{combat_won_outcome, Choice, Enemy, Gate, Node, NodeKind, Outcome};

use crate::config::ConfigError;
use crate::types::NodeId;
use std::collections::HashMap;

/// The immutable story graph
///
/// Targets are not checked when the graph is built; a dangling
/// `next` id surfaces when the session tries to move there.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    nodes: HashMap<NodeId, Node>,
    /// Ids in authored order, first one is the start node
    order: Vec<NodeId>,
}

impl StoryGraph {
    /// Build a graph from nodes in authored order
    ///
    /// A repeated id replaces the earlier node but keeps its position.
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Result<Self, ConfigError> {
        let mut map = HashMap::new();
        let mut order = Vec::new();

        for node in nodes {
            let id = node.id.clone();
            if map.insert(id.clone(), node).is_some() {
                tracing::warn!(node = %id, "duplicate node id, later definition wins");
            } else {
                order.push(id);
            }
        }

        if order.is_empty() {
            return Err(ConfigError::ValidationError(
                "story has no nodes".to_string(),
            ));
        }

        Ok(StoryGraph { nodes: map, order })
    }

    /// The node a session starts on
    pub fn start(&self) -> &NodeId {
        &self.order[0]
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in authored order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }
}
