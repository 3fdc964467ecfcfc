//! Session - The node traversal state machine
//!
//! Holds the current node id and advances it one node per step. Terminal
//! nodes are absorbing. Unknown node ids and unrecognized node kinds halt
//! the session with an error; every other problem is routed to the
//! game-over node by the handlers.

use crate::graph::{Node, NodeKind, StoryGraph};
use crate::player::{Player, PlayerAction};
use crate::rules::{RuleError, RuleSystem};
use crate::traversal::{show_status, Console, Tone, TransitionReason};
use crate::types::NodeId;
use std::sync::Arc;
use thiserror::Error;

/// Errors that halt a session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Node '{0}' does not exist in the story")]
    UnknownNode(NodeId),
    #[error("Node '{node}' has unrecognized type '{kind}'")]
    UnrecognizedKind { node: NodeId, kind: String },
    #[error("Rule system '{system}' cannot handle {kind} node '{node}'")]
    NotHandled {
        system: String,
        node: NodeId,
        kind: String,
    },
    #[error("Input closed while waiting for the player")]
    InputClosed,
    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rule system error: {0}")]
    Rules(#[from] RuleError),
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Moved from one node to the next
    Moved {
        from: NodeId,
        to: NodeId,
        reason: TransitionReason,
    },
    /// A terminal node was reached; further steps do nothing
    Finished { at: NodeId },
}

/// How a completed session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnd {
    /// The terminal node the session stopped on
    pub node: NodeId,
    /// The player lost a fight on the way here
    pub player_defeated: bool,
}

impl SessionEnd {
    pub fn is_game_over(&self) -> bool {
        self.node.is_game_over()
    }
}

/// One play-through of a story
pub struct Session {
    graph: Arc<StoryGraph>,
    rules: Box<dyn RuleSystem>,
    player: Player,
    current: NodeId,
    finished: bool,
    defeated: bool,
    action_prompt: bool,
}

impl Session {
    /// Start a session on the graph's first authored node
    ///
    /// The rule system must already be initialized.
    pub fn new(graph: Arc<StoryGraph>, rules: Box<dyn RuleSystem>, player: Player) -> Self {
        let current = graph.start().clone();
        Session {
            graph,
            rules,
            player,
            current,
            finished: false,
            defeated: false,
            action_prompt: true,
        }
    }

    /// Enable or disable the action prompt between nodes
    pub fn with_action_prompt(mut self, enabled: bool) -> Self {
        self.action_prompt = enabled;
        self
    }

    pub fn current(&self) -> &NodeId {
        &self.current
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the player lost a fight on the way to the current node
    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Process the current node and move to the next one
    pub fn step(&mut self, console: &mut dyn Console) -> Result<Step, SessionError> {
        if self.finished {
            return Ok(Step::Finished {
                at: self.current.clone(),
            });
        }

        let graph = Arc::clone(&self.graph);
        let node = graph
            .get(&self.current)
            .ok_or_else(|| SessionError::UnknownNode(self.current.clone()))?;

        console.show(Tone::Heading, "---")?;
        console.say(&node.text)?;
        console.show(Tone::Heading, "---")?;

        match &node.kind {
            NodeKind::Terminal => {
                self.finished = true;
                tracing::debug!(node = %node.id, "reached terminal node");
                return Ok(Step::Finished {
                    at: node.id.clone(),
                });
            }
            NodeKind::Unrecognized { kind } => {
                return Err(SessionError::UnrecognizedKind {
                    node: node.id.clone(),
                    kind: kind.clone(),
                });
            }
            _ => {}
        }

        let transition = self.rules.handle_node(node, &mut self.player, console)?;
        if transition.reason == TransitionReason::PlayerDefeated {
            self.defeated = true;
        }

        if !graph.contains(&transition.next) {
            return Err(SessionError::UnknownNode(transition.next));
        }

        tracing::debug!(from = %node.id, to = %transition.next, reason = ?transition.reason, "transition");
        let from = std::mem::replace(&mut self.current, transition.next.clone());
        Ok(Step::Moved {
            from,
            to: transition.next,
            reason: transition.reason,
        })
    }

    /// Run until a terminal node is reached or an error halts the session
    pub fn run(&mut self, console: &mut dyn Console) -> Result<SessionEnd, SessionError> {
        loop {
            match self.step(console)? {
                Step::Finished { at } => {
                    console.show(Tone::Heading, "The End.")?;
                    return Ok(SessionEnd {
                        node: at,
                        player_defeated: self.defeated,
                    });
                }
                Step::Moved { .. } => {
                    let terminal = self.graph.get(&self.current).is_some_and(Node::is_terminal);
                    if self.action_prompt && !terminal {
                        self.prompt_action(console)?;
                    }
                }
            }
        }
    }

    /// Ask for one action command and apply it through the rule system
    fn prompt_action(&mut self, console: &mut dyn Console) -> Result<(), SessionError> {
        console.prompt(&format!("Action ({}): ", PlayerAction::keywords().join(", ")))?;
        let line = console.read_line()?.ok_or(SessionError::InputClosed)?;

        let action = match line.parse::<PlayerAction>() {
            Ok(action) => action,
            Err(e) => {
                console.show(Tone::Warning, &format!("Action error: {}", e))?;
                return Ok(());
            }
        };

        match action {
            PlayerAction::Skip => {}
            PlayerAction::Status => show_status(&self.player, console)?,
            other => {
                match self.rules.update_player(&mut self.player, other) {
                    Ok(message) => console.say(&message)?,
                    Err(e) => {
                        tracing::debug!(action = %other, error = %e, "action rejected");
                        console.show(Tone::Warning, &format!("Action error: {}", e))?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatKey, CombatResultTable, DamageOutcome, ScriptedRolls};
    use crate::graph::{Choice, Enemy, Outcome};
    use crate::rules::LoneWolfRules;
    use crate::traversal::{LineConsole, Pacing};
    use std::io::Cursor;

    fn rules(rolls: ScriptedRolls) -> Box<dyn RuleSystem> {
        let table: CombatResultTable = vec![(CombatKey::new(3, 5), DamageOutcome::new(5, 2))]
            .into_iter()
            .collect();
        Box::new(
            LoneWolfRules::with_table(Arc::new(table), Box::new(rolls)).with_pacing(Pacing::none()),
        )
    }

    fn console(input: &str) -> LineConsole<Cursor<String>, Vec<u8>> {
        LineConsole::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn graph(nodes: Vec<Node>) -> Arc<StoryGraph> {
        Arc::new(StoryGraph::new(nodes).unwrap())
    }

    fn game_over() -> Node {
        Node::new("game_over", "You have failed.", NodeKind::Terminal)
    }

    #[test]
    fn test_zero_choices_goes_to_game_over_without_input() {
        let graph = graph(vec![
            Node::new("start", "Nowhere to go.", NodeKind::Narrative { choices: vec![] }),
            game_over(),
        ]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());
        let mut console = console("");

        let step = session.step(&mut console).unwrap();

        assert!(matches!(step, Step::Moved { ref to, .. } if to.is_game_over()));
        assert_eq!(session.run(&mut console).unwrap().node, NodeId::game_over());
    }

    #[test]
    fn test_dead_end_without_hit_points_is_not_a_defeat() {
        let graph = graph(vec![
            Node::new("start", "Nowhere to go.", NodeKind::Narrative { choices: vec![] }),
            game_over(),
        ]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());

        let end = session.run(&mut console("")).unwrap();

        assert!(end.is_game_over());
        assert!(!end.player_defeated);
        assert!(!session.is_defeated());
        assert_eq!(session.player().hit_points(), 0);
    }

    #[test]
    fn test_lost_fight_is_a_defeat() {
        let graph = graph(vec![
            Node::new(
                "ambush",
                "A Kraan swoops down.",
                NodeKind::Encounter {
                    enemies: vec![Enemy::new("Kraan", 20, 10)],
                    outcomes: vec![Outcome::tagged("combat_won", "end")],
                },
            ),
            Node::new("end", "Fin.", NodeKind::Terminal),
            game_over(),
        ]);
        let player = Player::new().with_stat("HP", 2).with_stat("CS", 15);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(3)), player);

        let end = session.run(&mut console("")).unwrap();

        assert!(end.is_game_over());
        assert!(end.player_defeated);
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let graph = graph(vec![Node::new("end", "Fin.", NodeKind::Terminal)]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());
        let mut console = console("");

        assert_eq!(session.step(&mut console).unwrap(), Step::Finished { at: "end".into() });
        assert_eq!(session.step(&mut console).unwrap(), Step::Finished { at: "end".into() });
        assert!(session.is_finished());
    }

    #[test]
    fn test_unknown_target_halts() {
        let graph = graph(vec![Node::new(
            "start",
            "A door.",
            NodeKind::Narrative {
                choices: vec![Choice::new("Enter", "missing_room")],
            },
        )]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());
        let mut console = console("1\n");

        let err = session.run(&mut console).unwrap_err();
        assert!(matches!(err, SessionError::UnknownNode(ref id) if id.as_str() == "missing_room"));
    }

    #[test]
    fn test_missing_game_over_sentinel_halts() {
        let graph = graph(vec![Node::new(
            "start",
            "Nowhere to go.",
            NodeKind::Narrative { choices: vec![] },
        )]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());

        let err = session.step(&mut console("")).unwrap_err();
        assert!(matches!(err, SessionError::UnknownNode(ref id) if id.is_game_over()));
    }

    #[test]
    fn test_unrecognized_kind_halts() {
        let graph = graph(vec![Node::new(
            "start",
            "?",
            NodeKind::Unrecognized {
                kind: "riddle".to_string(),
            },
        )]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());

        let err = session.run(&mut console("")).unwrap_err();
        assert!(matches!(err, SessionError::UnrecognizedKind { ref kind, .. } if kind == "riddle"));
    }

    #[test]
    fn test_encounter_then_action_prompt() {
        let graph = graph(vec![
            Node::new(
                "ambush",
                "A Kraan swoops down.",
                NodeKind::Encounter {
                    enemies: vec![Enemy::new("Kraan", 5, 10)],
                    outcomes: vec![Outcome::tagged("combat_won", "road")],
                },
            ),
            Node::new(
                "road",
                "The road continues.",
                NodeKind::Narrative {
                    choices: vec![Choice::new("Walk on", "end")],
                },
            ),
            Node::new("end", "Fin.", NodeKind::Terminal),
        ]);
        let player = Player::new()
            .with_stat("HP", 20)
            .with_stat("MAX_HP", 20)
            .with_stat("CS", 15)
            .with_ability("Healing");
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(3)), player);
        // heal after the fight, then pick the only choice; no prompt before the terminal node
        let mut console = console("heal\n1\n");

        let end = session.run(&mut console).unwrap();

        assert_eq!(end.node, NodeId::from("end"));
        assert!(!end.player_defeated);
        assert_eq!(session.player().hit_points(), 19);
    }

    #[test]
    fn test_bad_action_is_not_fatal() {
        let graph = graph(vec![
            Node::new(
                "start",
                "A bridge.",
                NodeKind::Narrative {
                    choices: vec![Choice::new("Cross", "middle")],
                },
            ),
            Node::new(
                "middle",
                "Halfway.",
                NodeKind::Narrative {
                    choices: vec![Choice::new("Keep going", "end")],
                },
            ),
            Node::new("end", "Fin.", NodeKind::Terminal),
        ]);
        let mut session = Session::new(graph, rules(ScriptedRolls::constant(0)), Player::new());
        let mut console = console("1\ndance\n1\n");

        let end = session.run(&mut console).unwrap();
        assert_eq!(end.node, NodeId::from("end"));
        let text = String::from_utf8(console.into_output()).unwrap();
        assert!(text.contains("Action error: Unknown action: dance"));
    }
}
