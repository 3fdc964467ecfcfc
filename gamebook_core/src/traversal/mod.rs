//! Node handlers - How each kind of node picks the next node id
//!
//! Rule systems compose these to implement `RuleSystem::handle_node`.
//! Invalid input is absorbed here by re-prompting; only console failures
//! and exhausted input escape as errors.

mod console;

pub use console::{Console, LineConsole, Tone};

use crate::combat::{CombatResolver, RollSource};
use crate::condition::{eligible, matching_outcome};
use crate::graph::{combat_won_outcome, Choice, Enemy, Outcome};
use crate::player::Player;
use crate::session::SessionError;
use crate::types::NodeId;
use std::time::Duration;

/// Why a node was left
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionReason {
    /// The player picked an eligible choice
    Chosen,
    /// Every enemy of the encounter was defeated
    CombatWon,
    /// The player fell in combat
    PlayerDefeated,
    /// The roll selected the outcome the player confirmed
    RollMatched,
    /// The node could not be traversed as authored
    StructuralError(String),
}

/// The next node to move to and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: NodeId,
    pub reason: TransitionReason,
}

impl Transition {
    pub fn new(next: NodeId, reason: TransitionReason) -> Self {
        Transition { next, reason }
    }

    /// Route to the game-over node after a structural problem
    pub fn structural(message: impl Into<String>) -> Self {
        Transition {
            next: NodeId::game_over(),
            reason: TransitionReason::StructuralError(message.into()),
        }
    }
}

/// Delays around each narrated blow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub before_blow: Duration,
    pub after_blow: Duration,
}

impl Pacing {
    /// No delays (tests, scripted runs)
    pub fn none() -> Self {
        Pacing {
            before_blow: Duration::ZERO,
            after_blow: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            before_blow: Duration::from_secs(1),
            after_blow: Duration::from_secs(2),
        }
    }
}

/// Show the player's status block
pub fn show_status(player: &Player, console: &mut dyn Console) -> Result<(), SessionError> {
    console.show(Tone::Status, "--- Status ---")?;
    for line in player.status_lines() {
        console.show(Tone::Status, &line)?;
    }
    console.show(Tone::Status, "--- Status ---")?;
    Ok(())
}

/// Read a 1-based menu selection
///
/// Returns the 0-based index, or `None` for anything that is not an
/// in-range number.
fn read_selection(console: &mut dyn Console, count: usize) -> Result<Option<usize>, SessionError> {
    console.prompt("Choose (number): ")?;
    let line = console.read_line()?.ok_or(SessionError::InputClosed)?;
    Ok(match line.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    })
}

fn structural(console: &mut dyn Console, message: String) -> Result<Transition, SessionError> {
    tracing::warn!("{}", message);
    console.show(Tone::Warning, &format!("Error: {}", message))?;
    Ok(Transition::structural(message))
}

/// Present the choices of a narrative node and wait for an eligible pick
///
/// Ineligible choices are listed but picking one only re-prompts. A node
/// without choices goes straight to game over without reading input.
pub fn narrative(
    node: &NodeId,
    choices: &[Choice],
    player: &Player,
    console: &mut dyn Console,
) -> Result<Transition, SessionError> {
    if choices.is_empty() {
        return structural(console, format!("node '{}' has no choices", node));
    }

    console.show(Tone::Heading, "Choices:")?;
    for (i, choice) in choices.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, choice.description))?;
    }

    loop {
        let Some(index) = read_selection(console, choices.len())? else {
            console.show(Tone::Warning, "Invalid selection, try again.")?;
            show_status(player, console)?;
            continue;
        };

        let choice = &choices[index];
        if eligible(choice, player) {
            return Ok(Transition::new(choice.next.clone(), TransitionReason::Chosen));
        }

        console.show(Tone::Warning, "You cannot take that path.")?;
        show_status(player, console)?;
    }
}

/// Everything an encounter needs besides the node data
pub struct Combat<'a, R: RollSource + ?Sized> {
    pub resolver: &'a CombatResolver,
    pub rolls: &'a mut R,
    pub pacing: Pacing,
}

/// Fight the node's enemies one at a time, in authored order
///
/// Each enemy is a fresh copy of the authored one. A blow that drops both
/// sides counts as a player defeat.
pub fn encounter<R: RollSource + ?Sized>(
    node: &NodeId,
    enemies: &[Enemy],
    outcomes: &[Outcome],
    player: &mut Player,
    combat: Combat<'_, R>,
    console: &mut dyn Console,
) -> Result<Transition, SessionError> {
    console.show(Tone::Heading, "--- Encounter! ---")?;

    for authored in enemies {
        let mut enemy = authored.clone();

        while !enemy.is_defeated() {
            console.show(
                Tone::Combat,
                &format!("You (HP:{} CS:{})", player.hit_points(), player.combat_skill()),
            )?;
            console.show(
                Tone::Combat,
                &format!("{} (HP:{} CS:{})", enemy.name, enemy.hit_points, enemy.combat_skill),
            )?;

            console.pause(combat.pacing.before_blow);
            console.show(Tone::Combat, &format!("You strike at {}!", enemy.name))?;
            console.pause(combat.pacing.after_blow);

            let blow = combat
                .resolver
                .resolve(player.combat_skill(), enemy.combat_skill, &mut *combat.rolls);
            if !blow.table_hit {
                console.show(
                    Tone::Warning,
                    &format!(
                        "No combat table entry for roll {} at ratio {}; no damage dealt.",
                        blow.key.roll, blow.key.ratio
                    ),
                )?;
            }

            enemy.take_damage(blow.outcome.enemy_loss);
            player.take_damage(blow.outcome.player_loss);
            console.show(
                Tone::Combat,
                &format!(
                    "You deal {} damage to {} and take {} damage.",
                    blow.outcome.enemy_loss, enemy.name, blow.outcome.player_loss
                ),
            )?;
            console.show(
                Tone::Combat,
                &format!("{} has {} HP left; you have {}.", enemy.name, enemy.hit_points, player.hit_points()),
            )?;

            if player.is_defeated() {
                console.show(Tone::Combat, "You have fallen!")?;
                tracing::debug!(node = %node, enemy = %enemy.name, "player defeated");
                return Ok(Transition::new(
                    NodeId::game_over(),
                    TransitionReason::PlayerDefeated,
                ));
            }
        }

        console.show(Tone::Combat, &format!("{} is defeated!", enemy.name))?;
    }

    match combat_won_outcome(outcomes) {
        Some(outcome) => Ok(Transition::new(outcome.next.clone(), TransitionReason::CombatWon)),
        None => structural(console, format!("node '{}' has no combat_won outcome", node)),
    }
}

/// Roll once and let the player confirm the outcome the roll selects
///
/// Only the first outcome containing the roll is accepted; other picks
/// re-prompt. If no outcome contains the roll the node is a dead end and
/// the session goes to game over.
pub fn randomized_branch<R: RollSource + ?Sized>(
    node: &NodeId,
    outcomes: &[Outcome],
    player: &Player,
    rolls: &mut R,
    console: &mut dyn Console,
) -> Result<Transition, SessionError> {
    let roll = rolls.roll();
    console.show(Tone::Heading, &format!("The roll is {}.", roll))?;

    let Some(target) = matching_outcome(outcomes, roll) else {
        return structural(console, format!("node '{}' has no outcome for roll {}", node, roll));
    };

    console.show(Tone::Heading, "Choices:")?;
    for (i, outcome) in outcomes.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, outcome.label()))?;
    }

    loop {
        match read_selection(console, outcomes.len())? {
            Some(index) if index == target => {
                return Ok(Transition::new(
                    outcomes[index].next.clone(),
                    TransitionReason::RollMatched,
                ));
            }
            Some(_) => console.show(Tone::Warning, "The roll does not allow that.")?,
            None => console.show(Tone::Warning, "Invalid selection, try again.")?,
        }
        show_status(player, console)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatKey, CombatResultTable, DamageOutcome, ScriptedRolls};
    use crate::graph::Gate;
    use std::io::Cursor;
    use std::sync::Arc;

    type TestConsole = LineConsole<Cursor<String>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        LineConsole::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn output(console: TestConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn resolver(entries: &[(u8, i32, u32, u32)]) -> CombatResolver {
        let table: CombatResultTable = entries
            .iter()
            .map(|&(roll, ratio, e, p)| (CombatKey::new(roll, ratio), DamageOutcome::new(e, p)))
            .collect();
        CombatResolver::new(Arc::new(table))
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_narrative_no_choices_reads_nothing() {
        let mut console = console("");
        let t = narrative(&id("dead_end"), &[], &Player::new(), &mut console).unwrap();

        assert_eq!(t.next, NodeId::game_over());
        assert!(matches!(t.reason, TransitionReason::StructuralError(_)));
    }

    #[test]
    fn test_narrative_reprompts_on_bad_input() {
        let choices = vec![Choice::new("North", "north"), Choice::new("South", "south")];
        let mut console = console("abc\n0\n3\n2\n");

        let t = narrative(&id("fork"), &choices, &Player::new(), &mut console).unwrap();

        assert_eq!(t.next, id("south"));
        assert_eq!(t.reason, TransitionReason::Chosen);
        assert_eq!(output(console).matches("Invalid selection").count(), 3);
    }

    #[test]
    fn test_narrative_gated_choice() {
        let choices = vec![
            Choice::new("Use the key", "vault").gated(Gate::Item("Golden Key".to_string())),
            Choice::new("Walk away", "road"),
        ];

        let mut locked = console("1\n2\n");
        let t = narrative(&id("door"), &choices, &Player::new(), &mut locked).unwrap();
        assert_eq!(t.next, id("road"));
        assert!(output(locked).contains("You cannot take that path."));

        let mut unlocked = console("1\n");
        let player = Player::new().with_item("Golden Key");
        let t = narrative(&id("door"), &choices, &player, &mut unlocked).unwrap();
        assert_eq!(t.next, id("vault"));
    }

    #[test]
    fn test_narrative_input_closed() {
        let choices = vec![Choice::new("North", "north")];
        let mut console = console("9\n");
        let err = narrative(&id("fork"), &choices, &Player::new(), &mut console).unwrap_err();
        assert!(matches!(err, SessionError::InputClosed));
    }

    #[test]
    fn test_encounter_single_blow() {
        let resolver = resolver(&[(3, 5, 5, 2)]);
        let mut rolls = ScriptedRolls::constant(3);
        let mut player = Player::new().with_stat("HP", 20).with_stat("CS", 15);
        let enemies = vec![Enemy::new("Kraan", 5, 10)];
        let outcomes = vec![Outcome::tagged("combat_won", "bridge")];
        let mut console = console("");

        let t = encounter(
            &id("ambush"),
            &enemies,
            &outcomes,
            &mut player,
            Combat { resolver: &resolver, rolls: &mut rolls, pacing: Pacing::none() },
            &mut console,
        )
        .unwrap();

        assert_eq!(t, Transition::new(id("bridge"), TransitionReason::CombatWon));
        assert_eq!(player.hit_points(), 18);
        // authored enemy untouched, the fought copy drops to 0
        assert_eq!(enemies[0].hit_points, 5);
        let text = output(console);
        assert!(text.contains("Kraan has 0 HP left; you have 18."));
        assert!(text.contains("Kraan is defeated!"));
    }

    #[test]
    fn test_encounter_enemies_in_order() {
        let resolver = resolver(&[(0, 5, 4, 0), (0, 3, 4, 1)]);
        let mut rolls = ScriptedRolls::constant(0);
        let mut player = Player::new().with_stat("HP", 10).with_stat("CS", 15);
        let enemies = vec![
            Enemy::new("Giak", 4, 10),
            Enemy::new("Giak Captain", 8, 12),
        ];
        let outcomes = vec![Outcome::tagged("combat_won", "camp")];
        let mut console = console("");

        let t = encounter(
            &id("ambush"),
            &enemies,
            &outcomes,
            &mut player,
            Combat { resolver: &resolver, rolls: &mut rolls, pacing: Pacing::none() },
            &mut console,
        )
        .unwrap();

        assert_eq!(t.next, id("camp"));
        assert_eq!(player.hit_points(), 8);
        let text = output(console);
        let first = text.find("Giak is defeated!").unwrap();
        let second = text.find("Giak Captain is defeated!").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_simultaneous_defeat_is_player_defeat() {
        let resolver = resolver(&[(5, 0, 10, 10)]);
        let mut rolls = ScriptedRolls::constant(5);
        let mut player = Player::new().with_stat("HP", 10).with_stat("CS", 10);
        let enemies = vec![Enemy::new("Vordak", 10, 10), Enemy::new("Gourgaz", 20, 10)];
        let outcomes = vec![Outcome::tagged("combat_won", "victory")];
        let mut console = console("");

        let t = encounter(
            &id("duel"),
            &enemies,
            &outcomes,
            &mut player,
            Combat { resolver: &resolver, rolls: &mut rolls, pacing: Pacing::none() },
            &mut console,
        )
        .unwrap();

        assert_eq!(t, Transition::new(NodeId::game_over(), TransitionReason::PlayerDefeated));
        assert!(!output(console).contains("Gourgaz"));
    }

    #[test]
    fn test_encounter_without_combat_won() {
        let resolver = resolver(&[(1, 0, 9, 0)]);
        let mut rolls = ScriptedRolls::constant(1);
        let mut player = Player::new().with_stat("HP", 10).with_stat("CS", 10);
        let enemies = vec![Enemy::new("Rat", 2, 10)];
        let mut console = console("");

        let t = encounter(
            &id("cellar"),
            &enemies,
            &[],
            &mut player,
            Combat { resolver: &resolver, rolls: &mut rolls, pacing: Pacing::none() },
            &mut console,
        )
        .unwrap();

        assert_eq!(t.next, NodeId::game_over());
        assert!(matches!(t.reason, TransitionReason::StructuralError(_)));
    }

    #[test]
    fn test_encounter_table_miss_continues() {
        // first blow misses the table (roll 2), second hits (roll 4)
        let resolver = resolver(&[(4, 0, 6, 0)]);
        let mut rolls = ScriptedRolls::new([2, 4]);
        let mut player = Player::new().with_stat("HP", 10).with_stat("CS", 10);
        let enemies = vec![Enemy::new("Drakkar", 6, 10)];
        let outcomes = vec![Outcome::tagged("combat_won", "gate")];
        let mut console = console("");

        let t = encounter(
            &id("gate"),
            &enemies,
            &outcomes,
            &mut player,
            Combat { resolver: &resolver, rolls: &mut rolls, pacing: Pacing::none() },
            &mut console,
        )
        .unwrap();

        assert_eq!(t.next, id("gate"));
        assert_eq!(player.hit_points(), 10);
        assert!(output(console).contains("No combat table entry for roll 2 at ratio 0"));
    }

    #[test]
    fn test_randomized_branch_forced_roll() {
        let outcomes = vec![
            Outcome::on_rolls(0..=4, "A").with_description("Left"),
            Outcome::on_rolls(5..=9, "B").with_description("Right"),
        ];
        let mut rolls = ScriptedRolls::constant(7);
        let mut console = console("1\n2\n");

        let t = randomized_branch(&id("coin"), &outcomes, &Player::new(), &mut rolls, &mut console)
            .unwrap();

        assert_eq!(t, Transition::new(id("B"), TransitionReason::RollMatched));
        let text = output(console);
        assert!(text.contains("The roll is 7."));
        assert!(text.contains("The roll does not allow that."));
    }

    #[test]
    fn test_randomized_branch_only_first_match() {
        let outcomes = vec![Outcome::on_rolls(0..=5, "A"), Outcome::on_rolls(3..=9, "B")];
        let mut rolls = ScriptedRolls::constant(4);
        let mut console = console("2\n1\n");

        let t = randomized_branch(&id("coin"), &outcomes, &Player::new(), &mut rolls, &mut console)
            .unwrap();
        assert_eq!(t.next, id("A"));
    }

    #[test]
    fn test_randomized_branch_no_outcome_for_roll() {
        let outcomes = vec![Outcome::on_rolls([0, 1], "A")];
        let mut rolls = ScriptedRolls::constant(8);
        let mut console = console("");

        let t = randomized_branch(&id("coin"), &outcomes, &Player::new(), &mut rolls, &mut console)
            .unwrap();
        assert_eq!(t.next, NodeId::game_over());
    }
}
