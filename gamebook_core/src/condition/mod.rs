//! Condition evaluation - Gates on choices and roll-selected outcomes
//!
//! Pure functions of player state and node data.

use crate::graph::{Choice, Gate, Outcome};
use crate::player::Player;

/// Whether the player satisfies a single gate
pub fn gate_satisfied(gate: &Gate, player: &Player) -> bool {
    match gate {
        Gate::Ability(name) => player.has_ability(name),
        Gate::Item(name) => player.has_item(name),
    }
}

/// Whether a choice may be taken
///
/// Ungated choices are always eligible. A gated choice is eligible when the
/// player satisfies any one of its gates.
pub fn eligible(choice: &Choice, player: &Player) -> bool {
    choice.gates.is_empty() || choice.gates.iter().any(|gate| gate_satisfied(gate, player))
}

/// Index of the first outcome, in authored order, whose roll set contains `roll`
pub fn matching_outcome(outcomes: &[Outcome], roll: u8) -> Option<usize> {
    outcomes.iter().position(|outcome| outcome.matches_roll(roll))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice() -> Choice {
        Choice::new("Open the door", "hall")
    }

    #[test]
    fn test_ungated_always_eligible() {
        let empty = Player::new();
        let rich = Player::new()
            .with_ability("Mindblast")
            .with_item("Sommerswerd")
            .with_stat("HP", -4);

        assert!(eligible(&choice(), &empty));
        assert!(eligible(&choice(), &rich));
    }

    #[test]
    fn test_ability_gate() {
        let gated = choice().gated(Gate::Ability("Tracking".to_string()));

        assert!(!eligible(&gated, &Player::new()));
        assert!(eligible(&gated, &Player::new().with_ability("Tracking")));

        let mut lapsed = Player::new();
        lapsed.abilities.insert("Tracking".to_string(), false);
        assert!(!eligible(&gated, &lapsed));
    }

    #[test]
    fn test_item_gate_is_case_sensitive() {
        let gated = choice().gated(Gate::Item("Golden Key".to_string()));

        assert!(eligible(&gated, &Player::new().with_item("Golden Key")));
        assert!(!eligible(&gated, &Player::new().with_item("golden key")));
    }

    #[test]
    fn test_either_gate_suffices() {
        let gated = choice()
            .gated(Gate::Ability("Sixth Sense".to_string()))
            .gated(Gate::Item("Lantern".to_string()));

        assert!(eligible(&gated, &Player::new().with_item("Lantern")));
        assert!(eligible(&gated, &Player::new().with_ability("Sixth Sense")));
        assert!(!eligible(&gated, &Player::new()));
    }

    #[test]
    fn test_first_matching_outcome_wins() {
        let outcomes = vec![
            Outcome::on_rolls(0..=4, "A"),
            Outcome::on_rolls(3..=9, "B"),
        ];

        assert_eq!(matching_outcome(&outcomes, 2), Some(0));
        assert_eq!(matching_outcome(&outcomes, 3), Some(0));
        assert_eq!(matching_outcome(&outcomes, 7), Some(1));
    }

    #[test]
    fn test_no_matching_outcome() {
        let outcomes = vec![Outcome::on_rolls([1, 2], "A")];
        assert_eq!(matching_outcome(&outcomes, 0), None);
        assert_eq!(matching_outcome(&[], 0), None);
    }
}
