use crate::{
	dice::{Dice, DieRoll, Modifier, Rolled},
	outcome::{classify, is_critical_failure, is_trait_critical_failure, Outcome},
};

#[test]
fn thresholds_against_target_six() {
	assert_eq!(classify(8, Some(6), false), Outcome::Success);
	assert_eq!(classify(10, Some(6), false), Outcome::Raise);
	assert_eq!(classify(5, Some(6), false), Outcome::Failed);
	assert_eq!(classify(6, Some(6), false), Outcome::Success);
	assert_eq!(classify(9, Some(6), false), Outcome::Success);
}

#[test]
fn no_target_is_not_applicable() {
	assert_eq!(classify(20, None, false), Outcome::NotApplicable);
	assert_eq!(classify(2, None, true), Outcome::CriticalFailure);
}

#[test]
fn critical_failure_wins() {
	assert_eq!(classify(30, Some(4), true), Outcome::CriticalFailure);
}

#[test]
fn negative_targets_and_totals() {
	assert_eq!(classify(-3, Some(-2), false), Outcome::Failed);
	assert_eq!(classify(2, Some(-2), false), Outcome::Raise);
}

#[test]
fn success_includes_raises() {
	assert!(Outcome::Success.is_success());
	assert!(Outcome::Raise.is_success());
	assert!(!Outcome::Failed.is_success());
	assert!(!Outcome::CriticalFailure.is_success());
	assert!(!Outcome::NotApplicable.is_success());
}

#[test]
fn critical_failure_needs_two_ones() {
	let dice = Dice::new(2, 6);
	assert!(is_critical_failure([&Rolled::from_dice_and_rolls(&dice, [1, 1])]));
	assert!(!is_critical_failure([&Rolled::from_dice_and_rolls(&dice, [1, 3])]));

	let single = Dice::new(1, 6);
	let one = Rolled::from_dice_and_rolls(&single, [1]);
	assert!(!is_critical_failure([&one]));
	assert!(is_critical_failure([&one, &one]));
	assert!(!is_critical_failure(Vec::<&Rolled>::new()));
}

#[test]
fn critical_failure_ignores_dropped_dice() {
	let dice = Dice::new(3, 6);
	let mut rolled = Rolled::from_dice_and_rolls(&dice, [1, 5, 1]);
	assert!(!is_critical_failure([&rolled]));

	rolled.rolls[1].drop(Modifier::DropHigh(1));
	assert!(is_critical_failure([&rolled]));
}

#[test]
fn critical_failure_uses_final_values() {
	let dice = Dice::exploding(6);
	let mut rolled = Rolled::from_dice_and_rolls(&dice, Vec::<u16>::new());
	rolled.rolls.push(DieRoll::from_draws([6, 1]));
	rolled.rolls.push(DieRoll::new(1));
	assert!(!is_critical_failure([&rolled]));
}

#[test]
fn trait_critical_failure_uses_natural_draws() {
	let trait_die = Dice::exploding(8);
	let wild_die = Dice::exploding(6);

	// A first draw of 1 followed by another draw, so the final value is no longer 1
	let mut trait_rolled = Rolled::from_dice_and_rolls(&trait_die, Vec::<u16>::new());
	trait_rolled.rolls.push(DieRoll::from_draws([1, 5]));
	let mut wild_rolled = Rolled::from_dice_and_rolls(&wild_die, Vec::<u16>::new());
	wild_rolled.rolls.push(DieRoll::from_draws([1, 3]));

	assert!(is_trait_critical_failure(&trait_rolled, &wild_rolled));
	assert!(!is_critical_failure([&trait_rolled, &wild_rolled]));

	let wild_rolled = Rolled::from_dice_and_rolls(&wild_die, [2]);
	assert!(!is_trait_critical_failure(&trait_rolled, &wild_rolled));

	// Nothing rolled means nothing to fail with
	let empty = Rolled::from_dice_and_rolls(&trait_die, Vec::<u16>::new());
	assert!(!is_trait_critical_failure(&empty, &empty));
}

#[test]
fn outcome_display() {
	assert_eq!(Outcome::CriticalFailure.to_string(), "critical failure");
	assert_eq!(Outcome::Raise.to_string(), "raise");
}
