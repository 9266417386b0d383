use crate::{
	dice::{
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller, Val as ValRoller},
		Dice, DieRoll, Error, Modifier, Rolled, MAX_DRAWS_PER_DIE,
	},
	expr::Describe,
};

#[test]
fn single_d20() {
	let dice = Dice::new(1, 20);
	let rolled = rolls_successfully_and_in_range(&dice);
	assert_eq!(rolled.rolls.len(), 1);
	assert_eq!(*rolled.dice, dice);
}

#[test]
fn hundred_d42s() {
	let dice = Dice::new(100, 42);
	let rolled = rolls_successfully_and_in_range(&dice);
	assert_eq!(rolled.rolls.len(), 100);
	assert_eq!(
		rolled.total().unwrap(),
		rolled.rolls.iter().map(|roll| u32::from(roll.val)).sum::<u32>()
	);
}

#[test]
fn all_dice_sides_occur() {
	let dice = Dice::new(100, 20);
	let mut rng = FastRandRoller::default();
	let mut rolls = Vec::new();
	for _ in 1..=100 {
		rolls.append(&mut rng.roll(&dice).unwrap().rolls);
	}

	for side in 1..=20 {
		assert!(rolls.iter().any(|roll| roll.val == side));
	}
}

#[test]
fn seeded_rolls_replay() {
	let dice = Dice::builder().count(10).sides(10).explode(None, true).keep_high(3).build();
	let first = FastRandRoller::with_seed(42).roll(&dice).unwrap();
	let second = FastRandRoller::with_seed(42).roll(&dice).unwrap();
	assert_eq!(first, second);
}

#[test]
fn recursive_explosion_stops_below_max() {
	let dice = Dice::exploding(6);
	let rolled = IterRoller::new([6, 4]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws, vec![6, 4]);
	assert_eq!(rolled.total().unwrap(), 10);
	assert!(rolled.rolls[0].is_exploded());

	let rolled = IterRoller::new([6, 6, 2]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws, vec![6, 6, 2]);
	assert_eq!(rolled.total().unwrap(), 14);
}

#[test]
fn single_explosion_draws_once() {
	let dice = Dice::builder().count(1).sides(6).explode(None, false).build();
	let mut rng = IterRoller::new([6, 6, 3]);
	let rolled = rng.roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws, vec![6, 6]);
	assert_eq!(rolled.total().unwrap(), 12);
	assert_eq!(rng.remaining(), 1);
}

#[test]
fn explosion_capped_at_ten_draws() {
	let dice = Dice::exploding(6);
	let mut rng = IterRoller::new([6; 15]);
	let rolled = rng.roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws.len(), MAX_DRAWS_PER_DIE);
	assert_eq!(rolled.total().unwrap(), 60);
	assert_eq!(rng.remaining(), 5);
}

#[test]
fn explosion_custom_threshold() {
	let dice = Dice::builder().count(1).sides(6).explode(Some(5), true).build();
	let rolled = IterRoller::new([5, 6, 2]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws, vec![5, 6, 2]);
	assert_eq!(rolled.total().unwrap(), 13);
	assert_eq!(dice.explode_threshold(), Some(5));
}

#[test]
fn each_die_explodes_before_the_next() {
	let dice = Dice::builder().count(2).sides(4).explode(None, true).build();
	let rolled = IterRoller::new([4, 4, 1, 3]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].draws, vec![4, 4, 1]);
	assert_eq!(rolled.rolls[1].draws, vec![3]);
	assert_eq!(rolled.total().unwrap(), 12);
}

#[test]
fn max_roller_hits_cap_for_every_die() {
	let dice = Dice::builder().count(3).sides(10).explode(None, false).build();
	let rolled = MaxRoller.roll(&dice).unwrap();
	assert!(rolled.rolls.iter().all(|roll| roll.draws == vec![10, 10]));
	assert_eq!(rolled.total().unwrap(), 60);
}

#[test]
fn keep_highest() {
	let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	let rolled = IterRoller::new([1, 4, 6, 3]).roll(&dice).unwrap();
	assert_eq!(rolled.total().unwrap(), 10);
	assert_eq!(rolled.rolls[0].dropped_by, Some(Modifier::KeepHigh(2)));
	assert!(rolled.rolls[1].is_kept());
	assert!(rolled.rolls[2].is_kept());
	assert!(rolled.rolls[3].is_dropped());
}

#[test]
fn keep_lowest() {
	let dice = Dice::builder().count(3).sides(20).keep_low(1).build();
	let rolled = IterRoller::new([14, 3, 19]).roll(&dice).unwrap();
	assert_eq!(rolled.total().unwrap(), 3);
	assert_eq!(rolled.kept().count(), 1);
}

#[test]
fn keep_highest_ties_favour_later_dice() {
	let dice = Dice::builder().count(3).sides(6).keep_high(1).build();
	let rolled = IterRoller::new([5, 5, 2]).roll(&dice).unwrap();
	assert!(rolled.rolls[0].is_dropped());
	assert!(rolled.rolls[1].is_kept());
	assert!(rolled.rolls[2].is_dropped());
	assert_eq!(rolled.total().unwrap(), 5);
}

#[test]
fn drop_highest_and_lowest_together() {
	let dice = Dice::builder().count(6).sides(6).drop_high(1).drop_low(2).build();
	let rolled = IterRoller::new([3, 6, 1, 4, 2, 5]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[1].dropped_by, Some(Modifier::DropHigh(1)));
	assert_eq!(rolled.rolls[2].dropped_by, Some(Modifier::DropLow(2)));
	assert_eq!(rolled.rolls[4].dropped_by, Some(Modifier::DropLow(2)));
	assert_eq!(rolled.total().unwrap(), 12);
}

#[test]
fn selection_uses_exploded_values() {
	let dice = Dice::builder().count(2).sides(6).explode(None, true).keep_high(1).build();
	let rolled = IterRoller::new([6, 3, 5]).roll(&dice).unwrap();
	assert_eq!(rolled.rolls[0].val, 9);
	assert!(rolled.rolls[1].is_dropped());
	assert_eq!(rolled.total().unwrap(), 9);
}

#[test]
fn inverted_range_is_an_error() {
	assert!(matches!(
		ValRoller(3).random_int(5, 2),
		Err(Error::InvalidRange { min: 5, max: 2 })
	));
	assert!(matches!(MaxRoller.roll_die(0), Err(Error::InvalidRange { min: 1, max: 0 })));
}

#[test]
fn random_sequence_is_a_permutation() {
	let mut rng = FastRandRoller::with_seed(1234);
	let mut seq = rng.random_sequence(52).unwrap();
	assert_eq!(seq.len(), 52);
	seq.sort_unstable();
	assert_eq!(seq, (1..=52).collect::<Vec<u16>>());

	assert_eq!(rng.random_sequence(1).unwrap(), vec![1]);
	assert!(rng.random_sequence(0).unwrap().is_empty());
}

#[test]
fn random_sequence_replays_scripted_swaps() {
	// Each draw picks the position to swap with, counting down from the end
	let seq = IterRoller::new([0, 0]).random_sequence(3).unwrap();
	assert_eq!(seq, vec![2, 3, 1]);
}

#[test]
fn dice_display_is_canonical() {
	let dice = Dice::builder().count(4).sides(6).explode(None, true).keep_high(2).build();
	assert_eq!(dice.to_string(), "4d6!!kh2");

	let dice = Dice::builder().count(1).sides(10).explode(Some(8), false).build();
	assert_eq!(dice.to_string(), "1d10!>8");

	let dice = Dice::builder().count(6).sides(6).drop_high(2).drop_low(1).build();
	assert_eq!(dice.to_string(), "6d6dh2dl");

	assert_eq!(Dice::default().to_string(), "1d6");
}

#[test]
fn die_roll_display() {
	assert_eq!(DieRoll::new(3).to_string(), "3");
	assert_eq!(DieRoll::from_draws([6, 6, 1]).to_string(), "13!");

	let mut roll = DieRoll::from_draws([6, 2]);
	roll.drop(Modifier::DropHigh(1));
	assert_eq!(roll.to_string(), "8! (d)");
	assert_eq!(roll.natural(), 6);
}

#[test]
fn rolled_description_limits_list() {
	let dice = Dice::new(5, 8);
	let rolled = Rolled::from_dice_and_rolls(&dice, [1, 2, 3, 4, 5]);
	assert_eq!(rolled.describe(None), "5d8[1, 2, 3, 4, 5]");
	assert_eq!(rolled.describe(Some(3)), "5d8[1, 2, 3, 2 more...]");
	assert_eq!(rolled.to_string(), "5d8[1, 2, 3, 4, 5]");
}

#[test]
fn dice_equality() {
	assert_eq!(Dice::new(4, 8), Dice::builder().count(4).sides(8).build());
	assert_ne!(Dice::new(4, 8), Dice::new(4, 20));
	assert_ne!(Dice::new(1, 8), Dice::exploding(8));
}

fn rolls_successfully_and_in_range(dice: &Dice) -> Rolled<'_> {
	let rolled = FastRandRoller::default().roll(dice).unwrap();
	for roll in &rolled.rolls {
		assert!(roll.val >= 1 && roll.val <= dice.sides);
	}
	rolled
}
