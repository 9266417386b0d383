//! Classification of roll totals against target numbers.

use core::fmt;

use crate::dice::Rolled;

/// How far a modified total must exceed the target number to count as a [`Outcome::Raise`]
pub const RAISE_MARGIN: i32 = 4;

/// Classified result of a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Fixed set of outcomes")]
pub enum Outcome {
	/// Every qualifying die came up a 1
	CriticalFailure,

	/// The modified total didn't reach the target number
	Failed,

	/// The modified total reached the target number
	Success,

	/// The modified total beat the target number by at least [`RAISE_MARGIN`]
	Raise,

	/// There was no target number to compare against
	NotApplicable,
}

impl Outcome {
	/// Indicates whether the outcome counts as a success (including a raise).
	#[must_use]
	pub const fn is_success(self) -> bool {
		matches!(self, Self::Success | Self::Raise)
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::CriticalFailure => "critical failure",
			Self::Failed => "failed",
			Self::Success => "success",
			Self::Raise => "raise",
			Self::NotApplicable => "n/a",
		})
	}
}

/// Classifies an already-modified total against an optional target number.
///
/// A critical failure wins over everything else, even without a target number.
///
/// # Examples
/// ```
/// use wildroll::outcome::{classify, Outcome};
///
/// assert_eq!(classify(8, Some(6), false), Outcome::Success);
/// assert_eq!(classify(10, Some(6), false), Outcome::Raise);
/// assert_eq!(classify(5, Some(6), false), Outcome::Failed);
/// assert_eq!(classify(5, None, false), Outcome::NotApplicable);
/// assert_eq!(classify(2, Some(6), true), Outcome::CriticalFailure);
/// ```
#[must_use]
pub const fn classify(modified_total: i32, target: Option<i32>, critical_failure: bool) -> Outcome {
	if critical_failure {
		return Outcome::CriticalFailure;
	}

	match target {
		Some(target) if modified_total >= target.saturating_add(RAISE_MARGIN) => Outcome::Raise,
		Some(target) if modified_total >= target => Outcome::Success,
		Some(_) => Outcome::Failed,
		None => Outcome::NotApplicable,
	}
}

/// Checks whether rolled dice groups make up a critical failure: every kept die of every group has a final value of 1,
/// and there are at least two such dice. A single die on its own is never a critical failure.
///
/// Final values are what count here, so an exploded die can never be part of a critical failure.
///
/// # Examples
/// ```
/// use wildroll::{dice::{Dice, Rolled}, outcome::is_critical_failure};
///
/// let dice = Dice::new(2, 6);
/// assert!(is_critical_failure([&Rolled::from_dice_and_rolls(&dice, [1, 1])]));
/// assert!(!is_critical_failure([&Rolled::from_dice_and_rolls(&dice, [1, 2])]));
///
/// let die = Dice::new(1, 6);
/// assert!(!is_critical_failure([&Rolled::from_dice_and_rolls(&die, [1])]));
/// ```
pub fn is_critical_failure<'a, 'r: 'a>(groups: impl IntoIterator<Item = &'a Rolled<'r>>) -> bool {
	let mut ones: usize = 0;
	for die in groups.into_iter().flat_map(|rolled| rolled.kept()) {
		if die.val != 1 {
			return false;
		}
		ones += 1;
	}

	ones >= 2
}

/// Checks whether the trait and wild dice of a trait roll make up a critical failure: both of their first natural
/// draws are a 1. Unlike [`is_critical_failure()`], final values don't matter here.
///
/// # Examples
/// ```
/// use wildroll::{dice::{Dice, Rolled}, outcome::is_trait_critical_failure};
///
/// let trait_die = Dice::exploding(8);
/// let wild_die = Dice::exploding(6);
/// let one = Rolled::from_dice_and_rolls(&trait_die, [1]);
/// assert!(is_trait_critical_failure(&one, &Rolled::from_dice_and_rolls(&wild_die, [1])));
/// assert!(!is_trait_critical_failure(&one, &Rolled::from_dice_and_rolls(&wild_die, [3])));
/// ```
#[must_use]
pub fn is_trait_critical_failure(trait_rolled: &Rolled, wild_rolled: &Rolled) -> bool {
	is_natural_one(trait_rolled) && is_natural_one(wild_rolled)
}

/// Checks whether the first natural draw of a rolled die is a 1.
fn is_natural_one(rolled: &Rolled) -> bool {
	rolled.rolls.first().is_some_and(|roll| roll.natural() == 1)
}
