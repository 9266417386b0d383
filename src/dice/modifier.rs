//! Dice explosions, keep/drop modifiers and their related types.

use alloc::{format, string::String, vec::Vec};
use core::fmt;

use super::{roller::Roller, DieRoll, Error, Rolled, MAX_DRAWS_PER_DIE};

/// Explosion rule for a die: whenever a draw meets or exceeds the threshold, the die is drawn again and the new face
/// is added to its value. A die never draws more than [`MAX_DRAWS_PER_DIE`] times in total.
///
/// # Examples
///
/// ## Explode recursively (`!!`)
/// ```
/// use wildroll::dice::{modifier::Explode, roller::Iter as IterRoller, DieRoll};
///
/// let explode = Explode { threshold: None, recurse: true };
/// let mut rng = IterRoller::new([6, 2]);
/// let mut roll = DieRoll::new(6);
/// explode.apply(&mut roll, 6, &mut rng)?;
///
/// // The natural 6 explodes into another 6, which explodes again into a 2.
/// assert_eq!(roll.draws, vec![6, 6, 2]);
/// assert_eq!(roll.val, 14);
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
///
/// ## Explode once (`!`)
/// ```
/// use wildroll::dice::{modifier::Explode, roller::Iter as IterRoller, DieRoll};
///
/// let explode = Explode { threshold: None, recurse: false };
/// let mut rng = IterRoller::new([6, 2]);
/// let mut roll = DieRoll::new(6);
/// explode.apply(&mut roll, 6, &mut rng)?;
///
/// // Only a single bonus draw is made, even though it was another 6.
/// assert_eq!(roll.draws, vec![6, 6]);
/// assert!(rng.can_roll());
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs, reason = "Unlikely to change")]
pub struct Explode {
	/// Face value at or above which a draw explodes.
	/// If `None`, only draws equal to the number of sides of the dice being rolled explode.
	pub threshold: Option<u16>,

	/// Whether every qualifying draw explodes again (`true`), or only a single bonus draw is allowed (`false`)
	pub recurse: bool,
}

impl Explode {
	/// Explodes a die with its first draw already made, using a given roller for the bonus draws.
	///
	/// # Errors
	/// If the roller fails to produce a draw, its error is returned.
	pub fn apply(self, roll: &mut DieRoll, sides: u16, rng: &mut impl Roller) -> Result<(), Error> {
		let threshold = self.threshold.unwrap_or(sides);
		let max_draws = if self.recurse { MAX_DRAWS_PER_DIE } else { 2 };

		let mut last = roll.draws.last().copied().unwrap_or(roll.val);
		while last >= threshold && roll.draws.len() < max_draws {
			last = rng.roll_die(sides)?;
			roll.push_draw(last);
		}

		Ok(())
	}
}

impl fmt::Display for Explode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}",
			if self.recurse { "!!" } else { "!" },
			self.threshold.map(|threshold| format!(">{threshold}")).unwrap_or_default()
		)
	}
}

/// Routines that can be applied to [`Dice`](super::Dice) to select which of the resulting [`Rolled`] dice count
/// towards the total.
///
/// Dice are ordered by value for selection, with ties broken by their original position (earlier dice rank lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Modifier {
	/// Keeps only the highest x dice, dropping the rest.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{modifier::Modifier, roller::{Iter as IterRoller, Roller}, Dice, Rolled};
	///
	/// // Build the 4d6kh2 dice group without its modifier so it can be applied by hand
	/// let dice = Dice::builder().count(4).sides(6).build();
	/// let premade_rolls = [1, 4, 6, 3];
	/// let mut rolled = IterRoller::new(premade_rolls).roll(&dice)?;
	///
	/// let kh2_mod = Modifier::KeepHigh(2);
	/// kh2_mod.apply(&mut rolled);
	///
	/// // Upon being applied, the modifier will drop all rolls except the two highest, so 1 and 3 will be dropped.
	/// let mut expected = Rolled::from_dice_and_rolls(&dice, premade_rolls);
	/// expected.rolls[0].drop(kh2_mod);
	/// expected.rolls[3].drop(kh2_mod);
	/// assert_eq!(rolled, expected);
	/// # Ok::<(), wildroll::dice::Error>(())
	/// ```
	KeepHigh(u8),

	/// Keeps only the lowest x dice, dropping the rest.
	KeepLow(u8),

	/// Drops the highest x dice, keeping the rest.
	DropHigh(u8),

	/// Drops the lowest x dice, keeping the rest.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{modifier::Modifier, roller::{Iter as IterRoller, Roller}, Dice, Rolled};
	///
	/// let dice = Dice::builder().count(4).sides(6).build();
	/// let mut rolled = IterRoller::new([3, 1, 5, 1]).roll(&dice)?;
	///
	/// let dl1_mod = Modifier::DropLow(1);
	/// dl1_mod.apply(&mut rolled);
	///
	/// // Both 1s tie, so the earlier one is dropped.
	/// assert!(rolled.rolls[1].is_dropped());
	/// assert!(rolled.rolls[3].is_kept());
	/// assert_eq!(rolled.total()?, 9);
	/// # Ok::<(), wildroll::dice::Error>(())
	/// ```
	DropLow(u8),
}

impl Modifier {
	/// Applies the modifier to a set of rolls, marking the dice it excludes as dropped.
	/// Dice that have already been dropped are not considered.
	pub fn apply(self, rolled: &mut Rolled) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();

		// Stable, so equal values keep their original order
		refs.sort();

		let len = refs.len();
		let (skip, take) = match self {
			Self::KeepHigh(count) => (0, len.saturating_sub(usize::from(count))),
			Self::KeepLow(count) => (usize::from(count), len),
			Self::DropHigh(count) => (len.saturating_sub(usize::from(count)), len),
			Self::DropLow(count) => (0, usize::from(count)),
		};

		refs.iter_mut()
			.take(take)
			.skip(skip)
			.for_each(|roll| roll.drop(self));
	}

	/// Gets the number of dice the modifier keeps or drops.
	#[must_use]
	pub const fn count(self) -> u8 {
		match self {
			Self::KeepHigh(count) | Self::KeepLow(count) | Self::DropHigh(count) | Self::DropLow(count) => count,
		}
	}

	/// Indicates whether the modifier is one of the keep family.
	#[must_use]
	pub const fn is_keep(self) -> bool {
		matches!(self, Self::KeepHigh(..) | Self::KeepLow(..))
	}

	/// Gets the notation prefix of the modifier.
	#[must_use]
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::KeepHigh(..) => "kh",
			Self::KeepLow(..) => "kl",
			Self::DropHigh(..) => "dh",
			Self::DropLow(..) => "dl",
		}
	}
}

impl fmt::Display for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}",
			self.symbol(),
			if self.count() > 1 {
				format!("{}", self.count())
			} else {
				String::new()
			}
		)
	}
}
