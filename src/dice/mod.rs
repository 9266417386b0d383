//! All functionality for directly creating dice groups, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For using them as part of a larger expression, see
//! [`Term::Dice`](crate::expr::Term::Dice).

pub mod modifier;
pub mod roller;

use alloc::{
	borrow::Cow,
	format,
	string::{String, ToString},
	vec,
	vec::Vec,
};
use core::{cmp, fmt};

pub use self::{
	modifier::{Explode, Modifier},
	roller::Roller,
};
use crate::expr::Describe;

/// Maximum number of dice in a single group
pub const MAX_QUANTITY: u8 = 100;

/// Minimum number of sides a die can have
pub const MIN_SIDES: u16 = 2;

/// Maximum number of sides a die can have
pub const MAX_SIDES: u16 = 1000;

/// Maximum number of draws a single die can accumulate through explosions, including its first draw
pub const MAX_DRAWS_PER_DIE: usize = 10;

/// A group of one or more rollable dice with a specific number of sides, along with the explosion rule and
/// keep/drop modifiers to apply to any resulting rolls from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs, reason = "Plain data, validated by the parser")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u8,

	/// Number of sides for each die
	pub sides: u16,

	/// Explosion rule for each die, if the dice explode
	pub explode: Option<Explode>,

	/// Keep/drop modifiers to automatically apply to rolls from this group of dice
	pub modifiers: Vec<Modifier>,
}

impl Dice {
	/// Creates a new group of dice with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u8, sides: u16) -> Self {
		Self {
			count,
			sides,
			explode: None,
			modifiers: Vec::new(),
		}
	}

	/// Creates a single die that explodes recursively on its maximum value.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{Dice, Explode};
	///
	/// let die = Dice::exploding(8);
	/// assert_eq!(die.count, 1);
	/// assert_eq!(die.explode, Some(Explode { threshold: None, recurse: true }));
	/// assert_eq!(die.to_string(), "1d8!!");
	/// ```
	#[must_use]
	pub const fn exploding(sides: u16) -> Self {
		Self {
			count: 1,
			sides,
			explode: Some(Explode {
				threshold: None,
				recurse: true,
			}),
			modifiers: Vec::new(),
		}
	}

	/// Gets the face value at or above which a die from this group explodes, if it explodes at all.
	#[must_use]
	pub fn explode_threshold(&self) -> Option<u16> {
		self.explode.map(|explode| explode.threshold.unwrap_or(self.sides))
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for Dice {
	/// Creates the default dice (1d6).
	#[inline]
	fn default() -> Self {
		Self::new(1, 6)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{}d{}{}{}",
			self.count,
			self.sides,
			self.explode.map(|explode| explode.to_string()).unwrap_or_default(),
			self.modifiers.iter().map(ToString::to_string).collect::<String>()
		)
	}
}

/// Single die produced from rolling [`Dice`], including every draw made for it through explosions
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DieRoll {
	/// Accumulated value of all draws
	pub val: u16,

	/// Every individual face drawn for the die, in order. The first is the natural roll.
	pub draws: Vec<u16>,

	/// Modifier that caused the drop of this die, if any
	pub dropped_by: Option<Modifier>,
}

impl DieRoll {
	/// Adds another draw to the die (from an explosion), accumulating its value.
	pub fn push_draw(&mut self, val: u16) {
		self.draws.push(val);
		self.val = self.val.saturating_add(val);
	}

	/// Marks this die roll as dropped by a given modifier, setting [`Self::dropped_by`].
	///
	/// # Panics
	/// Panics if `Self::dropped_by` is already [`Some`].
	pub fn drop(&mut self, from: Modifier) {
		assert!(
			self.dropped_by.is_none(),
			"marking a die as dropped that has already been marked as dropped by another modifier"
		);
		self.dropped_by = Some(from);
	}

	/// Gets the natural (pre-explosion) face of the die's first draw.
	#[must_use]
	pub fn natural(&self) -> u16 {
		self.draws.first().copied().unwrap_or(self.val)
	}

	/// Indicates whether the die exploded (was drawn more than once).
	#[must_use]
	#[inline]
	pub fn is_exploded(&self) -> bool {
		self.draws.len() > 1
	}

	/// Indicates whether this die roll has been dropped by a modifier.
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Indicates whether this die roll is being kept (has *not* been dropped by a modifier).
	/// This is the direct inverse of [`DieRoll::is_dropped()`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}

	/// Creates a new die roll with a single draw of the given value.
	#[must_use]
	pub fn new(val: u16) -> Self {
		Self {
			val,
			draws: vec![val],
			dropped_by: None,
		}
	}

	/// Creates a new die roll from a sequence of draws, the first being the natural roll.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::DieRoll;
	///
	/// let roll = DieRoll::from_draws([6, 6, 2]);
	/// assert_eq!(roll.val, 14);
	/// assert_eq!(roll.natural(), 6);
	/// assert!(roll.is_exploded());
	/// ```
	#[must_use]
	pub fn from_draws(draws: impl IntoIterator<Item = u16>) -> Self {
		let draws = draws.into_iter().collect::<Vec<_>>();
		Self {
			val: draws.iter().fold(0, |sum: u16, draw| sum.saturating_add(*draw)),
			draws,
			dropped_by: None,
		}
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.val.cmp(&other.val)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is simply the plain numeric value of the roll.
	/// If the die exploded, it is appended with `!`. If the roll was dropped, it is appended with ` (d)`.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{DieRoll, Modifier};
	///
	/// assert_eq!(DieRoll::new(4).to_string(), "4");
	/// assert_eq!(DieRoll::from_draws([6, 3]).to_string(), "9!");
	///
	/// let mut roll = DieRoll::new(2);
	/// roll.drop(Modifier::KeepHigh(1));
	/// assert_eq!(roll.to_string(), "2 (d)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}",
			self.val,
			if self.is_exploded() { "!" } else { "" },
			if self.is_dropped() { " (d)" } else { "" }
		)
	}
}

/// Representation of the result from rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs, reason = "Plain result data")]
pub struct Rolled<'a> {
	/// Each individual die roll that was made
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled to produce this
	pub dice: Cow<'a, Dice>,
}

impl Rolled<'_> {
	/// Calculates the total of all kept roll values.
	///
	/// # Errors
	/// If there is an integer overflow while summing the die rolls, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let rolled = IterRoller::new([1, 4, 6, 3]).roll(&dice)?;
	/// assert_eq!(rolled.total()?, 10);
	/// # Ok::<(), wildroll::dice::Error>(())
	/// ```
	pub fn total(&self) -> Result<u32, Error> {
		let mut sum: u32 = 0;

		// Sum all rolls that haven't been dropped
		for r in self.rolls.iter().filter(|roll| roll.is_kept()) {
			sum = sum
				.checked_add(u32::from(r.val))
				.ok_or_else(|| Error::Overflow(self.clone().into_owned()))?;
		}

		Ok(sum)
	}

	/// Iterates over the rolls that haven't been dropped.
	pub fn kept(&self) -> impl Iterator<Item = &DieRoll> {
		self.rolls.iter().filter(|roll| roll.is_kept())
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}

	/// Creates a new rolled group of dice from a given group of dice and an iterator of single-draw values.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &Dice, rolls: impl IntoIterator<Item = u16>) -> Rolled {
		Rolled {
			rolls: rolls.into_iter().map(DieRoll::new).collect(),
			dice: Cow::Borrowed(dice),
		}
	}
}

impl Describe for Rolled<'_> {
	/// Builds a string of the dice the roll is from and a list of all of the individual rolled dice
	/// (see [`DieRoll::fmt()`]).
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::{Dice, Rolled}, expr::Describe};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let kh_mod = dice.modifiers[0];
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [6, 2, 5, 3]);
	/// rolled.rolls[1].drop(kh_mod);
	/// rolled.rolls[3].drop(kh_mod);
	///
	/// assert_eq!(rolled.describe(None), "4d6kh2[6, 2 (d), 5, 3 (d)]");
	/// assert_eq!(rolled.describe(Some(2)), "4d6kh2[6, 2 (d), 2 more...]");
	/// ```
	///
	/// [`DieRoll::fmt()`]: ./struct.DieRoll.html#method.fmt
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let total_rolls = self.rolls.len();
		let truncated_rolls = total_rolls.saturating_sub(list_limit);

		format!(
			"{}[{}{}]",
			self.dice,
			self.rolls
				.iter()
				.take(list_limit)
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", "),
			if truncated_rolls > 0 {
				format!(", {truncated_rolls} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for Rolled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// A roller was asked for a random integer within an inverted range. This is a programming error, not a problem
	/// with user input, and is never retried.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{roller::{Max as MaxRoller, Roller}, Error};
	///
	/// assert!(matches!(MaxRoller.random_int(6, 1), Err(Error::InvalidRange { min: 6, max: 1 })));
	/// ```
	#[error("invalid random integer range: min {min} is greater than max {max}")]
	InvalidRange {
		/// Requested lower bound
		min: u16,

		/// Requested upper bound
		max: u16,
	},

	/// There was an integer overflow when performing mathematical operations on roll values.
	/// This normally should not ever happen given the limits on dice counts, sides, and draws.
	#[error("integer overflow")]
	Overflow(Rolled<'static>),
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use wildroll::Dice;
///
/// let dice = Dice::builder().count(2).sides(6).build();
/// assert_eq!(dice, Dice::new(2, 6));
/// ```
///
/// ## Explosion and modifier
/// ```
/// use wildroll::dice::{Dice, Explode, Modifier};
///
/// let dice = Dice::builder().count(6).sides(8).explode(Some(7), false).keep_high(4).build();
/// assert_eq!(
/// 	dice,
/// 	Dice {
/// 		count: 6,
/// 		sides: 8,
/// 		explode: Some(Explode {
/// 			threshold: Some(7),
/// 			recurse: false,
/// 		}),
/// 		modifiers: vec![Modifier::KeepHigh(4)],
/// 	},
/// );
/// assert_eq!(dice.to_string(), "6d8!>7kh4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u8) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u16) -> Self {
		self.0.sides = sides;
		self
	}

	/// Makes the dice explode, at the given threshold or the number of sides if `None`.
	#[must_use]
	pub const fn explode(mut self, threshold: Option<u16>, recurse: bool) -> Self {
		self.0.explode = Some(Explode { threshold, recurse });
		self
	}

	/// Adds a keep highest modifier to the dice.
	#[must_use]
	pub fn keep_high(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::KeepHigh(count));
		self
	}

	/// Adds a keep lowest modifier to the dice.
	#[must_use]
	pub fn keep_low(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::KeepLow(count));
		self
	}

	/// Adds a drop highest modifier to the dice.
	#[must_use]
	pub fn drop_high(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::DropHigh(count));
		self
	}

	/// Adds a drop lowest modifier to the dice.
	#[must_use]
	pub fn drop_low(mut self, count: u8) -> Self {
		self.0.modifiers.push(Modifier::DropLow(count));
		self
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}
