//! Trait rolls: a trait die and a wild die rolled side by side, keeping whichever comes out higher.

use alloc::{format, string::String, vec::Vec};
use core::fmt;

use crate::{
	dice::{roller::Roller, Dice, Error as DiceError, Rolled},
	expr::Describe,
	message::Message,
	outcome::{self, Outcome},
	roll::Error,
};

/// Sides a trait or wild die is allowed to have
pub const TRAIT_SIDES: [u16; 7] = [4, 6, 8, 10, 12, 20, 100];

/// Sides of the trait die when none is given
pub const DEFAULT_TRAIT_SIDES: u16 = 4;

/// Sides of the wild die when none is given
pub const DEFAULT_WILD_SIDES: u16 = 6;

/// Target number of a trait roll
pub const DEFAULT_TARGET: i32 = 4;

/// Parsed trait roll, ready to be rolled any number of times
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TraitRoll {
	/// Trait die (always a single die exploding recursively on its max)
	pub trait_die: Dice,

	/// Wild die (always a single die exploding recursively on its max)
	pub wild_die: Dice,

	/// Target number the chosen total is compared against
	pub target: i32,

	/// How many of the two dice count (always the single highest)
	pub target_highest: u32,

	/// Modifier added to both dice's totals
	pub modifier: Option<i32>,

	/// Free-text comment
	pub comment: Option<String>,

	/// Text the trait roll was parsed from
	pub raw: String,

	/// Validation messages produced while parsing
	pub messages: Vec<Message>,
}

impl TraitRoll {
	/// Creates a trait roll with the given die sides and no modifier.
	///
	/// # Examples
	/// ```
	/// use wildroll::TraitRoll;
	///
	/// let trait_roll = TraitRoll::new(8, 6);
	/// assert_eq!(trait_roll.trait_die.to_string(), "1d8!!");
	/// assert_eq!(trait_roll.wild_die.to_string(), "1d6!!");
	/// assert_eq!(trait_roll.target, 4);
	/// ```
	#[must_use]
	pub fn new(trait_sides: u16, wild_sides: u16) -> Self {
		Self {
			trait_die: Dice::exploding(trait_sides),
			wild_die: Dice::exploding(wild_sides),
			..Self::default()
		}
	}

	/// Sets the modifier.
	#[must_use]
	pub const fn with_modifier(mut self, modifier: i32) -> Self {
		self.modifier = Some(modifier);
		self
	}

	/// Rolls the trait die, then the wild die, and keeps the higher of the two totals.
	///
	/// # Errors
	/// If rolling either die fails or a total overflows, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::roller::Iter as IterRoller, trait_roll::Chosen, Outcome, TraitRoll};
	///
	/// // The trait d8 explodes into 8 + 3, the wild d6 comes up 5
	/// let trait_roll = TraitRoll::new(8, 6).with_modifier(1);
	/// let result = trait_roll.roll(&mut IterRoller::new([8, 3, 5]))?;
	/// assert_eq!(result.trait_total, 12);
	/// assert_eq!(result.wild_total, 6);
	/// assert_eq!(result.chosen, Chosen::Trait);
	/// assert_eq!(result.total, 12);
	/// assert_eq!(result.outcome, Outcome::Raise);
	/// # Ok::<(), wildroll::roll::Error>(())
	/// ```
	pub fn roll(&self, rng: &mut impl Roller) -> Result<TraitResult, Error> {
		let modifier = self.modifier.unwrap_or(0);
		let trait_rolled = rng.roll(&self.trait_die)?;
		let wild_rolled = rng.roll(&self.wild_die)?;

		let trait_total = modified_total(&trait_rolled, modifier)?;
		let wild_total = modified_total(&wild_rolled, modifier)?;
		let (chosen, total) = if trait_total >= wild_total {
			(Chosen::Trait, trait_total)
		} else {
			(Chosen::Wild, wild_total)
		};

		let critical_failure = outcome::is_trait_critical_failure(&trait_rolled, &wild_rolled);
		let result = TraitResult {
			outcome: outcome::classify(total, Some(self.target), critical_failure),
			trait_rolled,
			wild_rolled,
			chosen,
			trait_total,
			wild_total,
			total,
			critical_failure,
		};
		tracing::debug!(
			trait_total,
			wild_total,
			chosen = %result.chosen,
			outcome = %result.outcome,
			"rolled trait"
		);

		Ok(result)
	}
}

impl Default for TraitRoll {
	/// Creates the default trait roll (d4 trait die, d6 wild die, target number 4).
	fn default() -> Self {
		Self {
			trait_die: Dice::exploding(DEFAULT_TRAIT_SIDES),
			wild_die: Dice::exploding(DEFAULT_WILD_SIDES),
			target: DEFAULT_TARGET,
			target_highest: 1,
			modifier: None,
			comment: None,
			raw: String::new(),
			messages: Vec::new(),
		}
	}
}

/// Totals a rolled die and adds the modifier to it.
fn modified_total(rolled: &Rolled, modifier: i32) -> Result<i32, DiceError> {
	let overflow = || DiceError::Overflow(rolled.clone().into_owned());
	i32::try_from(rolled.total()?)
		.ok()
		.and_then(|total| total.checked_add(modifier))
		.ok_or_else(overflow)
}

/// Which of the two dice of a trait roll was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "There are only ever two dice")]
pub enum Chosen {
	/// The trait die
	Trait,

	/// The wild die
	Wild,
}

impl fmt::Display for Chosen {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Trait => "trait",
			Self::Wild => "wild",
		})
	}
}

/// Result of rolling a [`TraitRoll`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TraitResult<'a> {
	/// Rolled trait die
	pub trait_rolled: Rolled<'a>,

	/// Rolled wild die
	pub wild_rolled: Rolled<'a>,

	/// Die whose total was kept
	pub chosen: Chosen,

	/// Trait die total with the modifier applied
	pub trait_total: i32,

	/// Wild die total with the modifier applied
	pub wild_total: i32,

	/// Kept total
	pub total: i32,

	/// Whether both dice came up a natural 1
	pub critical_failure: bool,

	/// Classified outcome of the kept total
	pub outcome: Outcome,
}

impl Describe for TraitResult<'_> {
	/// Builds a breakdown of both dice, marking the one that was kept.
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::roller::Iter as IterRoller, expr::Describe, TraitRoll};
	///
	/// let trait_roll = TraitRoll::default();
	/// let result = trait_roll.roll(&mut IterRoller::new([2, 5]))?;
	/// assert_eq!(result.describe(None), "trait 1d4!![2] = 2, wild* 1d6!![5] = 5 (success)");
	/// # Ok::<(), wildroll::roll::Error>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let mark = |chosen: Chosen| if self.chosen == chosen { "*" } else { "" };
		format!(
			"trait{} {} = {}, wild{} {} = {} ({})",
			mark(Chosen::Trait),
			self.trait_rolled.describe(list_limit),
			self.trait_total,
			mark(Chosen::Wild),
			self.wild_rolled.describe(list_limit),
			self.wild_total,
			self.outcome
		)
	}
}

impl fmt::Display for TraitResult<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}
