//! Validation messages produced while parsing roll text.
//!
//! Messages never abort a parse on their own. Each one describes a fragment of the input that was ignored or adjusted,
//! and they are accumulated on the resulting [`Roll`](crate::Roll) or [`TraitRoll`](crate::TraitRoll) in the order
//! they were found. Their [`Display`](core::fmt::Display) output is meant to be shown to whoever typed the roll.

use alloc::string::String;

use crate::{dice::Modifier, expr::Op};

/// A single validation message
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Message {
	/// The whole input was too long to be parsed.
	#[error("input is longer than {max} characters")]
	InputTooLong {
		/// Maximum accepted length
		max: usize,
	},

	/// A term fragment isn't a number or dice.
	#[error("could not understand \"{0}\"")]
	UnknownTerm(String),

	/// An operator wasn't followed by a term.
	#[error("\"{0}\" is missing a term")]
	MissingTerm(Op),

	/// A number didn't fit in the range it's used for.
	#[error("number \"{0}\" is too large")]
	NumberTooLarge(String),

	/// Dice quantity out of bounds; the dice term is ignored.
	#[error("dice quantity must be between 1 and {max}, got {quantity}")]
	QuantityOutOfRange {
		/// Quantity given
		quantity: u32,

		/// Largest allowed quantity
		max: u8,
	},

	/// Dice sides out of bounds; the dice term is ignored.
	#[error("dice sides must be between {min} and {max}, got {sides}")]
	SidesOutOfRange {
		/// Sides given
		sides: u32,

		/// Smallest allowed sides
		min: u16,

		/// Largest allowed sides
		max: u16,
	},

	/// Explosion threshold out of bounds; the dice are kept but don't explode.
	#[error("explosion threshold must be between 2 and {sides}, got {threshold}; the dice won't explode")]
	ThresholdOutOfRange {
		/// Threshold given
		threshold: u32,

		/// Sides of the dice, which is the largest allowed threshold
		sides: u16,
	},

	/// Keep/drop count out of bounds; the modifier is ignored.
	#[error("{symbol} count must be between 1 and {max}, got {count}; it is ignored")]
	SelectionOutOfRange {
		/// Notation of the modifier (`kh`, `kl`, `dh` or `dl`)
		symbol: &'static str,

		/// Count given
		count: u32,

		/// Largest allowed count
		max: u32,
	},

	/// A keep modifier and a drop modifier were both given; the drop modifier is ignored.
	#[error("keep modifiers take precedence over drop modifiers; {0} is ignored")]
	DropOverridden(Modifier),

	/// Keep highest and keep lowest were both given; keep lowest is ignored.
	#[error("keep highest takes precedence over keep lowest; {0} is ignored")]
	KeepLowOverridden(Modifier),

	/// Drop highest and drop lowest together would drop every die; both are ignored.
	#[error("dropping {high} highest and {low} lowest of {count} dice would drop them all; both are ignored")]
	DropsEveryDie {
		/// Drop highest count
		high: u8,

		/// Drop lowest count
		low: u8,

		/// Dice quantity
		count: u8,
	},

	/// Something that can only be given once was given more than once; only the first is used.
	#[error("{0} was given more than once; only the first is used")]
	Duplicate(&'static str),

	/// Target highest was given without a target number; it is ignored.
	#[error("target highest needs a target number; it is ignored")]
	TargetHighestWithoutTarget,

	/// Target highest of zero; it is ignored.
	#[error("target highest must be at least 1; it is ignored")]
	TargetHighestZero,

	/// Too many dice groups (after repetition); nothing is rolled.
	#[error("too many dice groups ({count}), the maximum is {max}")]
	TooManyDiceGroups {
		/// Dice groups that would have been rolled
		count: usize,

		/// Maximum dice groups
		max: usize,
	},

	/// A wild die was given outside of a trait roll; it is ignored.
	#[error("a wild die can only be used in trait rolls; it is ignored")]
	WildDieOutsideTrait,

	/// A trait roll's trait die had a quantity other than 1 (kept as written); a single die is rolled anyway.
	#[error("trait rolls use a single trait die, got {0}")]
	TraitQuantity(String),

	/// A trait or wild die had sides that aren't allowed; the default die is kept.
	#[error("{die} die must be a d4, d6, d8, d10, d12, d20 or d100, got d{sides}; the default d{default} is used")]
	DieNotAllowed {
		/// Which die (`trait` or `wild`)
		die: &'static str,

		/// Sides given
		sides: u32,

		/// Sides of the default die used instead
		default: u16,
	},

	/// Anything in a trait roll besides the trait die and its modifiers; it is ignored.
	#[error("trait rolls take a single trait die and modifiers; \"{0}\" is ignored")]
	ExtraTraitTerm(String),
}
