//! Parsing and validation of individual expression terms (numbers and dice).

use alloc::{borrow::ToOwned, string::String, vec, vec::Vec};

use chumsky::prelude::*;

use super::token::{digits, Extra};
use crate::{
	dice::{Dice, Explode, Modifier, MAX_QUANTITY, MAX_SIDES, MIN_SIDES},
	expr::Term,
	message::Message,
};

/// Term as written, before any of its numbers are checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RawTerm {
	/// Plain number
	Num(String),

	/// Dice with their suffixes
	Dice(RawDice),
}

/// Dice term as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawDice {
	/// Quantity digits, if given
	pub(super) count: Option<String>,

	/// Sides digits
	pub(super) sides: String,

	/// Suffixes in the order they were written
	pub(super) suffixes: Vec<Suffix>,
}

/// Suffix of a dice term
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Suffix {
	/// `!`, `!!`, `!>N` or `!!>N`
	Explode {
		/// Whether the explosion was `!!`
		recurse: bool,

		/// Threshold digits, if given
		threshold: Option<String>,
	},

	/// `kh`, `kl`, `dh` or `dl`, with optional count digits
	Select(Select, Option<String>),
}

/// Kind of keep/drop suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Select {
	/// `kh`
	KeepHigh,

	/// `kl`
	KeepLow,

	/// `dh`
	DropHigh,

	/// `dl`
	DropLow,
}

impl Select {
	/// Every kind, in the order modifiers of each kind are applied
	const ALL: [Self; 4] = [Self::KeepHigh, Self::KeepLow, Self::DropHigh, Self::DropLow];

	/// Creates the modifier of this kind with a given count.
	const fn modifier(self, count: u8) -> Modifier {
		match self {
			Self::KeepHigh => Modifier::KeepHigh(count),
			Self::KeepLow => Modifier::KeepLow(count),
			Self::DropHigh => Modifier::DropHigh(count),
			Self::DropLow => Modifier::DropLow(count),
		}
	}

	/// Gets the notation of this kind.
	const fn symbol(self) -> &'static str {
		self.modifier(1).symbol()
	}

	/// Indicates whether this kind keeps dice (rather than dropping them).
	const fn is_keep(self) -> bool {
		matches!(self, Self::KeepHigh | Self::KeepLow)
	}

	/// Gets the position of this kind in [`Self::ALL`].
	const fn index(self) -> usize {
		self as usize
	}
}

/// Generates a parser that handles a single term like "5", "d20", "4d6kh3", "2d10!!>8", etc. and expects end of input
pub(super) fn term<'src>() -> impl Parser<'src, &'src str, RawTerm, Extra<'src>> + Clone {
	// Parser for explosions
	let explode = just::<_, &'src str, Extra<'src>>('!')
		.ignore_then(just('!').or_not().map(|bang| bang.is_some()))
		.then(just('>').ignore_then(digits()).or_not())
		.map(|(recurse, threshold)| Suffix::Explode { recurse, threshold });

	// Parser for keep/drop selections (e.g. kh, kl2, dh, dl1)
	let select = choice((
		just::<_, &'src str, Extra<'src>>("kh").to(Select::KeepHigh),
		just("kl").to(Select::KeepLow),
		just("dh").to(Select::DropHigh),
		just("dl").to(Select::DropLow),
	))
	.then(digits().or_not())
	.map(|(select, count)| Suffix::Select(select, count));

	// Parser for dice
	let dice = digits()
		.or_not()
		.then_ignore(just('d'))
		.then(digits())
		.then(explode.or(select).repeated().collect())
		.map(|((count, sides), suffixes)| RawDice { count, sides, suffixes });

	choice((dice.map(RawTerm::Dice), digits().map(RawTerm::Num))).then_ignore(end())
}

/// Parses a term fragment without checking any of its numbers.
pub(super) fn raw_term(fragment: &str) -> Option<RawTerm> {
	term().parse(fragment).into_result().ok()
}

/// Parses and validates a term fragment. A fragment that can't be used yields no term; the messages explain what was
/// wrong with it or what was adjusted.
pub(super) fn parse_term(fragment: &str) -> (Option<Term>, Vec<Message>) {
	match raw_term(fragment) {
		Some(RawTerm::Num(digits)) => match digits.parse() {
			Ok(num) => (Some(Term::Num(num)), Vec::new()),
			Err(_) => (None, vec![Message::NumberTooLarge(digits)]),
		},
		Some(RawTerm::Dice(raw)) => {
			let (dice, messages) = validate_dice(&raw);
			(dice.map(Term::Dice), messages)
		}
		None => (None, vec![Message::UnknownTerm(fragment.to_owned())]),
	}
}

/// Parses a run of digits, noting it when it's too large.
pub(super) fn number(digits: &str, messages: &mut Vec<Message>) -> Option<u32> {
	let num = digits.parse().ok();
	if num.is_none() {
		messages.push(Message::NumberTooLarge(digits.to_owned()));
	}
	num
}

/// Checks the quantity, sides and suffixes of dice as written, resolving any conflicts between suffixes.
///
/// Out-of-range quantity or sides reject the dice entirely. Every other problem only removes the offending suffix.
pub(super) fn validate_dice(raw: &RawDice) -> (Option<Dice>, Vec<Message>) {
	let mut messages = Vec::new();

	let quantity = raw
		.count
		.as_deref()
		.map_or(Some(1), |digits| number(digits, &mut messages));
	let count = quantity.and_then(|quantity| {
		let count = u8::try_from(quantity)
			.ok()
			.filter(|count| (1..=MAX_QUANTITY).contains(count));
		if count.is_none() {
			messages.push(Message::QuantityOutOfRange {
				quantity,
				max: MAX_QUANTITY,
			});
		}
		count
	});

	let sides = number(&raw.sides, &mut messages).and_then(|given| {
		let sides = u16::try_from(given)
			.ok()
			.filter(|sides| (MIN_SIDES..=MAX_SIDES).contains(sides));
		if sides.is_none() {
			messages.push(Message::SidesOutOfRange {
				sides: given,
				min: MIN_SIDES,
				max: MAX_SIDES,
			});
		}
		sides
	});

	let (Some(count), Some(sides)) = (count, sides) else {
		return (None, messages);
	};

	let mut explode = None;
	let mut explode_seen = false;
	let mut selected: [Option<u8>; 4] = [None; 4];
	let mut select_seen = [false; 4];

	for suffix in &raw.suffixes {
		match suffix {
			Suffix::Explode { recurse, threshold } => {
				if explode_seen {
					messages.push(Message::Duplicate("explosion"));
					continue;
				}
				explode_seen = true;
				explode = explosion(*recurse, threshold.as_deref(), sides, &mut messages);
			}
			Suffix::Select(select, given) => {
				if select_seen[select.index()] {
					messages.push(Message::Duplicate(select.symbol()));
					continue;
				}
				select_seen[select.index()] = true;
				selected[select.index()] = selection(*select, given.as_deref(), count, &mut messages);
			}
		}
	}

	resolve_conflicts(&mut selected, count, &mut messages);

	let modifiers = Select::ALL
		.iter()
		.zip(selected)
		.filter_map(|(select, count)| count.map(|count| select.modifier(count)))
		.collect();

	(
		Some(Dice {
			count,
			sides,
			explode,
			modifiers,
		}),
		messages,
	)
}

/// Builds an explosion rule, disabling it when its threshold is out of range. A threshold equal to the sides is the
/// same as no threshold at all.
fn explosion(recurse: bool, threshold: Option<&str>, sides: u16, messages: &mut Vec<Message>) -> Option<Explode> {
	let Some(digits) = threshold else {
		return Some(Explode {
			threshold: None,
			recurse,
		});
	};

	let given = number(digits, messages)?;
	match u16::try_from(given) {
		Ok(threshold) if (MIN_SIDES..sides).contains(&threshold) => Some(Explode {
			threshold: Some(threshold),
			recurse,
		}),
		Ok(threshold) if threshold == sides => Some(Explode {
			threshold: None,
			recurse,
		}),
		_ => {
			messages.push(Message::ThresholdOutOfRange {
				threshold: given,
				sides,
			});
			None
		}
	}
}

/// Checks the count of a keep/drop suffix against the dice quantity. Keeps may select every die, drops must leave
/// at least one.
fn selection(select: Select, given: Option<&str>, quantity: u8, messages: &mut Vec<Message>) -> Option<u8> {
	let count = given.map_or(Some(1), |digits| number(digits, messages))?;
	let max = if select.is_keep() {
		quantity
	} else {
		quantity.saturating_sub(1)
	};

	let valid = u8::try_from(count)
		.ok()
		.filter(|count| (1..=max).contains(count));
	if valid.is_none() {
		messages.push(Message::SelectionOutOfRange {
			symbol: select.symbol(),
			count,
			max: u32::from(max),
		});
	}
	valid
}

/// Removes keep/drop selections that can't be used together: keeps win over drops, keep highest wins over keep
/// lowest, and drops that would leave no dice are both removed.
fn resolve_conflicts(selected: &mut [Option<u8>; 4], quantity: u8, messages: &mut Vec<Message>) {
	let [keep_high, keep_low, drop_high, drop_low] = selected;

	if let (Some(_), Some(count)) = (*keep_high, *keep_low) {
		messages.push(Message::KeepLowOverridden(Modifier::KeepLow(count)));
		*keep_low = None;
	}

	if keep_high.is_some() || keep_low.is_some() {
		if let Some(count) = drop_high.take() {
			messages.push(Message::DropOverridden(Modifier::DropHigh(count)));
		}
		if let Some(count) = drop_low.take() {
			messages.push(Message::DropOverridden(Modifier::DropLow(count)));
		}
	} else if let (Some(high), Some(low)) = (*drop_high, *drop_low) {
		if u16::from(high) + u16::from(low) >= u16::from(quantity) {
			messages.push(Message::DropsEveryDie {
				high,
				low,
				count: quantity,
			});
			*drop_high = None;
			*drop_low = None;
		}
	}
}
