//! Parsing of roll text into [`Roll`]s and [`TraitRoll`]s.
//!
//! Parsing never fails outright. Fragments of the text that can't be used are skipped (or adjusted) and described by
//! [`Message`]s on the result, so the caller decides whether to go ahead with whatever could be understood.
//!
//! # Grammar
//! Roll text is made up of (in any order, case-insensitive, whitespace ignored):
//!
//! - Expressions separated by `;` or `,`, each a sum of terms joined by `+` or `-`
//! - Terms: plain numbers (`5`) or dice (`d20`, `4d6`), where dice may be followed by an explosion (`!!` recursive,
//!   `!` once, either with an optional `>N` threshold) and keep/drop selections (`khN`, `klN`, `dhN`, `dlN`, where the
//!   count defaults to 1)
//! - A target number `tN` or `tnN`, and optionally `thN` to only compare the N highest results against it
//! - A global modifier in parentheses, added to every expression: `(+2)`, `(-1)`, `(3)`
//! - A comment in double quotes: `"attack"` (lowercased and stripped of whitespace like everything else)
//! - A repetition suffix at the very end (after any comment): `x3` rolls everything three times
//!
//! Trait rolls take a single trait die (`d8`), optional inline modifiers (`d8+1`) and an optional wild die (`wd10`).

mod term;
mod token;

use alloc::{
	borrow::ToOwned,
	format,
	string::{String, ToString},
	vec,
	vec::Vec,
};

use chumsky::Parser as _;

use self::{
	term::{number, parse_term, raw_term, RawTerm},
	token::{tokens, Token},
};
use crate::{
	dice::{Dice, MAX_SIDES, MIN_SIDES},
	expr::{Expr, Op, Term},
	message::Message,
	roll::Roll,
	trait_roll::{TraitRoll, DEFAULT_TRAIT_SIDES, DEFAULT_WILD_SIDES, TRAIT_SIDES},
};

/// Maximum length of roll text, in characters (after trimming surrounding whitespace)
pub const MAX_INPUT_LEN: usize = 1000;

/// Maximum number of dice groups across every expression of a roll, after repetition
pub const MAX_DICE_GROUPS: usize = 100;

/// Maximum number of copies made of an expression list without any dice. Larger repetitions are capped.
pub const MAX_REPETITIONS: usize = 100;

/// Parses roll text.
///
/// # Examples
///
/// ## Basic roll
/// ```
/// use wildroll::{expr::Describe, parse};
///
/// let roll = parse::roll("2d6 + 3");
/// assert_eq!(roll.exprs.len(), 1);
/// assert_eq!(roll.exprs[0].describe(None), "2d6 + 3");
/// assert!(roll.messages.is_empty());
/// ```
///
/// ## Everything at once
/// ```
/// use wildroll::parse;
///
/// let roll = parse::roll("\"Sword attack\" 1d8!! + 2; 2d6kh (-1) tn6 x2");
/// assert_eq!(roll.comment.as_deref(), Some("swordattack"));
/// assert_eq!(roll.exprs.len(), 4);
/// assert_eq!(roll.exprs[2].to_string(), "1d8!! + 2");
/// assert_eq!(roll.exprs[3].to_string(), "2d6kh");
/// assert_eq!(roll.target, Some(6));
/// assert_eq!(roll.modifier, Some(-1));
/// ```
///
/// ## Problems are reported, not fatal
/// ```
/// use wildroll::{parse, Message};
///
/// let roll = parse::roll("3d0 + 1d6kh5");
/// assert_eq!(roll.exprs[0].to_string(), "1d6");
/// assert_eq!(roll.messages.len(), 2);
/// assert!(matches!(roll.messages[0], Message::SidesOutOfRange { sides: 0, .. }));
/// assert!(matches!(roll.messages[1], Message::SelectionOutOfRange { symbol: "kh", count: 5, .. }));
/// ```
#[must_use]
pub fn roll(text: &str) -> Roll {
	let mut roll = Roll {
		raw: text.to_owned(),
		..Roll::default()
	};

	let Some(trimmed) = within_limit(text, &mut roll.messages) else {
		return roll;
	};
	let (rest, repetition) = extract_repetition(trimmed);
	let (rest, comment) = extract_comment(&normalize(rest));
	roll.comment = comment;

	let (extracted, messages) = split(&rest);
	roll.messages.extend(messages);

	if extracted.wild_die.is_some() {
		roll.messages.push(Message::WildDieOutsideTrait);
	}

	roll.target = extracted
		.target
		.and_then(|digits| number(&digits, &mut roll.messages))
		.and_then(|target| checked_i32(target, &mut roll.messages));
	roll.target_highest = extracted
		.target_highest
		.and_then(|digits| number(&digits, &mut roll.messages))
		.filter(|highest| {
			if *highest == 0 {
				roll.messages.push(Message::TargetHighestZero);
				false
			} else if roll.target.is_none() {
				roll.messages.push(Message::TargetHighestWithoutTarget);
				false
			} else {
				true
			}
		});
	roll.modifier = extracted
		.modifier
		.and_then(|modifier| signed(modifier, &mut roll.messages));

	for fragments in extracted.exprs {
		let mut terms = Vec::with_capacity(fragments.len());
		for (op, fragment) in fragments {
			let (term, messages) = parse_term(&fragment);
			roll.messages.extend(messages);
			if let Some(term) = term {
				terms.push((op, term));
			}
		}

		if !terms.is_empty() {
			roll.exprs.push(Expr::new(terms));
		}
	}

	if !extracted.had_content {
		roll.exprs.push(Expr::new(vec![(Op::Add, Term::Dice(Dice::default()))]));
	}

	repeat(&mut roll, repetition);

	tracing::debug!(
		raw = %roll.raw,
		exprs = roll.exprs.len(),
		messages = roll.messages.len(),
		"parsed roll"
	);
	roll
}

/// Parses trait roll text.
///
/// # Examples
/// ```
/// use wildroll::{parse, Message};
///
/// let trait_roll = parse::trait_roll("d8+1 wd10 \"Fighting\"");
/// assert_eq!(trait_roll.trait_die.sides, 8);
/// assert_eq!(trait_roll.wild_die.sides, 10);
/// assert_eq!(trait_roll.modifier, Some(1));
/// assert_eq!(trait_roll.comment.as_deref(), Some("fighting"));
///
/// let trait_roll = parse::trait_roll("d7");
/// assert_eq!(trait_roll.trait_die.sides, 4);
/// assert!(matches!(trait_roll.messages[0], Message::DieNotAllowed { die: "trait", sides: 7, default: 4 }));
/// ```
#[must_use]
pub fn trait_roll(text: &str) -> TraitRoll {
	let mut trait_roll = TraitRoll {
		raw: text.to_owned(),
		..TraitRoll::default()
	};

	let Some(trimmed) = within_limit(text, &mut trait_roll.messages) else {
		return trait_roll;
	};
	let (rest, comment) = extract_comment(&normalize(trimmed));
	trait_roll.comment = comment;

	let (extracted, messages) = split(&rest);
	trait_roll.messages.extend(messages);

	if let Some(target) = extracted
		.target
		.and_then(|digits| number(&digits, &mut trait_roll.messages))
		.and_then(|target| checked_i32(target, &mut trait_roll.messages))
	{
		trait_roll.target = target;
	}
	if let Some(digits) = extracted.target_highest {
		trait_roll.messages.push(Message::ExtraTraitTerm(format!("th{digits}")));
	}

	if let Some(digits) = extracted.wild_die {
		if let Some(sides) = trait_sides("wild", &digits, DEFAULT_WILD_SIDES, &mut trait_roll.messages) {
			trait_roll.wild_die = Dice::exploding(sides);
		}
	}

	let mut exprs = extracted.exprs.into_iter();
	let mut inline: Option<i32> = None;
	let mut trait_given = false;
	for (op, fragment) in exprs.next().unwrap_or_default() {
		match raw_term(&fragment) {
			Some(RawTerm::Num(digits)) => {
				let Some(val) = number(&digits, &mut trait_roll.messages)
					.and_then(|val| checked_i32(val, &mut trait_roll.messages))
				else {
					continue;
				};
				match op.apply(inline.unwrap_or(0), val) {
					Some(sum) => inline = Some(sum),
					None => trait_roll.messages.push(Message::NumberTooLarge(digits)),
				}
			}
			Some(RawTerm::Dice(raw)) if !trait_given => {
				trait_given = true;
				if let Some(digits) = raw.count.as_ref().filter(|digits| digits.parse::<u32>() != Ok(1)) {
					trait_roll.messages.push(Message::TraitQuantity(digits.clone()));
				}
				if let Some(sides) = trait_sides("trait", &raw.sides, DEFAULT_TRAIT_SIDES, &mut trait_roll.messages) {
					trait_roll.trait_die = Dice::exploding(sides);
				}
			}
			Some(RawTerm::Dice(..)) => trait_roll.messages.push(Message::ExtraTraitTerm(format!("{op}{fragment}"))),
			None => trait_roll.messages.push(Message::UnknownTerm(fragment)),
		}
	}

	for fragments in exprs {
		let expr = fragments
			.into_iter()
			.map(|(op, fragment)| format!("{op}{fragment}"))
			.collect::<String>();
		trait_roll.messages.push(Message::ExtraTraitTerm(expr));
	}

	trait_roll.modifier = inline.or_else(|| {
		extracted
			.modifier
			.and_then(|modifier| signed(modifier, &mut trait_roll.messages))
	});

	tracing::debug!(
		raw = %trait_roll.raw,
		trait_sides = trait_roll.trait_die.sides,
		wild_sides = trait_roll.wild_die.sides,
		messages = trait_roll.messages.len(),
		"parsed trait roll"
	);
	trait_roll
}

/// Trims text and checks it against [`MAX_INPUT_LEN`].
fn within_limit<'a>(text: &'a str, messages: &mut Vec<Message>) -> Option<&'a str> {
	let trimmed = text.trim();
	if trimmed.chars().count() > MAX_INPUT_LEN {
		messages.push(Message::InputTooLong { max: MAX_INPUT_LEN });
		None
	} else {
		Some(trimmed)
	}
}

/// Removes the first double-quoted section from normalized text, returning the remaining text and the comment.
/// Empty quotes are removed without yielding a comment.
fn extract_comment(text: &str) -> (String, Option<String>) {
	let Some((before, after)) = text.split_once('"') else {
		return (text.to_owned(), None);
	};
	let Some((comment, after)) = after.split_once('"') else {
		return (text.to_owned(), None);
	};

	let comment = (!comment.is_empty()).then(|| comment.to_owned());
	(format!("{before}{after}"), comment)
}

/// Removes a trailing repetition suffix (`x`, then optional whitespace and digits) from text, returning the remaining
/// text and the repetition count. Counts below 2 (or no suffix at all) are a single repetition.
fn extract_repetition(text: &str) -> (&str, usize) {
	let trimmed = text.trim_end();
	let digits_start = trimmed.trim_end_matches(|c: char| c.is_ascii_digit()).len();
	let (before, digits) = trimmed.split_at(digits_start);

	match before.trim_end().strip_suffix(['x', 'X']) {
		Some(rest) => {
			let count = if digits.is_empty() {
				1
			} else {
				digits.parse().unwrap_or(usize::MAX)
			};
			(rest, count.max(1))
		}
		None => (text, 1),
	}
}

/// Lowercases text and strips all whitespace from it.
fn normalize(text: &str) -> String {
	text.chars()
		.filter(|c| !c.is_whitespace())
		.flat_map(char::to_lowercase)
		.collect()
}

/// Converts a parsed number to an `i32`, noting it when it's too large.
fn checked_i32(num: u32, messages: &mut Vec<Message>) -> Option<i32> {
	let converted = i32::try_from(num).ok();
	if converted.is_none() {
		messages.push(Message::NumberTooLarge(num.to_string()));
	}
	converted
}

/// Converts a global modifier's sign and digits to a signed number.
fn signed((op, digits): (Op, String), messages: &mut Vec<Message>) -> Option<i32> {
	let magnitude = number(&digits, messages).and_then(|num| checked_i32(num, messages))?;
	op.apply(0, magnitude)
}

/// Checks the sides of a trait or wild die, returning them if they are allowed.
fn trait_sides(die: &'static str, digits: &str, default: u16, messages: &mut Vec<Message>) -> Option<u16> {
	let given = number(digits, messages)?;
	let sides = u16::try_from(given)
		.ok()
		.filter(|sides| (MIN_SIDES..=MAX_SIDES).contains(sides) && TRAIT_SIDES.contains(sides));
	if sides.is_none() {
		messages.push(Message::DieNotAllowed {
			die,
			sides: given,
			default,
		});
	}
	sides
}

/// Clones the expressions of a roll for repetition, clearing them instead if that would result in too many dice groups.
/// Repetition of expressions without any dice is capped at [`MAX_REPETITIONS`] copies.
fn repeat(roll: &mut Roll, repetition: usize) {
	let groups = roll.dice_groups().saturating_mul(repetition);
	if groups > MAX_DICE_GROUPS {
		roll.exprs.clear();
		roll.messages.push(Message::TooManyDiceGroups {
			count: groups,
			max: MAX_DICE_GROUPS,
		});
	} else if repetition > 1 {
		let len = roll.exprs.len();
		let copies = repetition.min(MAX_REPETITIONS);
		roll.exprs = roll.exprs.iter().cycle().take(len * copies).cloned().collect();
	}
}

/// Roll text split into its parts, with expressions still as unparsed term fragments
#[derive(Debug, Default)]
struct Extracted {
	/// Term fragments of each expression, each with the operator preceding it
	exprs: Vec<Vec<(Op, String)>>,

	/// Target number digits
	target: Option<String>,

	/// Target highest digits
	target_highest: Option<String>,

	/// Global modifier sign and digits
	modifier: Option<(Op, String)>,

	/// Wild die sides digits
	wild_die: Option<String>,

	/// Whether there were any terms or operators at all
	had_content: bool,
}

/// Builds up the term fragments of a single expression
#[derive(Debug, Default)]
struct ExprBuilder {
	/// Finished fragments
	fragments: Vec<(Op, String)>,

	/// Operator for the fragment in progress
	op: Op,

	/// Whether the operator for the fragment in progress was written out
	op_given: bool,

	/// Fragment in progress
	fragment: String,
}

impl ExprBuilder {
	/// Finishes the fragment in progress, noting an operator that was written without a term after it.
	fn finish_term(&mut self, messages: &mut Vec<Message>) {
		if !self.fragment.is_empty() {
			self.fragments
				.push((self.op, core::mem::take(&mut self.fragment)));
		} else if self.op_given {
			messages.push(Message::MissingTerm(self.op));
		}
		self.op = Op::default();
		self.op_given = false;
	}

	/// Finishes the expression, returning its fragments if it has any.
	fn finish(&mut self, messages: &mut Vec<Message>) -> Option<Vec<(Op, String)>> {
		self.finish_term(messages);
		let fragments = core::mem::take(&mut self.fragments);
		(!fragments.is_empty()).then_some(fragments)
	}
}

/// Tokenizes normalized text and sorts the tokens into their parts. Only the first of each single-use part is kept.
fn split(text: &str) -> (Extracted, Vec<Message>) {
	let mut extracted = Extracted::default();
	let mut messages = Vec::new();
	let mut builder = ExprBuilder::default();

	// The tokenizer accepts any input, so this only falls back on a bug
	let tokens = tokens().parse(text).into_result().unwrap_or_default();

	for token in tokens {
		match token {
			Token::Target(digits) => set_once(&mut extracted.target, digits, "target number", &mut messages),
			Token::TargetHighest(digits) => {
				set_once(&mut extracted.target_highest, digits, "target highest", &mut messages);
			}
			Token::GlobalModifier(op, digits) => {
				set_once(&mut extracted.modifier, (op, digits), "global modifier", &mut messages);
			}
			Token::WildDie(digits) => set_once(&mut extracted.wild_die, digits, "wild die", &mut messages),
			Token::Separator => extracted.exprs.extend(builder.finish(&mut messages)),
			Token::Op(op) => {
				extracted.had_content = true;
				builder.finish_term(&mut messages);
				builder.op = op;
				builder.op_given = true;
			}
			Token::Text(text) => {
				extracted.had_content = true;
				builder.fragment.push_str(&text);
			}
		}
	}
	extracted.exprs.extend(builder.finish(&mut messages));

	(extracted, messages)
}

/// Sets a single-use part, noting it as a duplicate if it was already set.
fn set_once<T>(slot: &mut Option<T>, val: T, what: &'static str, messages: &mut Vec<Message>) {
	if slot.is_some() {
		messages.push(Message::Duplicate(what));
	} else {
		*slot = Some(val);
	}
}
