//! Tokenizer for normalized (lowercased, whitespace-free) roll text.

use alloc::{
	string::{String, ToString},
	vec::Vec,
};

use chumsky::prelude::*;

use crate::expr::Op;

/// Extra parser state and error type shared by every parser in this module
pub(super) type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Single token of roll text. Numbers are kept as their digits so that overly large values can be reported as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
	/// `th<N>`
	TargetHighest(String),

	/// `t<N>` or `tn<N>`
	Target(String),

	/// `(<N>)`, `(+<N>)` or `(-<N>)`
	GlobalModifier(Op, String),

	/// `wd<N>`
	WildDie(String),

	/// `;` or `,`
	Separator,

	/// `+` or `-`
	Op(Op),

	/// Anything else, to be parsed as a term
	Text(String),
}

/// Generates a parser for a run of one or more decimal digits. Leading zeroes are allowed.
pub(super) fn digits<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
	any().filter(char::is_ascii_digit).repeated().at_least(1).collect()
}

/// Generates a parser that splits normalized roll text into tokens. It accepts any input: characters that don't
/// begin any other token end up in [`Token::Text`].
pub(super) fn tokens<'src>() -> impl Parser<'src, &'src str, Vec<Token>, Extra<'src>> + Clone {
	// Target highest must come before target number, since both start with a "t"
	let target_highest = just::<_, &'src str, Extra<'src>>("th")
		.ignore_then(digits())
		.map(Token::TargetHighest);
	let target = just("tn")
		.or(just("t"))
		.ignore_then(digits())
		.map(Token::Target);

	let global_modifier = just::<_, &'src str, Extra<'src>>('(')
		.ignore_then(choice((just('+').to(Op::Add), just('-').to(Op::Sub))).or_not())
		.then(digits())
		.then_ignore(just(')'))
		.map(|(op, digits)| Token::GlobalModifier(op.unwrap_or_default(), digits));

	let wild_die = just::<_, &'src str, Extra<'src>>("wd")
		.ignore_then(digits())
		.map(Token::WildDie);

	let punctuation = choice((
		one_of::<_, &'src str, Extra<'src>>(";,").to(Token::Separator),
		just('+').to(Token::Op(Op::Add)),
		just('-').to(Token::Op(Op::Sub)),
	));

	let text = none_of::<_, &'src str, Extra<'src>>("tw+-;,()")
		.repeated()
		.at_least(1)
		.collect::<String>()
		.map(Token::Text);
	let stray = any::<&'src str, Extra<'src>>().map(|c: char| Token::Text(c.to_string()));

	choice((target_highest, target, global_modifier, wild_die, punctuation, text, stray))
		.repeated()
		.collect()
		.then_ignore(end())
}
