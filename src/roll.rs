//! Full rolls: one or more expressions sharing a target number, global modifier and comment.

use alloc::{
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

use crate::{
	dice::{roller::Roller, Error as DiceError},
	expr::{CalcError, Describe, EvalError, Evaled, Expr},
	message::Message,
	outcome::{self, Outcome},
};

/// Parsed roll, ready to be rolled any number of times
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct Roll {
	/// Expressions to roll, in order (repetition already applied)
	pub exprs: Vec<Expr>,

	/// Target number each expression's modified total is compared against
	pub target: Option<i32>,

	/// Only the highest this many expression results are compared against the target number
	pub target_highest: Option<u32>,

	/// Global modifier added to every expression's total
	pub modifier: Option<i32>,

	/// Free-text comment
	pub comment: Option<String>,

	/// Text the roll was parsed from
	pub raw: String,

	/// Validation messages produced while parsing
	pub messages: Vec<Message>,
}

impl Roll {
	/// Creates a roll of the given expressions with no target number, modifier or comment.
	#[must_use]
	pub fn new(exprs: Vec<Expr>) -> Self {
		Self {
			exprs,
			..Self::default()
		}
	}

	/// Sets the target number.
	#[must_use]
	pub const fn with_target(mut self, target: i32) -> Self {
		self.target = Some(target);
		self
	}

	/// Sets how many of the highest expression results are compared against the target number.
	#[must_use]
	pub const fn with_target_highest(mut self, target_highest: u32) -> Self {
		self.target_highest = Some(target_highest);
		self
	}

	/// Sets the global modifier.
	#[must_use]
	pub const fn with_modifier(mut self, modifier: i32) -> Self {
		self.modifier = Some(modifier);
		self
	}

	/// Indicates whether there is anything to roll. A roll parsed from non-empty text that has no expressions left
	/// can't be used; its messages explain why.
	#[must_use]
	pub fn is_usable(&self) -> bool {
		!self.exprs.is_empty()
	}

	/// Counts the dice groups across all expressions.
	#[must_use]
	pub fn dice_groups(&self) -> usize {
		self.exprs.iter().map(Expr::dice_groups).sum()
	}

	/// Rolls every expression in order with the given roller, then classifies each against the target number.
	///
	/// # Errors
	/// If rolling or totalling any expression fails, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::{roller::Iter as IterRoller, Dice}, expr::{Expr, Op, Term}, Outcome, Roll};
	///
	/// let expr = Expr::new(vec![(Op::Add, Term::Dice(Dice::new(2, 6)))]);
	/// let roll = Roll::new(vec![expr.clone(), expr]).with_target(6).with_modifier(1);
	///
	/// let result = roll.roll(&mut IterRoller::new([3, 4, 1, 2]))?;
	/// assert_eq!(result.exprs[0].modified_total, 8);
	/// assert_eq!(result.exprs[0].outcome, Outcome::Success);
	/// assert_eq!(result.exprs[1].modified_total, 4);
	/// assert_eq!(result.exprs[1].outcome, Outcome::Failed);
	/// assert_eq!(result.total_successes, 1);
	/// # Ok::<(), wildroll::roll::Error>(())
	/// ```
	pub fn roll(&self, rng: &mut impl Roller) -> Result<RollResult, Error> {
		let modifier = self.modifier.unwrap_or(0);

		let mut exprs = Vec::with_capacity(self.exprs.len());
		for expr in &self.exprs {
			let evaled = expr.eval(rng)?;
			let total = evaled.calc()?;
			let modified_total = total
				.checked_add(modifier)
				.ok_or_else(|| CalcError::Overflow(evaled.clone().into_owned()))?;
			let critical_failure = outcome::is_critical_failure(evaled.dice());

			exprs.push(ExprResult {
				outcome: outcome::classify(modified_total, self.target, critical_failure),
				evaled,
				total,
				modified_total,
			});
		}

		if let (Some(_), Some(highest)) = (self.target, self.target_highest) {
			rank_highest(&mut exprs, highest);
		}

		let result = RollResult {
			total_successes: exprs.iter().filter(|expr| expr.outcome.is_success()).count(),
			critical_failure: outcome::is_critical_failure(exprs.iter().flat_map(|expr| expr.evaled.dice())),
			exprs,
			roll: self,
		};
		tracing::debug!(
			exprs = result.exprs.len(),
			total_successes = result.total_successes,
			critical_failure = result.critical_failure,
			"rolled"
		);

		Ok(result)
	}
}

/// Marks every expression result outside of the `highest` highest modified totals as not applicable. Ties are
/// resolved in favour of the earlier expression.
fn rank_highest(exprs: &mut [ExprResult], highest: u32) {
	let mut order = (0..exprs.len()).collect::<Vec<_>>();
	order.sort_by(|a, b| exprs[*b].modified_total.cmp(&exprs[*a].modified_total));

	let highest = usize::try_from(highest).unwrap_or(usize::MAX);
	for idx in order.into_iter().skip(highest) {
		exprs[idx].outcome = Outcome::NotApplicable;
	}
}

/// Result of rolling a single expression of a [`Roll`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ExprResult<'a> {
	/// Evaluated expression
	pub evaled: Evaled<'a>,

	/// Total of the expression
	pub total: i32,

	/// Total of the expression with the global modifier applied
	pub modified_total: i32,

	/// Classified outcome
	pub outcome: Outcome,
}

impl Describe for ExprResult<'_> {
	fn describe(&self, list_limit: Option<usize>) -> String {
		let mut out = self.evaled.describe(list_limit);
		out.push_str(" = ");
		out.push_str(&self.modified_total.to_string());
		if self.outcome != Outcome::NotApplicable {
			out.push_str(" (");
			out.push_str(&self.outcome.to_string());
			out.push(')');
		}
		out
	}
}

impl fmt::Display for ExprResult<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Result of rolling a [`Roll`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RollResult<'a> {
	/// Roll that was rolled
	pub roll: &'a Roll,

	/// Result of each expression, in order
	pub exprs: Vec<ExprResult<'a>>,

	/// Number of expressions that succeeded (including raises)
	pub total_successes: usize,

	/// Whether every qualifying die across every expression came up a 1 (with at least two such dice)
	pub critical_failure: bool,
}

impl Describe for RollResult<'_> {
	/// Builds a line per expression result, prefixed by the comment if there is one.
	fn describe(&self, list_limit: Option<usize>) -> String {
		let mut lines = Vec::with_capacity(self.exprs.len().saturating_add(1));
		if let Some(comment) = &self.roll.comment {
			lines.push(comment.clone());
		}
		lines.extend(self.exprs.iter().map(|expr| expr.describe(list_limit)));
		lines.join("\n")
	}
}

impl fmt::Display for RollResult<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur while rolling a [`Roll`] or [`TraitRoll`](crate::TraitRoll)
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// Error while rolling dice directly
	#[error(transparent)]
	Dice(#[from] DiceError),

	/// Error while evaluating an expression
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// Error while totalling an expression
	#[error(transparent)]
	Calc(#[from] CalcError),
}
