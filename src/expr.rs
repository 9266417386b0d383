//! Data structures for evaluating dice expressions (signed sums of dice groups and literal numbers) and working with
//! their results.

use alloc::{
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

use crate::dice::{roller::Roller, Dice, Error as DiceError, Rolled};

/// Operator joining a term to the rest of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Op {
	/// Adds the term's value
	#[default]
	Add,

	/// Subtracts the term's value
	Sub,
}

impl Op {
	/// Gets the symbol that represents the operator.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
		}
	}

	/// Applies the operator to a running total, returning `None` on overflow.
	#[must_use]
	pub const fn apply(self, total: i32, val: i32) -> Option<i32> {
		match self {
			Self::Add => total.checked_add(val),
			Self::Sub => total.checked_sub(val),
		}
	}
}

impl fmt::Display for Op {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Individual term of a dice expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Term {
	/// Standalone integer
	Num(i32),

	/// Dice literal
	Dice(Dice),
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(x) => write!(f, "{x}"),
			Self::Dice(dice) => write!(f, "{dice}"),
		}
	}
}

/// Full dice expression: a sequence of terms, each added to or subtracted from the total
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[allow(clippy::exhaustive_structs, reason = "Plain data")]
pub struct Expr {
	/// Terms of the expression in order, each with the operator that precedes it
	pub terms: Vec<(Op, Term)>,
}

impl Expr {
	/// Creates an expression from its terms.
	#[must_use]
	pub const fn new(terms: Vec<(Op, Term)>) -> Self {
		Self { terms }
	}

	/// Evaluates the expression, rolling the dice of every [`Term::Dice`] with the given roller. Literal numbers never
	/// draw from the roller.
	///
	/// # Errors
	/// If an error occurs during dice rolling, an error variant will be returned.
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::{roller::Iter as IterRoller, Dice}, expr::{Expr, Op, Term}};
	///
	/// let expr = Expr::new(vec![(Op::Add, Term::Dice(Dice::new(2, 6))), (Op::Sub, Term::Num(1))]);
	/// let evaled = expr.eval(&mut IterRoller::new([4, 5]))?;
	/// assert_eq!(evaled.calc()?, 8);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller) -> Result<Evaled, EvalError> {
		let mut terms = Vec::with_capacity(self.terms.len());
		for (op, term) in &self.terms {
			let evaled = match term {
				Term::Num(x) => EvaledTerm::Num(*x),
				Term::Dice(dice) => {
					EvaledTerm::Dice(rng.roll(dice).map_err(|err| EvalError::Dice(self.clone(), err))?)
				}
			};
			terms.push((*op, evaled));
		}

		Ok(Evaled { terms })
	}

	/// Counts the dice groups in the expression (literal numbers don't count).
	#[must_use]
	pub fn dice_groups(&self) -> usize {
		self.terms
			.iter()
			.filter(|(_, term)| matches!(term, Term::Dice(..)))
			.count()
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// That is only the case when it contains no dice at all.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		self.dice_groups() == 0
	}
}

impl Describe for Expr {
	/// Builds a full usable expression string from the expression. All strings output from this should result in the
	/// exact same expression when re-parsing them.
	///
	/// `list_limit` does not affect the output of this implementation in any way since there are no possible lists of
	/// elements included, so it is always safe to pass `None`.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		describe_terms(self.terms.iter().map(|(op, term)| (*op, term.to_string())))
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Individual term of an evaluated dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaledTerm<'a> {
	/// Standalone integer
	Num(i32),

	/// Rolled dice
	Dice(Rolled<'a>),
}

impl EvaledTerm<'_> {
	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> EvaledTerm<'static> {
		match self {
			Self::Num(x) => EvaledTerm::Num(x),
			Self::Dice(rolled) => EvaledTerm::Dice(rolled.into_owned()),
		}
	}
}

impl Describe for EvaledTerm<'_> {
	fn describe(&self, list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(rolled) => rolled.describe(list_limit),
		}
	}
}

/// Evaluated dice expression, with every dice group rolled
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs, reason = "Plain result data")]
pub struct Evaled<'a> {
	/// Evaluated terms in order, each with the operator that precedes it
	pub terms: Vec<(Op, EvaledTerm<'a>)>,
}

impl<'a> Evaled<'a> {
	/// Calculates the final result of the evaluated expression: the signed sum of all of its terms.
	///
	/// # Errors
	/// If there is an integer overflow, or an error calculating the total of a set of dice rolls, an error variant will
	/// be returned.
	pub fn calc(&self) -> Result<i32, CalcError> {
		let mut total: i32 = 0;
		for (op, term) in &self.terms {
			let val = match term {
				EvaledTerm::Num(x) => *x,
				EvaledTerm::Dice(rolled) => {
					let sum = rolled
						.total()
						.map_err(|err| CalcError::Dice(self.clone().into_owned(), err))?;
					i32::try_from(sum).map_err(|_err| CalcError::Overflow(self.clone().into_owned()))?
				}
			};
			total = op
				.apply(total, val)
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned()))?;
		}

		Ok(total)
	}

	/// Iterates over the rolled dice groups of the expression.
	pub fn dice(&self) -> impl Iterator<Item = &Rolled<'a>> {
		self.terms.iter().filter_map(|(_, term)| match term {
			EvaledTerm::Dice(rolled) => Some(rolled),
			EvaledTerm::Num(..) => None,
		})
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		Evaled {
			terms: self
				.terms
				.into_iter()
				.map(|(op, term)| (op, term.into_owned()))
				.collect(),
		}
	}
}

impl Describe for Evaled<'_> {
	/// Builds a string of every term, listing the individual rolls of each dice group (see [`Rolled::describe()`]).
	///
	/// # Examples
	/// ```
	/// use wildroll::{dice::{roller::Iter as IterRoller, Dice}, expr::{Describe, Expr, Op, Term}};
	///
	/// let expr = Expr::new(vec![(Op::Add, Term::Dice(Dice::new(2, 6))), (Op::Sub, Term::Num(1))]);
	/// let evaled = expr.eval(&mut IterRoller::new([4, 5]))?;
	/// assert_eq!(evaled.describe(None), "2d6[4, 5] - 1");
	/// # Ok::<(), wildroll::expr::EvalError>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		describe_terms(
			self.terms
				.iter()
				.map(|(op, term)| (*op, term.describe(list_limit))),
		)
	}
}

impl fmt::Display for Evaled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
	/// Dice-related error (likely during rolling)
	#[error("dice error while evaluating \"{0}\": {1}")]
	Dice(Expr, #[source] DiceError),
}

/// Error that can occur during [`Evaled::calc()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CalcError {
	/// Dice-related error (likely during totalling)
	#[error("dice error while calculating ({0}): {1}")]
	Dice(Evaled<'static>, #[source] DiceError),

	/// Integer overflow (likely during calculation of a sum)
	#[error("integer overflow while calculating {0}")]
	Overflow(Evaled<'static>),
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed expression string with additional information about non-deterministic elements.
	/// Any elements of the expression that can have a different result between multiple evaluations or multiple results
	/// should list all of the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Joins described terms with their operators. A leading addition is implicit; a leading subtraction is written as a
/// sign.
fn describe_terms(terms: impl Iterator<Item = (Op, String)>) -> String {
	let mut out = String::new();
	for (i, (op, term)) in terms.enumerate() {
		match (i, op) {
			(0, Op::Add) => {}
			(0, Op::Sub) => out.push('-'),
			(_, op) => out.push_str(&format!(" {op} ")),
		}
		out.push_str(&term);
	}
	out
}
