use crate::{
	dice::{roller::Iter as IterRoller, Dice},
	expr::{CalcError, Describe, EvaledTerm, Expr, Op, Term},
};

#[test]
fn numbers_only() {
	let expr = Expr::new(vec![(Op::Add, Term::Num(42)), (Op::Sub, Term::Num(69))]);
	assert!(expr.is_deterministic());

	// Literal terms never draw, so an empty scripted roller is fine
	let evaled = expr.eval(&mut IterRoller::new(Vec::<u16>::new())).unwrap();
	assert_eq!(evaled.calc().unwrap(), -27);
}

#[test]
fn dice_and_numbers() {
	let expr = Expr::new(vec![
		(Op::Add, Term::Dice(Dice::new(2, 6))),
		(Op::Add, Term::Num(3)),
		(Op::Sub, Term::Dice(Dice::new(1, 4))),
	]);
	assert!(!expr.is_deterministic());
	assert_eq!(expr.dice_groups(), 2);

	let evaled = expr.eval(&mut IterRoller::new([4, 5, 2])).unwrap();
	assert_eq!(evaled.calc().unwrap(), 10);
	assert_eq!(evaled.dice().count(), 2);
	assert_eq!(evaled.describe(None), "2d6[4, 5] + 3 - 1d4[2]");
}

#[test]
fn terms_roll_in_order() {
	let expr = Expr::new(vec![
		(Op::Add, Term::Dice(Dice::new(1, 6))),
		(Op::Add, Term::Dice(Dice::new(1, 8))),
	]);
	let evaled = expr.eval(&mut IterRoller::new([2, 7])).unwrap();
	let EvaledTerm::Dice(first) = &evaled.terms[0].1 else {
		panic!("first term should be dice");
	};
	assert_eq!(first.rolls[0].val, 2);
}

#[test]
fn leading_subtraction() {
	let expr = Expr::new(vec![(Op::Sub, Term::Dice(Dice::new(1, 6))), (Op::Add, Term::Num(1))]);
	assert_eq!(expr.to_string(), "-1d6 + 1");

	let evaled = expr.eval(&mut IterRoller::new([4])).unwrap();
	assert_eq!(evaled.calc().unwrap(), -3);
	assert_eq!(evaled.to_string(), "-1d6[4] + 1");
}

#[test]
fn calc_overflow() {
	let expr = Expr::new(vec![(Op::Add, Term::Num(i32::MAX)), (Op::Add, Term::Num(1))]);
	let evaled = expr.eval(&mut IterRoller::new(Vec::<u16>::new())).unwrap();
	let result = evaled.calc();
	assert!(matches!(result, Err(CalcError::Overflow(..))));
	assert!(result.unwrap_err().to_string().contains("overflow"));
}

#[test]
fn calc_underflow() {
	let expr = Expr::new(vec![(Op::Sub, Term::Num(i32::MAX)), (Op::Sub, Term::Num(2))]);
	let evaled = expr.eval(&mut IterRoller::new(Vec::<u16>::new())).unwrap();
	assert!(matches!(evaled.calc(), Err(CalcError::Overflow(..))));
}

#[test]
fn empty_expression_totals_zero() {
	let expr = Expr::default();
	let evaled = expr.eval(&mut IterRoller::new(Vec::<u16>::new())).unwrap();
	assert_eq!(evaled.calc().unwrap(), 0);
	assert_eq!(expr.to_string(), "");
}
