mod dice;
mod expr;
mod outcome;
