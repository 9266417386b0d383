//! wildroll - roll dice expressions from the command line

use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wildroll::{
	dice::roller::{FastRand as FastRandRoller, Roller, Secure as SecureRoller},
	expr::Describe,
	parse,
};

/// Rolls dice expressions like "2d6+1", "4d6kh3 x6" or "d8!! + 2 tn4"
#[derive(Parser, Debug)]
#[command(name = "wildroll", version, about)]
struct Args {
	/// Roll text (read from stdin if not given). Multiple arguments are joined with spaces, so quoting isn't needed.
	expression: Vec<String>,

	/// Parse the text as a trait roll (trait die + wild die)
	#[arg(short, long = "trait")]
	trait_roll: bool,

	/// Seed for a reproducible (but not cryptographically secure) roller
	#[arg(short, long)]
	seed: Option<u64>,

	/// Maximum number of individual dice to list per dice group
	#[arg(short, long)]
	limit: Option<usize>,
}

fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "wildroll=info".into()))
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
		.init();

	let args = Args::parse();
	let input = if args.expression.is_empty() {
		read_stdin()?
	} else {
		args.expression.join(" ")
	};

	match args.seed {
		Some(seed) => run(&args, &input, &mut FastRandRoller::with_seed(seed)),
		None => run(&args, &input, &mut SecureRoller::default()),
	}
}

/// Reads a single line of roll text from stdin, prompting for it when stdin is interactive.
fn read_stdin() -> Result<String> {
	let stdin = io::stdin();
	if stdin.is_terminal() {
		print!("Enter roll: ");
		io::stdout().flush()?;
	}

	let mut line = String::new();
	stdin.read_line(&mut line).context("unable to read roll from stdin")?;
	Ok(line)
}

/// Parses and rolls the input, printing the results.
fn run(args: &Args, input: &str, rng: &mut impl Roller) -> Result<()> {
	if args.trait_roll {
		let trait_roll = parse::trait_roll(input);
		print_messages(&trait_roll.messages);

		let result = trait_roll.roll(rng)?;
		if let Some(comment) = &trait_roll.comment {
			println!("{comment}");
		}
		println!("{}", result.describe(args.limit));
		println!("Total: {}", result.total);
	} else {
		let roll = parse::roll(input);
		print_messages(&roll.messages);
		if !roll.is_usable() {
			bail!("nothing to roll");
		}

		let result = roll.roll(rng)?;
		println!("{}", result.describe(args.limit));
		if roll.target.is_some() {
			println!("Successes: {}", result.total_successes);
		}
		if result.critical_failure {
			println!("Critical failure!");
		}
	}

	Ok(())
}

/// Prints validation messages to stderr.
fn print_messages(messages: &[wildroll::Message]) {
	for message in messages {
		eprintln!("warning: {message}");
	}
}
