//! Abstractions for drawing random integers and rolling [`Dice`] using various means.

use alloc::{borrow::Cow, vec::Vec};
use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;
#[cfg(feature = "rand")]
use rand::{rngs::ThreadRng, Rng as _};

use super::{Dice, DieRoll, Error, Rolled};

/// Rolls dice - what else is there to say?
///
/// Implementors only need to provide [`Roller::random_int()`]. Every other draw made while rolling goes through it,
/// so a scripted implementation fully controls the outcome of a roll.
pub trait Roller {
	/// Generates a uniformly distributed random integer within `min..=max`.
	///
	/// # Errors
	/// If `min` is greater than `max`, [`Error::InvalidRange`] is returned.
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error>;

	/// Draws a single face of a die with the given number of sides.
	///
	/// # Errors
	/// If `sides` is zero, [`Error::InvalidRange`] is returned.
	#[inline]
	fn roll_die(&mut self, sides: u16) -> Result<u16, Error> {
		self.random_int(1, sides)
	}

	/// Generates a random permutation of `1..=size` with a Fisher-Yates shuffle.
	///
	/// # Errors
	/// Propagates any error from [`Roller::random_int()`].
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::roller::{FastRand as FastRandRoller, Roller};
	///
	/// let mut seq = FastRandRoller::with_seed(7).random_sequence(10)?;
	/// seq.sort_unstable();
	/// assert_eq!(seq, (1..=10).collect::<Vec<u16>>());
	/// # Ok::<(), wildroll::dice::Error>(())
	/// ```
	fn random_sequence(&mut self, size: u16) -> Result<Vec<u16>, Error> {
		let mut seq = (1..=size).collect::<Vec<_>>();
		for i in (1..size).rev() {
			let j = self.random_int(0, i)?;
			seq.swap(usize::from(i), usize::from(j));
		}
		Ok(seq)
	}

	/// Rolls a group of dice, exploding each die fully before moving on to the next, then applies all of its keep/drop
	/// modifiers to the rolls.
	///
	/// # Errors
	/// If a draw fails, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use wildroll::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(2).sides(6).explode(None, true).build();
	/// let rolled = IterRoller::new([6, 3, 2]).roll(&dice)?;
	/// assert_eq!(rolled.rolls[0].draws, vec![6, 3]);
	/// assert_eq!(rolled.rolls[1].draws, vec![2]);
	/// assert_eq!(rolled.total()?, 11);
	/// # Ok::<(), wildroll::dice::Error>(())
	/// ```
	fn roll<'d, 'r>(&mut self, dice: &'d Dice) -> Result<Rolled<'r>, Error>
	where
		'd: 'r,
		Self: Sized,
	{
		// Roll the dice!
		let mut rolls = Vec::with_capacity(usize::from(dice.count));
		for _ in 0..dice.count {
			let mut roll = DieRoll::new(self.roll_die(dice.sides)?);
			if let Some(explode) = dice.explode {
				explode.apply(&mut roll, dice.sides, self)?;
			}
			tracing::trace!(sides = dice.sides, draws = ?roll.draws, "rolled die");
			rolls.push(roll);
		}

		let mut rolled = Rolled {
			rolls,
			dice: Cow::Borrowed(dice),
		};

		// Apply all of the dice's modifiers
		for modifier in &dice.modifiers {
			modifier.apply(&mut rolled);
		}

		Ok(rolled)
	}
}

/// Checks the bounds of a [`Roller::random_int()`] request.
const fn check_range(min: u16, max: u16) -> Result<(), Error> {
	if min > max {
		Err(Error::InvalidRange { min, max })
	} else {
		Ok(())
	}
}

/// Generates cryptographically secure random draws using [rand]'s thread-local generator.
/// Requires the `rand` feature (enabled by default).
///
/// This is the roller to use when results must not be biasable, such as for rolls made on behalf of players.
///
/// # Examples
/// ```
/// use wildroll::dice::{roller::{Roller, Secure as SecureRoller}, Dice};
///
/// let mut roller = SecureRoller::default();
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| (1..=6).contains(&roll.val)));
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[cfg(feature = "rand")]
#[derive(Debug, Clone, Default)]
pub struct Secure(ThreadRng);

#[cfg(feature = "rand")]
impl Secure {
	/// Creates a new secure roller that uses the given thread-local RNG handle to generate draws.
	#[must_use]
	#[inline]
	pub const fn new(rng: ThreadRng) -> Self {
		Self(rng)
	}
}

#[cfg(feature = "rand")]
impl Roller for Secure {
	#[inline]
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error> {
		check_range(min, max)?;
		Ok(self.0.random_range(min..=max))
	}
}

/// Generates draws with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// fastrand is not cryptographically secure, but it can be seeded, which makes it handy for reproducible rolls.
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use wildroll::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let mut roller = FastRandRoller::default();
///
/// let dice = Dice::new(4, 6);
/// let _ = roller.roll(&dice)?;
/// let _ = roller.roll(&dice)?;
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use wildroll::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let dice = Dice::new(4, 6);
/// let first = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// let second = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// assert_eq!(first, second);
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate draws.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate draws.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	#[inline]
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error> {
		check_range(min, max)?;
		Ok(self.0.u16(min..=max))
	}
}

/// Generates draws that always have a specific value, clamped into the requested range.
///
/// # Examples
/// ```
/// use wildroll::dice::{roller::{Roller, Val as ValRoller}, Dice};
///
/// let mut roller = ValRoller(3);
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 3));
///
/// let dice = Dice::new(2, 2);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 2));
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u16);

impl Roller for Val {
	#[inline]
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error> {
		check_range(min, max)?;
		Ok(self.0.clamp(min, max))
	}
}

/// Generates draws that always have their max value.
///
/// # Examples
/// ```
/// use wildroll::dice::{roller::{Max as MaxRoller, Roller}, Dice};
///
/// let mut roller = MaxRoller;
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 6));
///
/// // Every draw explodes, so each die stops at the draw cap
/// let dice = Dice::builder().count(2).sides(20).explode(None, true).build();
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 200));
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	#[inline]
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error> {
		check_range(min, max)?;
		Ok(max)
	}
}

/// Generates draws from an iterator of values, regardless of the range requested. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use wildroll::dice::{roller::{Iter as IterRoller, Roller}, Dice, DieRoll};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3, 4, 10]);
/// let dice = Dice::new(5, 6);
/// assert_eq!(
/// 	roller.roll(&dice)?.rolls,
/// 	vec![DieRoll::new(1), DieRoll::new(2), DieRoll::new(3), DieRoll::new(4), DieRoll::new(10)]
/// );
/// # Ok::<(), wildroll::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u16>>(Peekable<I>);

impl<I: Iterator<Item = u16>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Counts the values still available, consuming the roller.
	#[must_use]
	#[inline]
	pub fn remaining(self) -> usize {
		self.0.count()
	}

	/// Creates a new roller that uses the given iterator to provide draw values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u16>> Roller for Iter<I> {
	/// Draws the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn random_int(&mut self, min: u16, max: u16) -> Result<u16, Error> {
		check_range(min, max)?;
		Ok(self.0.next().expect("iterator is finished"))
	}
}
