//! Ulid-Flake generator and related items.

use crate::{
    Config, ConfigBuilder, Error, ErrorKind, FlakeId, Layout, Standard, MAX_ENTROPY_SIZE,
    MAX_TIMESTAMP,
};
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::time::SystemTime;

#[cfg(feature = "default_rng")]
mod default_rng;

pub mod with_rand09;


/// The number of draws attempted for a non-zero entropy increment before giving up.
pub const MAX_ENTROPY_ATTEMPTS: usize = 16;

/// Represents a Ulid-Flake ID generator that encapsulates the monotonic sequence state and
/// guarantees that the IDs it generates are strictly increasing.
///
/// The generator owns two independent locks: a [`Mutex`] around the last emitted timestamp and
/// randomness, and a [`RwLock`] around the active [`Config`]. A generator can therefore be shared
/// between threads by reference or through an [`Arc`](std::sync::Arc); concurrent calls to
/// [`generate`](Generator::generate) are serialized.
///
/// Within the same millisecond, the generator adds a random positive increment of
/// [`Config::entropy_size`] bytes to the previous randomness. When the increment no longer fits
/// in the `randomness` field, or when the clock goes backwards, generation fails instead of
/// breaking the order of IDs; retrying is left to the caller.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "default_rng")]
/// # {
/// use ulid_flake::{Generator, Scalable};
///
/// let g = Generator::<Scalable>::new();
/// g.configure(ulid_flake::Config::builder().sid(3))?;
///
/// let x = g.generate()?;
/// assert_eq!(x.sid(), 3);
/// # }
/// # Ok::<(), ulid_flake::Error>(())
/// ```
///
/// # Generic parameters
///
/// - `L`: the bit [`Layout`] of generated IDs, [`Standard`] or [`Scalable`](crate::Scalable).
/// - `R`: the random number source, [`DefaultRng`] by default.
/// - `T`: the clock, [`StdSystemTime`] by default.
#[cfg(feature = "default_rng")]
#[derive(Debug)]
pub struct Generator<L = Standard, R = DefaultRng, T = StdSystemTime> {
    config: RwLock<Config>,
    state: Mutex<State<R>>,
    time_source: T,
    layout: PhantomData<L>,
}

/// Represents a Ulid-Flake ID generator that encapsulates the monotonic sequence state and
/// guarantees that the IDs it generates are strictly increasing.
#[cfg(not(feature = "default_rng"))]
#[derive(Debug)]
pub struct Generator<L, R, T = StdSystemTime> {
    config: RwLock<Config>,
    state: Mutex<State<R>>,
    time_source: T,
    layout: PhantomData<L>,
}

/// The last emitted field values, together with the random source they were drawn from.
#[derive(Debug)]
struct State<R> {
    timestamp: i64,
    randomness: i64,
    rng: R,
}

impl<L: Layout, R: RandSource> Generator<L, R> {
    /// Creates a generator object with a specified random number generator and the system
    /// clock. The random number generator should be cryptographically strong and securely
    /// seeded.
    pub fn with_rng(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<L: Layout, R: RandSource, T: TimeSource> Generator<L, R, T> {
    /// Creates a generator object with specified random number generator and clock.
    ///
    /// The generator starts with the default [`Config`] and a zeroed sequence state.
    pub fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            config: RwLock::new(Config::default()),
            state: Mutex::new(State {
                timestamp: 0,
                randomness: 0,
                rng,
            }),
            time_source,
            layout: PhantomData,
        }
    }

    /// Replaces the configuration of a generator under construction.
    ///
    /// ```rust
    /// # #[cfg(feature = "default_rng")]
    /// # {
    /// use ulid_flake::{Config, Generator, Standard};
    ///
    /// let config = Config::builder().entropy_size(2).build()?;
    /// let g = Generator::<Standard>::new().with_config(config);
    /// assert_eq!(g.config().entropy_size(), 2);
    /// # }
    /// # Ok::<(), ulid_flake::Error>(())
    /// ```
    pub fn with_config(mut self, config: Config) -> Self {
        *self
            .config
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = config;
        self
    }

    /// Returns a copy of the active configuration.
    pub fn config(&self) -> Config {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a new configuration. Calls to [`generate`](Generator::generate) that start
    /// afterwards observe all of its values at once.
    pub fn set_config(&self, config: Config) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;

        #[cfg(feature = "log")]
        log::debug!("ulid-flake: applied configuration {:?}", config);
    }

    /// Validates a configuration draft and publishes it.
    ///
    /// On failure, the active configuration remains unchanged.
    pub fn configure(&self, builder: ConfigBuilder) -> Result<(), Error> {
        self.set_config(builder.build()?);
        Ok(())
    }

    /// Generates a new Ulid-Flake ID object from the current time.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidTimestamp`] if the clock reads earlier than the epoch or than the
    ///   last generated ID.
    /// - [`ErrorKind::Overflow`] if the timestamp exceeds 43 bits, or if the randomness of the
    ///   current millisecond is exhausted.
    /// - [`ErrorKind::RandSource`] if the random number source fails.
    ///
    /// The sequence state is left untouched on every error.
    pub fn generate(&self) -> Result<FlakeId<L>, Error> {
        self.generate_with(|| self.time_source.now())
    }

    /// Generates a new Ulid-Flake ID object from the time specified, as if the clock read
    /// `time`.
    ///
    /// This method shares the sequence state with [`generate`](Generator::generate) and applies
    /// the same rules.
    pub fn generate_at(&self, time: SystemTime) -> Result<FlakeId<L>, Error> {
        self.generate_with(|| time)
    }

    /// Generates a new Ulid-Flake ID encoded in the 13-digit canonical string representation.
    pub fn generate_string(&self) -> Result<String, Error> {
        self.generate().map(String::from)
    }

    fn generate_with(&self, now: impl FnOnce() -> SystemTime) -> Result<FlakeId<L>, Error> {
        let config = self.config();

        // the clock is read under the lock so that concurrent callers see ordered timestamps
        let mut state = self.lock_state();
        let timestamp = config.timestamp_at(now())?;

        let randomness = match timestamp.cmp(&state.timestamp) {
            Ordering::Less => {
                #[cfg(feature = "log")]
                log::warn!(
                    "ulid-flake: clock moved backwards by {} ms",
                    state.timestamp - timestamp
                );
                return Err(Error::new(ErrorKind::InvalidTimestamp));
            }
            Ordering::Equal => {
                let entropy = draw_entropy(&mut state.rng, config.entropy_size())?;
                let randomness = state.randomness + entropy;
                if randomness > L::MAX_RANDOMNESS {
                    #[cfg(feature = "log")]
                    log::warn!("ulid-flake: randomness exhausted at timestamp {}", timestamp);
                    return Err(Error::new(ErrorKind::Overflow));
                }
                randomness
            }
            Ordering::Greater => draw_randomness::<L>(&mut state.rng)?,
        };

        let id = FlakeId::from_fields(timestamp, randomness, sid_of::<L>(&config))?;
        state.timestamp = timestamp;
        state.randomness = randomness;
        Ok(id)
    }

    /// Creates a Ulid-Flake ID object from a Unix timestamp in seconds, measured against the
    /// active epoch.
    ///
    /// The randomness is drawn afresh and the sequence state is neither consulted nor updated,
    /// so the result is not ordered relative to IDs from [`generate`](Generator::generate).
    ///
    /// Returns [`ErrorKind::Overflow`] if the time is before the epoch or too far after it.
    pub fn from_unix_time(&self, unix_secs: i64) -> Result<FlakeId<L>, Error> {
        let config = self.config();
        let timestamp =
            (i128::from(unix_secs) * 1_000_000_000 - config.epoch_nanos()).div_euclid(1_000_000);
        if !(0..=i128::from(MAX_TIMESTAMP)).contains(&timestamp) {
            return Err(Error::new(ErrorKind::Overflow));
        }

        let randomness = draw_randomness::<L>(&mut self.lock_state().rng)?;
        FlakeId::from_fields(timestamp as i64, randomness, sid_of::<L>(&config))
    }

    /// Replaces the random number source while preserving the sequence state.
    pub(crate) fn replace_rng(&self, rng: R) {
        self.lock_state().rng = rng;
    }

    fn lock_state(&self) -> MutexGuard<'_, State<R>> {
        // the state is only written after every fallible step, so it stays consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the SID to embed, or zero for layouts without an SID field.
const fn sid_of<L: Layout>(config: &Config) -> i64 {
    if L::SID_BITS == 0 {
        0
    } else {
        config.sid()
    }
}

/// Draws a fresh value for the whole `randomness` field from 3 random bytes.
fn draw_randomness<L: Layout>(rng: &mut impl RandSource) -> Result<i64, Error> {
    let mut buf = [0u8; 3];
    rng.try_fill_bytes(&mut buf)?;
    Ok(i64::from(u32::from_be_bytes([0, buf[0], buf[1], buf[2]])) & L::MAX_RANDOMNESS)
}

/// Draws a strictly positive big-endian increment of `size` bytes.
fn draw_entropy(rng: &mut impl RandSource, size: usize) -> Result<i64, Error> {
    let mut buf = [0u8; MAX_ENTROPY_SIZE];
    let buf = &mut buf[..size.min(MAX_ENTROPY_SIZE)];
    for _ in 0..MAX_ENTROPY_ATTEMPTS {
        rng.try_fill_bytes(buf)?;
        let entropy = buf.iter().fold(0i64, |acc, &b| (acc << 8) | i64::from(b));
        if entropy > 0 {
            return Ok(entropy);
        }
    }
    Err(Error::new(ErrorKind::RandSource))
}

/// A trait that defines the minimum random number generator interface for [`Generator`].
pub trait RandSource {
    /// Fills `dest` with random bytes.
    ///
    /// Implementations should report a failure of the underlying source instead of returning
    /// predictable bytes; an [`Error`] can be created from [`ErrorKind::RandSource`].
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error>;
}

/// A trait that defines the minimum system clock interface for [`Generator`].
pub trait TimeSource {
    /// Returns the current absolute time.
    fn now(&self) -> SystemTime;
}

/// The default random number generator used by [`Generator`].
///
/// Currently, `DefaultRng` uses [`ChaCha12Core`] that is initially seeded and subsequently
/// reseeded by [`OsRng`] every 64 kiB of random data using the [`ReseedingRng`] wrapper. It is
/// the same strategy employed by [`ThreadRng`] of the `rand` crate, though the details are
/// subject to change.
///
/// [`ChaCha12Core`]: https://docs.rs/rand_chacha/0.9/rand_chacha/struct.ChaCha12Core.html
/// [`OsRng`]: https://docs.rs/rand/0.9/rand/rngs/struct.OsRng.html
/// [`ReseedingRng`]: https://docs.rs/rand/0.9/rand/rngs/struct.ReseedingRng.html
/// [`ThreadRng`]: https://docs.rs/rand/0.9/rand/rngs/struct.ThreadRng.html
#[cfg(feature = "default_rng")]
#[cfg_attr(docsrs, doc(cfg(feature = "default_rng")))]
pub struct DefaultRng {
    inner: rand09::rngs::ReseedingRng<rand_chacha::ChaCha12Core, rand09::rngs::OsRng>,
}

/// The default [`TimeSource`] that uses [`SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
