use crate::{Error, ErrorKind, DEFAULT_EPOCH_SECS, MAX_ENTROPY_SIZE, MAX_SID, MIN_ENTROPY_SIZE};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A validated set of generator options.
///
/// A `Config` can only be obtained from [`Config::default`] or a successful
/// [`ConfigBuilder::build`], so every instance satisfies the range rules of each option.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Config {
    epoch: SystemTime,
    entropy_size: u8,
    sid: u8,
}

impl Default for Config {
    /// Returns the default configuration: epoch at 2024-01-01 00:00:00+00:00, a 1-byte entropy
    /// increment and scalability ID `0`.
    fn default() -> Self {
        Self {
            epoch: UNIX_EPOCH + Duration::from_secs(DEFAULT_EPOCH_SECS),
            entropy_size: MIN_ENTROPY_SIZE as u8,
            sid: 0,
        }
    }
}

impl Config {
    /// Returns a builder that starts from the default values.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns the time origin from which timestamps are measured.
    pub const fn epoch(&self) -> SystemTime {
        self.epoch
    }

    /// Returns the size in bytes of the random increment used within the same millisecond.
    pub const fn entropy_size(&self) -> usize {
        self.entropy_size as usize
    }

    /// Returns the scalability ID embedded by scalable generators.
    pub const fn sid(&self) -> i64 {
        self.sid as i64
    }

    /// Converts an absolute time into milliseconds elapsed since the epoch.
    ///
    /// Returns [`ErrorKind::InvalidTimestamp`] if `time` precedes the epoch and
    /// [`ErrorKind::Overflow`] if the result does not fit in the 43-bit `timestamp` field.
    pub fn timestamp_at(&self, time: SystemTime) -> Result<i64, Error> {
        let elapsed = time
            .duration_since(self.epoch)
            .map_err(|_| Error::new(ErrorKind::InvalidTimestamp))?;
        match i64::try_from(elapsed.as_millis()) {
            Ok(timestamp) if timestamp <= crate::MAX_TIMESTAMP => Ok(timestamp),
            _ => Err(Error::new(ErrorKind::Overflow)),
        }
    }

    /// Returns the epoch as signed milliseconds relative to the Unix epoch, rounded down.
    pub fn epoch_millis(&self) -> i128 {
        self.epoch_nanos().div_euclid(1_000_000)
    }

    /// Returns the epoch as signed nanoseconds relative to the Unix epoch.
    pub(crate) fn epoch_nanos(&self) -> i128 {
        match self.epoch.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_nanos() as i128,
            Err(err) => -(err.duration().as_nanos() as i128),
        }
    }
}

/// A draft of [`Config`] whose options are validated together by [`ConfigBuilder::build`].
///
/// Options left unset keep their default values, not the values of a previously active
/// configuration.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use ulid_flake::{Config, ErrorKind};
///
/// let config = Config::builder()
///     .epoch(UNIX_EPOCH + Duration::from_secs(1_735_689_600))
///     .entropy_size(2)
///     .sid(7)
///     .build()?;
/// assert_eq!(config.entropy_size(), 2);
///
/// let err = Config::builder().sid(32).build().unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidConfig);
/// # Ok::<(), ulid_flake::Error>(())
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ConfigBuilder {
    epoch: SystemTime,
    entropy_size: i32,
    sid: i32,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            epoch: config.epoch,
            entropy_size: config.entropy_size as i32,
            sid: config.sid as i32,
        }
    }
}

impl ConfigBuilder {
    /// Sets the time origin. Any instant is accepted; an epoch far from the current time is
    /// reported by the generator as an invalid or overflowing timestamp.
    pub fn epoch(mut self, epoch: SystemTime) -> Self {
        self.epoch = epoch;
        self
    }

    /// Sets the entropy increment size in bytes, from 1 to 3.
    pub fn entropy_size(mut self, entropy_size: i32) -> Self {
        self.entropy_size = entropy_size;
        self
    }

    /// Sets the scalability ID, from 0 to 31.
    pub fn sid(mut self, sid: i32) -> Self {
        self.sid = sid;
        self
    }

    /// Validates every option and returns the finished configuration.
    ///
    /// Returns [`ErrorKind::InvalidEntropy`] if the entropy size is not between 1 and 3, and
    /// [`ErrorKind::InvalidConfig`] if the scalability ID is not between 0 and 31.
    pub fn build(self) -> Result<Config, Error> {
        let entropy_size = match usize::try_from(self.entropy_size) {
            Ok(n) if (MIN_ENTROPY_SIZE..=MAX_ENTROPY_SIZE).contains(&n) => n as u8,
            _ => return Err(Error::new(ErrorKind::InvalidEntropy)),
        };
        let sid = match u8::try_from(self.sid) {
            Ok(n) if i64::from(n) <= MAX_SID => n,
            _ => return Err(Error::new(ErrorKind::InvalidConfig)),
        };
        Ok(Config {
            epoch: self.epoch,
            entropy_size,
            sid,
        })
    }
}
