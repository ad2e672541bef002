use crate::{ConfigBuilder, Error, Layout, Scalable, ScalableUlidFlake, Standard, UlidFlake};
use std::sync::{Mutex, OnceLock, PoisonError};

#[cfg(unix)]
type GlobalGen<L> = unix_fork_safety::ProcessLocalGenerator<L>;

#[cfg(not(unix))]
type GlobalGen<L> = crate::Generator<L>;

static STANDARD: OnceLock<GlobalGen<Standard>> = OnceLock::new();
static SCALABLE: OnceLock<GlobalGen<Scalable>> = OnceLock::new();

/// Serializes [`configure`] calls so that both global generators end up with the same settings.
static CONFIGURE_LOCK: Mutex<()> = Mutex::new(());

fn get_or_init<L: Layout>(cell: &'static OnceLock<GlobalGen<L>>) -> &'static GlobalGen<L> {
    cell.get_or_init(|| {
        #[cfg(feature = "log")]
        log::debug!(
            "ulid-flake: initialized global generator ({}-bit randomness)",
            L::RANDOMNESS_BITS
        );
        Default::default()
    })
}

/// Generates a new Ulid-Flake ID object using the global generator.
///
/// This function is thread-safe; multiple threads in a process can call it concurrently without
/// breaking the monotonic order of generated IDs. On Unix, this function reseeds the random
/// number generator when the process ID changes (i.e., upon forks) so that forked processes do
/// not draw the same random sequence.
///
/// Returns an error on the same conditions as
/// [`Generator::generate`](crate::Generator::generate); notably
/// [`ErrorKind::Overflow`](crate::ErrorKind::Overflow) when the randomness of the current
/// millisecond is exhausted, in which case the caller may simply retry.
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new() -> Result<UlidFlake, Error> {
    get_or_init(&STANDARD).generate()
}

/// Generates a new Ulid-Flake ID encoded in the 13-digit canonical string representation using
/// the global generator.
///
/// # Examples
///
/// ```rust
/// let x = ulid_flake::new_string()?; // e.g., "00CMXB6TAK4SA"
///
/// assert!(regex::Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Z]{12}$").unwrap().is_match(&x));
/// # Ok::<(), ulid_flake::Error>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new_string() -> Result<String, Error> {
    new().map(String::from)
}

/// Generates a new scalable Ulid-Flake ID object embedding the globally configured SID.
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new_scalable() -> Result<ScalableUlidFlake, Error> {
    get_or_init(&SCALABLE).generate()
}

/// Generates a new scalable Ulid-Flake ID encoded in the canonical string representation.
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new_scalable_string() -> Result<String, Error> {
    new_scalable().map(String::from)
}

/// Creates a Ulid-Flake ID object from a Unix timestamp in seconds using the global
/// configuration. See
/// [`Generator::from_unix_time`](crate::Generator::from_unix_time).
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn from_unix_time(unix_secs: i64) -> Result<UlidFlake, Error> {
    get_or_init(&STANDARD).from_unix_time(unix_secs)
}

/// Creates a scalable Ulid-Flake ID object from a Unix timestamp in seconds using the global
/// configuration.
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn scalable_from_unix_time(unix_secs: i64) -> Result<ScalableUlidFlake, Error> {
    get_or_init(&SCALABLE).from_unix_time(unix_secs)
}

/// Validates a configuration draft and applies it to both global generators.
///
/// On failure, neither global generator is changed.
///
/// # Examples
///
/// ```rust
/// use ulid_flake::{Config, ErrorKind};
///
/// let err = ulid_flake::configure(Config::builder().entropy_size(4)).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidEntropy);
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn configure(builder: ConfigBuilder) -> Result<(), Error> {
    let config = builder.build()?;
    let _guard = CONFIGURE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    get_or_init(&STANDARD).set_config(config);
    get_or_init(&SCALABLE).set_config(config);
    Ok(())
}

#[cfg(unix)]
mod unix_fork_safety {
    use crate::{DefaultRng, Error, FlakeId, Generator, Layout};
    use std::ops::Deref;
    use std::process;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A thin wrapper to reseed the random number generator when the process ID changes (i.e.,
    /// upon process forks).
    #[derive(Debug)]
    pub struct ProcessLocalGenerator<L> {
        gen: Generator<L>,
        pid: AtomicU32,
    }

    impl<L: Layout> Default for ProcessLocalGenerator<L> {
        fn default() -> Self {
            Self {
                gen: Default::default(),
                pid: AtomicU32::new(process::id()),
            }
        }
    }

    impl<L: Layout> ProcessLocalGenerator<L> {
        pub fn generate(&self) -> Result<FlakeId<L>, Error> {
            self.check_pid()?;
            self.gen.generate()
        }

        pub fn from_unix_time(&self, unix_secs: i64) -> Result<FlakeId<L>, Error> {
            self.check_pid()?;
            self.gen.from_unix_time(unix_secs)
        }

        fn check_pid(&self) -> Result<(), Error> {
            let pid = process::id();
            let prev = self.pid.load(Ordering::Acquire);
            if prev != pid {
                self.gen.replace_rng(DefaultRng::try_new()?);
                self.pid.store(pid, Ordering::Release);
            }
            Ok(())
        }
    }

    impl<L> Deref for ProcessLocalGenerator<L> {
        type Target = Generator<L>;

        fn deref(&self) -> &Self::Target {
            &self.gen
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, ErrorKind};

    /// Generates no IDs sharing same timestamp and randomness under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_randomness_under_multithreading() {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::spawn(move || {
                let mut n_sent = 0;
                while n_sent < 10000 {
                    if let Ok(e) = super::new() {
                        tx.send(e).unwrap();
                        n_sent += 1;
                    }
                }
            });
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert((e.timestamp(), e.randomness()));
        }

        assert_eq!(s.len(), 4 * 10000);
    }

    /// Generates scalable IDs and canonical strings
    #[test]
    fn generates_scalable_ids_and_canonical_strings() {
        let e = loop {
            if let Ok(e) = super::new_scalable() {
                break e;
            }
        };
        assert_eq!(e.sid(), 0);

        let s = loop {
            if let Ok(s) = super::new_scalable_string() {
                break s;
            }
        };
        assert_eq!(s.len(), 13);
        assert!(s.parse::<crate::ScalableUlidFlake>().is_ok());
    }

    /// Creates IDs from Unix time with the default epoch
    #[test]
    fn creates_ids_from_unix_time_with_the_default_epoch() {
        let e = super::from_unix_time(crate::DEFAULT_EPOCH_SECS as i64 + 60).unwrap();
        assert_eq!(e.timestamp(), 60_000);

        let e = super::scalable_from_unix_time(crate::DEFAULT_EPOCH_SECS as i64).unwrap();
        assert_eq!(e.timestamp(), 0);
        assert_eq!(e.sid(), 0);

        let err = super::from_unix_time(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    /// Keeps the global configuration if validation fails
    #[test]
    fn keeps_the_global_configuration_if_validation_fails() {
        let err = super::configure(Config::builder().sid(32)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(super::get_or_init(&super::STANDARD).config(), Config::default());
        assert_eq!(super::get_or_init(&super::SCALABLE).config(), Config::default());

        // re-applying the defaults keeps parallel tests unaffected
        super::configure(Config::builder()).unwrap();
        assert_eq!(super::get_or_init(&super::SCALABLE).config(), Config::default());
    }
}
