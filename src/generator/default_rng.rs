use std::fmt;

use rand09::{rngs::OsRng, rngs::ReseedingRng, RngCore as _};

use super::{DefaultRng, RandSource};
use crate::{Error, ErrorKind};

impl RandSource for DefaultRng {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.inner.fill_bytes(dest);
        Ok(())
    }
}

impl Default for DefaultRng {
    /// Creates an instance of the default random number generator.
    ///
    /// # Panics
    ///
    /// Panics in the highly unlikely event where the operating system's random number generator
    /// failed to provide secure entropy. Use [`DefaultRng::try_new`] to handle the failure.
    fn default() -> Self {
        Self::try_new().expect("could not initialize DefaultRng")
    }
}

impl fmt::Debug for DefaultRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRng").finish_non_exhaustive()
    }
}

impl DefaultRng {
    /// Creates an instance of the default random number generator, returning
    /// [`ErrorKind::RandSource`] if the operating system could not seed it.
    pub fn try_new() -> Result<Self, Error> {
        ReseedingRng::new(1024 * 64, OsRng)
            .map(|inner| Self { inner })
            .map_err(|_| Error::new(ErrorKind::RandSource))
    }
}

impl<L: crate::Layout> super::Generator<L> {
    /// Creates a generator object with the default random number generator and the system
    /// clock.
    ///
    /// # Panics
    ///
    /// Panics if the default random number generator could not be seeded. Use
    /// [`Generator::try_new`](super::Generator::try_new) to handle the failure.
    pub fn new() -> Self {
        Self::with_rng(DefaultRng::default())
    }

    /// Creates a generator object with the default random number generator and the system
    /// clock, returning an error if the random number generator could not be seeded.
    pub fn try_new() -> Result<Self, Error> {
        DefaultRng::try_new().map(Self::with_rng)
    }
}

impl<L: crate::Layout> Default for super::Generator<L> {
    fn default() -> Self {
        Self::new()
    }
}
