use core::{error, fmt};

/// An error produced while generating, converting or configuring Ulid-Flake IDs.
///
/// Use [`Error::kind`] to find out which of the failure conditions occurred.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of [`Error`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A timestamp, randomness, SID or integer value is outside of the range of its field, or the
    /// randomness was exhausted within one millisecond.
    Overflow,
    /// The clock moved backwards relative to the last generated ID, or precedes the epoch.
    InvalidTimestamp,
    /// The string representation has a wrong length or contains an illegal character.
    InvalidUlid,
    /// A configuration option is out of its allowed range.
    InvalidConfig,
    /// The entropy increment size is not between 1 and 3 bytes.
    InvalidEntropy,
    /// The random number source failed to provide random bytes.
    RandSource,
}

impl Error {
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            ErrorKind::Overflow => "overflow error",
            ErrorKind::InvalidTimestamp => "invalid timestamp",
            ErrorKind::InvalidUlid => "invalid ULID",
            ErrorKind::InvalidConfig => "invalid configuration",
            ErrorKind::InvalidEntropy => "entropy size must be between 1 and 3",
            ErrorKind::RandSource => "random source failure",
        })
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    /// Exposes the kind it was created from
    #[test]
    fn exposes_the_kind_it_was_created_from() {
        let e = Error::from(ErrorKind::InvalidEntropy);
        assert_eq!(e.kind(), ErrorKind::InvalidEntropy);
        assert_eq!(e, Error::new(ErrorKind::InvalidEntropy));
    }

    /// Displays a human-readable message
    #[cfg(feature = "std")]
    #[test]
    fn displays_a_human_readable_message() {
        assert_eq!(Error::new(ErrorKind::Overflow).to_string(), "overflow error");
        assert_eq!(Error::new(ErrorKind::InvalidUlid).to_string(), "invalid ULID");
        assert_eq!(
            Error::new(ErrorKind::InvalidEntropy).to_string(),
            "entropy size must be between 1 and 3"
        );
    }
}
