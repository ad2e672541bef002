use crate::{codec, Error, ErrorKind, MAX_INT, MAX_TIMESTAMP, ULID_FLAKE_LEN};
use core::{fmt, hash::Hash, marker::PhantomData, str};
use fstr::FStr;

mod sealed {
    pub trait Sealed {}
}

/// Describes how the 20 bits below the timestamp are partitioned.
///
/// This trait is sealed; the only layouts are [`Standard`] and [`Scalable`].
pub trait Layout:
    sealed::Sealed + Copy + Eq + Ord + Hash + Default + fmt::Debug + Send + Sync + 'static
{
    /// Width of the `randomness` field.
    const RANDOMNESS_BITS: u32;

    /// Width of the scalability ID field, placed below `randomness`.
    const SID_BITS: u32;

    /// The maximum value of the `randomness` field.
    const MAX_RANDOMNESS: i64 = (1 << Self::RANDOMNESS_BITS) - 1;

    /// The maximum value of the scalability ID field.
    const MAX_SID: i64 = (1 << Self::SID_BITS) - 1;
}

/// The standard layout: 43-bit timestamp and 20-bit randomness.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Standard;

/// The scalable layout: 43-bit timestamp, 15-bit randomness and 5-bit scalability ID.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Scalable;

impl sealed::Sealed for Standard {}
impl sealed::Sealed for Scalable {}

impl Layout for Standard {
    const RANDOMNESS_BITS: u32 = 20;
    const SID_BITS: u32 = 0;
}

impl Layout for Scalable {
    const RANDOMNESS_BITS: u32 = 15;
    const SID_BITS: u32 = 5;
}

/// Represents a Ulid-Flake ID in the bit layout `L` and provides converters and comparison
/// operators.
///
/// Use the aliases [`UlidFlake`] and [`ScalableUlidFlake`] to name a concrete layout.
///
/// The stored integer is always in `0..=i64::MAX`; every constructor checks the range, so the
/// sign bit is never set.
///
/// # Examples
///
/// ```rust
/// use ulid_flake::UlidFlake;
///
/// let x = "00CMXB6TAK4SA".parse::<UlidFlake>()?;
/// assert_eq!(x.to_string(), "00CMXB6TAK4SA");
///
/// let y = UlidFlake::from_i64(0x0123_4567_89ab_cdef)?;
/// assert_eq!(y.to_i64(), 0x0123_4567_89ab_cdef);
/// # Ok::<(), ulid_flake::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct FlakeId<L> {
    value: i64,
    layout: PhantomData<L>,
}

/// A Ulid-Flake ID in the standard layout.
pub type UlidFlake = FlakeId<Standard>;

/// A Ulid-Flake ID in the scalable layout, carrying a 5-bit scalability ID.
pub type ScalableUlidFlake = FlakeId<Scalable>;

impl<L: Layout> FlakeId<L> {
    /// The smallest ID, `"0000000000000"`.
    pub const MIN: Self = Self::from_i64_unchecked(0);

    /// The largest ID, `"7ZZZZZZZZZZZZ"`.
    pub const MAX: Self = Self::from_i64_unchecked(MAX_INT);

    pub(crate) const fn from_i64_unchecked(value: i64) -> Self {
        Self {
            value,
            layout: PhantomData,
        }
    }

    /// Creates an object from a signed 64-bit integer.
    ///
    /// Returns [`ErrorKind::Overflow`] if the value is negative.
    pub const fn from_i64(int_value: i64) -> Result<Self, Error> {
        if int_value < 0 {
            Err(Error::new(ErrorKind::Overflow))
        } else {
            Ok(Self::from_i64_unchecked(int_value))
        }
    }

    /// Returns the integer representation.
    pub const fn to_i64(self) -> i64 {
        self.value
    }

    /// Creates an object from field values.
    ///
    /// Returns [`ErrorKind::Overflow`] if any argument is out of the value range of the field.
    /// The `sid` must be zero for the standard layout.
    pub const fn from_fields(timestamp: i64, randomness: i64, sid: i64) -> Result<Self, Error> {
        if timestamp < 0
            || timestamp > MAX_TIMESTAMP
            || randomness < 0
            || randomness > L::MAX_RANDOMNESS
            || sid < 0
            || sid > L::MAX_SID
        {
            Err(Error::new(ErrorKind::Overflow))
        } else {
            Ok(Self::from_i64_unchecked(
                (timestamp << 20) | (randomness << L::SID_BITS) | sid,
            ))
        }
    }

    /// Returns the 43-bit `timestamp` field value: milliseconds elapsed since the epoch.
    pub const fn timestamp(&self) -> i64 {
        (self.value >> 20) & MAX_TIMESTAMP
    }

    /// Returns the `randomness` field value (20 bits, or 15 bits in the scalable layout).
    pub const fn randomness(&self) -> i64 {
        (self.value >> L::SID_BITS) & L::MAX_RANDOMNESS
    }

    /// Returns the low 56 bits of the integer as a 7-byte big-endian array.
    ///
    /// The most significant byte is dropped, so the array is not a lossless representation of
    /// IDs whose timestamp reaches 2^36 milliseconds.
    pub const fn to_bytes(self) -> [u8; 7] {
        codec::to_bytes(self.value)
    }

    /// Creates an object from a 13-digit string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid_flake::UlidFlake;
    ///
    /// let x = UlidFlake::try_from_str("00CMXB6TAK4SA")?;
    /// let y = "00CMXB6TAK4SA".parse::<UlidFlake>()?;
    /// assert_eq!(x, y);
    /// # Ok::<(), ulid_flake::Error>(())
    /// ```
    pub const fn try_from_str(str_value: &str) -> Result<Self, Error> {
        if str_value.len() != ULID_FLAKE_LEN {
            return Err(Error::new(ErrorKind::InvalidUlid));
        }

        match codec::decode(str_value) {
            Ok(int_value) if int_value > MAX_INT as u64 => Err(Error::new(ErrorKind::Overflow)),
            Ok(int_value) => Ok(Self::from_i64_unchecked(int_value as i64)),
            Err(err) => Err(err),
        }
    }

    /// Returns the 13-digit string representation stored in a stack-allocated string-like type
    /// that can be handled like [`String`] through common traits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid_flake::UlidFlake;
    ///
    /// let x = UlidFlake::from_i64(i64::MAX)?;
    /// let y = x.encode();
    /// assert_eq!(y, "7ZZZZZZZZZZZZ");
    /// assert_eq!(format!("{}", y), "7ZZZZZZZZZZZZ");
    /// # Ok::<(), ulid_flake::Error>(())
    /// ```
    pub const fn encode(&self) -> FStr<ULID_FLAKE_LEN> {
        codec::encode(self.value)
    }
}

impl FlakeId<Scalable> {
    /// Returns the 5-bit scalability ID of the generator that created this ID.
    pub const fn sid(&self) -> i64 {
        self.value & Scalable::MAX_SID
    }
}

impl<L: Layout> TryFrom<i64> for FlakeId<L> {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i64(value)
    }
}

impl<L: Layout> From<FlakeId<L>> for i64 {
    fn from(object: FlakeId<L>) -> Self {
        object.to_i64()
    }
}

impl<L: Layout> From<FlakeId<L>> for [u8; 7] {
    /// Returns the low 56 bits as a 7-byte big-endian array.
    fn from(object: FlakeId<L>) -> Self {
        object.to_bytes()
    }
}

impl<L: Layout> str::FromStr for FlakeId<L> {
    type Err = Error;

    /// Creates an object from a 13-digit string representation.
    fn from_str(str_value: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(str_value)
    }
}

impl<L: Layout> fmt::Display for FlakeId<L> {
    /// Returns the 13-digit canonical string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid_flake::UlidFlake;
    ///
    /// let x = "00CMXB6TAK4SA".parse::<UlidFlake>()?;
    /// assert_eq!(format!("{}", x), "00CMXB6TAK4SA");
    /// assert_eq!(format!("{:16}", x), "00CMXB6TAK4SA   ");
    /// assert_eq!(format!("{:->16}", x), "---00CMXB6TAK4SA");
    /// # Ok::<(), ulid_flake::Error>(())
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.encode().as_str(), f)
    }
}

impl<L: Layout> fmt::UpperHex for FlakeId<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl<L: Layout> fmt::Binary for FlakeId<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.value, f)
    }
}

#[cfg(feature = "std")]
mod with_std {
    use super::{Error, FlakeId, Layout};

    impl<L: Layout> FlakeId<L> {
        /// Returns the `0x`-prefixed uppercase hexadecimal representation.
        ///
        /// ```rust
        /// let x = ulid_flake::UlidFlake::from_i64(255)?;
        /// assert_eq!(x.to_hex(), "0xFF");
        /// # Ok::<(), ulid_flake::Error>(())
        /// ```
        pub fn to_hex(&self) -> String {
            format!("{:#X}", self.value)
        }

        /// Returns the `0b`-prefixed binary representation.
        pub fn to_bin(&self) -> String {
            format!("{:#b}", self.value)
        }
    }

    impl<L: Layout> TryFrom<String> for FlakeId<L> {
        type Error = Error;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            Self::try_from_str(&value)
        }
    }

    impl<L: Layout> From<FlakeId<L>> for String {
        fn from(object: FlakeId<L>) -> Self {
            object.encode().into()
        }
    }
}


#[cfg(feature = "serde")]
mod with_serde {
    use super::{fmt, str, Layout, UlidFlake};
    use core::marker::PhantomData;
    use serde::{de, Deserializer, Serializer};

    impl<L: Layout> serde::Serialize for FlakeId<L> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_i64(self.value)
            }
        }
    }

    impl<'de, L: Layout> serde::Deserialize<'de> for FlakeId<L> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl(PhantomData))
            } else {
                deserializer.deserialize_i64(VisitorImpl(PhantomData))
            }
        }
    }

    struct VisitorImpl<L>(PhantomData<L>);

    impl<L: Layout> de::Visitor<'_> for VisitorImpl<L> {
        type Value = FlakeId<L>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a Ulid-Flake representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::try_from_str(value).map_err(de::Error::custom)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Self::Value::from_i64(value).map_err(de::Error::custom)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            match i64::try_from(value) {
                Ok(int_value) => self.visit_i64(int_value),
                Err(err) => Err(de::Error::custom(err)),
            }
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            match str::from_utf8(value) {
                Ok(str_value) => self.visit_str(str_value),
                Err(err) => Err(de::Error::custom(err)),
            }
        }
    }

}
