//! # Ulid-Flake: 64-bit sortable, monotonic and scalable unique identifier
//!
//! Ulid-Flake is a compact identifier in the Snowflake/ULID family. It packs a 43-bit
//! millisecond timestamp and a random part into a positive signed 64-bit integer, so that the
//! integer, its big-endian bytes and its 13-character Crockford Base32 string all sort the same
//! way.
//!
//! ```text
//! Standard:  0 | timestamp (43 bits) | randomness (20 bits)
//! Scalable:  0 | timestamp (43 bits) | randomness (15 bits) | sid (5 bits)
//! ```
//!
//! A generator keeps the last emitted timestamp and randomness. Within the same millisecond it
//! adds a strictly positive random increment to the previous randomness, so IDs from one
//! generator are strictly increasing. The scalable layout embeds a scalability ID (SID) that
//! distinguishes up to 32 independent generators without any coordination.
//!
//! ```rust
//! # #[cfg(feature = "global_gen")]
//! # {
//! let x = ulid_flake::new()?;
//! println!("{}", x); // e.g., "00CMXB6TAK4SA"
//!
//! let y = x.to_string().parse::<ulid_flake::UlidFlake>()?;
//! assert_eq!(x, y);
//! # }
//! # Ok::<(), ulid_flake::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen` (implies `default_rng`) provides the process-wide default generators and the
//!   [`new()`] family of functions.
//!
//! Optional features:
//!
//! - `std` enables [`Generator`], [`Config`] and the system clock.
//! - `default_rng` enables the default random number generator, [`DefaultRng`].
//! - `rand09` enables an adapter for `rand::RngCore` to use `rand` (v0.9) and any other
//!   conforming random number generators with [`Generator`].
//! - `serde` enables serialization/deserialization of [`UlidFlake`] via serde.
//! - `log` emits diagnostic messages through the `log` facade.
//! - `cli` builds the `ulid-flake` command-line tool.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
mod error;
mod id;
pub use error::{Error, ErrorKind};
pub use id::{FlakeId, Layout, Scalable, ScalableUlidFlake, Standard, UlidFlake};

#[cfg(feature = "std")]
mod config;
#[cfg(feature = "std")]
pub use config::{Config, ConfigBuilder};

#[cfg(feature = "std")]
pub mod generator;
#[cfg(feature = "std")]
pub use generator::Generator;

#[cfg(feature = "default_rng")]
pub use generator::DefaultRng;

#[cfg(feature = "global_gen")]
mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{
    configure, from_unix_time, new, new_scalable, new_scalable_string, new_string,
    scalable_from_unix_time,
};

/// Number of usable bits: a signed 64-bit integer without the sign bit.
pub const INT_BITS: u32 = 63;

/// The minimum integer value of Ulid-Flake.
pub const MIN_INT: i64 = 0;

/// The maximum integer value of Ulid-Flake (`2^63 - 1`).
pub const MAX_INT: i64 = i64::MAX;

/// Width of the `timestamp` field.
pub const TIMESTAMP_BITS: u32 = 43;

/// The maximum value of the 43-bit `timestamp` field.
pub const MAX_TIMESTAMP: i64 = (1 << TIMESTAMP_BITS) - 1;

/// The maximum value of the 20-bit `randomness` field of the standard layout.
pub const MAX_RANDOMNESS: i64 = (1 << 20) - 1;

/// The maximum value of the 15-bit `randomness` field of the scalable layout.
pub const MAX_SCALABLE_RANDOMNESS: i64 = (1 << 15) - 1;

/// The maximum value of the 5-bit scalability ID.
pub const MAX_SID: i64 = (1 << 5) - 1;

/// The minimum entropy increment size in bytes.
pub const MIN_ENTROPY_SIZE: usize = 1;

/// The maximum entropy increment size in bytes.
pub const MAX_ENTROPY_SIZE: usize = 3;

/// Length of the canonical string representation.
pub const ULID_FLAKE_LEN: usize = 13;

/// The string representation of the smallest Ulid-Flake.
pub const MIN_ULID_FLAKE: &str = "0000000000000";

/// The string representation of the largest Ulid-Flake.
pub const MAX_ULID_FLAKE: &str = "7ZZZZZZZZZZZZ";

/// Unix time in seconds as at 2024-01-01 00:00:00+00:00, the default epoch.
pub const DEFAULT_EPOCH_SECS: u64 = 1_704_067_200;
