//! Results directory naming
//!
//! Mirrors gcloud's `_GenerateUniqueGcsObjectName` so results land where a
//! plain `gcloud firebase test android run` would put them.
//! Example: `2017-07-12_11:36:12.467586_XVlB`

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Generate a unique object name from the local clock
pub fn generate() -> String {
    object_name(Local::now(), &mut rand::rng())
}

/// Build an object name for `time` with a random suffix drawn from `rng`
pub fn object_name<Tz, R>(time: DateTime<Tz>, rng: &mut R) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    R: Rng,
{
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect();

    format!("{}_{}", time.format("%Y-%m-%d_%H:%M:%S%.6f"), suffix)
}
