use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::consts::{KIB, MIB};

/// Returned when a token can't be decoded into a [`WorkingSetSize`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid working set size '{0}'")]
pub struct ParseSizeError(pub String);

/// Number of bytes touched by one run of the benchmark.
///
/// Decoded from tokens like `512`, `128k` or `4m` where `k` and `m` scale by powers of 1024.
/// Only lowercase suffixes are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkingSetSize(u64);

impl WorkingSetSize {
    /// Wraps a byte count, `None` for zero
    pub fn from_bytes(bytes: u64) -> Option<Self> {
        (bytes > 0).then_some(Self(bytes))
    }

    /// Rebuilds the size from its position on the log2 axis, rounding to the closest byte
    pub fn from_log2(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value >= 64.0 {
            return None;
        }
        Self::from_bytes(value.exp2().round() as u64)
    }

    pub fn bytes(&self) -> u64 {
        self.0
    }

    /// Coordinate on the working set axis
    pub fn log2(&self) -> f64 {
        (self.0 as f64).log2()
    }

    /// Human readable tick label.
    ///
    /// Reverses the suffix scaling of the input format: anything below 1 MiB is shown in
    /// `k`, the rest in `m`. Sizes below 1 KiB are shown as plain bytes, since integer
    /// division would turn every one of them into `0k` and their ticks would be
    /// indistinguishable.
    pub fn label(&self) -> String {
        if self.0 < KIB {
            format!("{}", self.0)
        } else if self.0 < MIB {
            format!("{}k", self.0 / KIB)
        } else {
            format!("{}m", self.0 / MIB)
        }
    }
}

impl FromStr for WorkingSetSize {
    type Err = ParseSizeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSizeError(token.to_string());

        let (digits, scale) = if let Some(digits) = token.strip_suffix('k') {
            (digits, KIB)
        } else if let Some(digits) = token.strip_suffix('m') {
            (digits, MIB)
        } else {
            (token, 1)
        };

        // u64::from_str would also accept a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        digits
            .parse::<u64>()
            .ok()
            .and_then(|value| value.checked_mul(scale))
            .and_then(Self::from_bytes)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for WorkingSetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
