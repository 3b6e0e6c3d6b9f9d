//! Wall-clock instants as whole Unix seconds.
//!
//! Every duration in the engine (effect duration, tick interval, cooldowns)
//! is expressed in seconds, so instants are stored at the same resolution.

use core::fmt;

/// A point in time, in whole seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero when
    /// `earlier` lies in the future.
    pub const fn elapsed_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[must_use]
    pub const fn plus(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_for_future_instants() {
        let now = Timestamp::from_secs(100);
        assert_eq!(now.elapsed_since(Timestamp::from_secs(40)), 60);
        assert_eq!(now.elapsed_since(Timestamp::from_secs(140)), 0);
    }
}
