//! Seed resolution for the sampler's random source.
//!
//! Seeds come from the caller when provided, otherwise from the operating
//! system's entropy source. If that source is unavailable the wall clock is
//! mixed through SplitMix64 instead.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{RngCore, SeedableRng, rngs::OsRng, rngs::SmallRng};
use tracing::warn;

/// SplitMix64 increment (the 64-bit golden ratio).
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Where a [`ResolvedSeed`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedOrigin {
    /// Supplied by the caller.
    Explicit,
    /// Read from the operating system's entropy source.
    Entropy,
    /// Derived from the system clock after the entropy source failed.
    Clock,
}

impl SeedOrigin {
    /// Stable lowercase label used in logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Entropy => "entropy",
            Self::Clock => "clock",
        }
    }
}

/// A concrete seed and its provenance.
///
/// # Examples
/// ```
/// use randdot_core::{SeedOrigin, resolve_seed};
///
/// let seed = resolve_seed(Some(42));
/// assert_eq!(seed.value(), 42);
/// assert_eq!(seed.origin(), SeedOrigin::Explicit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedSeed {
    value: u64,
    origin: SeedOrigin,
}

impl ResolvedSeed {
    /// Seed value fed to the generator.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Source of the seed value.
    #[must_use]
    pub const fn origin(&self) -> SeedOrigin {
        self.origin
    }

    /// Builds the sampler's random source from this seed.
    #[must_use]
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.value)
    }
}

/// Resolves `requested` into a concrete seed.
#[must_use]
pub fn resolve_seed(requested: Option<u64>) -> ResolvedSeed {
    if let Some(value) = requested {
        return ResolvedSeed {
            value,
            origin: SeedOrigin::Explicit,
        };
    }

    let mut bytes = [0_u8; 8];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => ResolvedSeed {
            value: u64::from_le_bytes(bytes),
            origin: SeedOrigin::Entropy,
        },
        Err(error) => {
            warn!(error = %error, "entropy source unavailable; seeding from the clock");
            ResolvedSeed {
                value: clock_seed(),
                origin: SeedOrigin::Clock,
            }
        }
    }
}

fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    // u64 nanoseconds wrap in 2554; fold the high half in.
    let low = u64::try_from(nanos & u128::from(u64::MAX)).unwrap_or_default();
    let high = u64::try_from(nanos >> 64).unwrap_or_default();
    splitmix64(low ^ high)
}

#[inline]
const fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SPLITMIX_GAMMA);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;

    #[test]
    fn explicit_seed_is_kept() {
        let seed = resolve_seed(Some(7));
        assert_eq!(seed.value(), 7);
        assert_eq!(seed.origin(), SeedOrigin::Explicit);
    }

    #[test]
    fn missing_seed_is_drawn_from_a_source() {
        let seed = resolve_seed(None);
        assert_ne!(seed.origin(), SeedOrigin::Explicit);
    }

    #[test]
    fn equal_seeds_build_equal_generators() {
        let mut left = resolve_seed(Some(1234)).rng();
        let mut right = resolve_seed(Some(1234)).rng();
        let drawn: Vec<u32> = (0..8).map(|_| left.r#gen()).collect();
        let expected: Vec<u32> = (0..8).map(|_| right.r#gen()).collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn splitmix_spreads_adjacent_states() {
        assert_ne!(splitmix64(0), splitmix64(1));
        assert_ne!(splitmix64(0), 0);
    }
}
