//! Estimated GDP derivation.
//!
//! The estimate is deliberately noisy: every country draws its own multiplier
//! from `[MULTIPLIER_MIN, MULTIPLIER_MAX)` on every refresh, so two refreshes
//! over identical source data produce different figures. The randomness comes
//! from a [`GdpMultiplier`] owned by the caller, which tests construct with a
//! fixed seed.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::RateTable;

// ---------------------------------------------------------------------------
// Multiplier bounds
// ---------------------------------------------------------------------------

/// Inclusive lower bound of the per-country multiplier.
pub const MULTIPLIER_MIN: f64 = 1000.0;
/// Exclusive upper bound of the per-country multiplier.
pub const MULTIPLIER_MAX: f64 = 2000.0;

// ---------------------------------------------------------------------------
// Multiplier source
// ---------------------------------------------------------------------------

/// Source of the random multiplier applied to each country's estimate.
///
/// Shared across a refresh; the inner RNG sits behind a mutex so a single
/// instance can live inside an `Arc`'d service.
pub struct GdpMultiplier {
    rng: Mutex<StdRng>,
}

impl GdpMultiplier {
    /// Seed from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the next multiplier in `[MULTIPLIER_MIN, MULTIPLIER_MAX)`.
    pub fn draw(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(MULTIPLIER_MIN..MULTIPLIER_MAX)
    }
}

impl Default for GdpMultiplier {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl fmt::Debug for GdpMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdpMultiplier").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Exchange rate and estimated GDP derived for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GdpEstimate {
    /// Set only when a usable rate exists for the country's currency.
    pub exchange_rate: Option<f64>,
    /// `Some(0.0)` when the country reports no currency, `None` when the
    /// currency has no usable rate.
    pub estimated_gdp: Option<f64>,
}

/// Look up a rate that can be divided by.
///
/// Zero, negative and non-finite rates are treated as missing.
pub fn usable_rate(rates: &RateTable, currency_code: &str) -> Option<f64> {
    rates
        .get(currency_code)
        .copied()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Derive the exchange rate and estimated GDP for one country.
///
/// | currency code | usable rate | estimated GDP                       |
/// |---------------|-------------|-------------------------------------|
/// | absent        | n/a         | `0`                                 |
/// | present       | present     | `population * multiplier / rate`    |
/// | present       | absent      | `None`                              |
///
/// A multiplier is drawn only in the middle case.
pub fn estimate_gdp(
    population: i64,
    currency_code: Option<&str>,
    rates: &RateTable,
    multiplier: &GdpMultiplier,
) -> GdpEstimate {
    let Some(code) = currency_code else {
        return GdpEstimate {
            exchange_rate: None,
            estimated_gdp: Some(0.0),
        };
    };

    match usable_rate(rates, code) {
        Some(rate) => GdpEstimate {
            exchange_rate: Some(rate),
            estimated_gdp: Some(population as f64 * multiplier.draw() / rate),
        },
        None => GdpEstimate {
            exchange_rate: None,
            estimated_gdp: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> RateTable {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn no_currency_yields_zero_and_no_rate() {
        let estimate = estimate_gdp(5_000_000, None, &rates(&[]), &GdpMultiplier::seeded(1));
        assert_eq!(estimate.estimated_gdp, Some(0.0));
        assert_eq!(estimate.exchange_rate, None);
    }

    #[test]
    fn unknown_rate_yields_null() {
        let estimate = estimate_gdp(
            5_000_000,
            Some("XYZ"),
            &rates(&[("USD", 1.0)]),
            &GdpMultiplier::seeded(1),
        );
        assert_eq!(estimate.estimated_gdp, None);
        assert_eq!(estimate.exchange_rate, None);
    }

    #[test]
    fn zero_rate_is_treated_as_missing() {
        let estimate = estimate_gdp(
            1_000,
            Some("ZZZ"),
            &rates(&[("ZZZ", 0.0)]),
            &GdpMultiplier::seeded(1),
        );
        assert_eq!(estimate.estimated_gdp, None);
        assert_eq!(estimate.exchange_rate, None);
    }

    #[test]
    fn nigeria_estimate_lies_within_multiplier_bounds() {
        let population: i64 = 206_139_589;
        let estimate = estimate_gdp(
            population,
            Some("NGN"),
            &rates(&[("NGN", 1600.0)]),
            &GdpMultiplier::from_entropy(),
        );

        let gdp = estimate.estimated_gdp.expect("rate present");
        let low = population as f64 * MULTIPLIER_MIN / 1600.0;
        let high = population as f64 * MULTIPLIER_MAX / 1600.0;
        assert!(gdp >= low && gdp < high, "{gdp} outside [{low}, {high})");
        assert_eq!(estimate.exchange_rate, Some(1600.0));
    }

    #[test]
    fn seeded_multiplier_gives_exact_values() {
        let reference = GdpMultiplier::seeded(42);
        let expected_multiplier = reference.draw();

        let estimate = estimate_gdp(
            1_000_000,
            Some("GHS"),
            &rates(&[("GHS", 15.0)]),
            &GdpMultiplier::seeded(42),
        );

        assert_eq!(
            estimate.estimated_gdp,
            Some(1_000_000.0 * expected_multiplier / 15.0)
        );
    }

    #[test]
    fn multiplier_stays_in_half_open_range() {
        let multiplier = GdpMultiplier::seeded(7);
        for _ in 0..10_000 {
            let m = multiplier.draw();
            assert!((MULTIPLIER_MIN..MULTIPLIER_MAX).contains(&m), "{m}");
        }
    }

    #[test]
    fn each_draw_is_independent() {
        let multiplier = GdpMultiplier::seeded(3);
        let first = multiplier.draw();
        let second = multiplier.draw();
        assert_ne!(first, second);
    }
}
