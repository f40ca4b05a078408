//! Tunable demand profile for schedule synthesis.
//!
//! The defaults reproduce the venue's observed demand: most bookings cluster
//! within a week of today and in the evening peak, with a long tail across the
//! month and the rest of the day. Every weight and window is a field here so
//! alternate profiles can be loaded from JSON without touching the synthesizer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PitchError, Result};

/// Largest date offset, in either direction, a policy may ask for.
const MAX_DAY_OFFSET: i64 = 3650;

/// Longest booking a policy may generate.
const MAX_DURATION_HOURS: u32 = 24;

/// An inclusive integer range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Uniform draw from the range. The range must be non-empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Two-tier mixed distribution: with probability `primary_weight` draw from
/// `primary`, otherwise from `fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredRange {
    pub primary_weight: f64,
    pub primary: IntRange,
    pub fallback: IntRange,
}

impl TieredRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if rng.gen_bool(self.primary_weight) {
            self.primary.sample(rng)
        } else {
            self.fallback.sample(rng)
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        check_probability(self.primary_weight, what)?;
        for range in [self.primary, self.fallback] {
            if range.min > range.max {
                return Err(PitchError::InvalidConfiguration(format!(
                    "{what}: range [{}, {}] is empty",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Parameters of the schedule synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisPolicy {
    /// Day offsets relative to today's date.
    pub date_window: TieredRange,
    /// Candidate start hours, within `[opening_hour, closing_hour)`.
    pub start_hours: TieredRange,
    /// Durations in whole hours (1-24), drawn uniformly.
    pub durations: Vec<u32>,
    /// No booking may start before this hour.
    pub opening_hour: u32,
    /// No booking may end after this hour.
    pub closing_hour: u32,
    /// Attempt budget is `target_count * retry_budget_multiplier`.
    pub retry_budget_multiplier: usize,
    pub subscription_probability: f64,
    pub paid_probability: f64,
    pub notes_probability: f64,
    /// `created_at` lies up to this many days (exclusive) before the booking date.
    pub created_lookback_days: u32,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            date_window: TieredRange {
                primary_weight: 0.7,
                primary: IntRange::new(-7, 6),
                fallback: IntRange::new(-30, 29),
            },
            start_hours: TieredRange {
                primary_weight: 0.6,
                primary: IntRange::new(17, 21),
                fallback: IntRange::new(8, 19),
            },
            durations: vec![1, 2],
            opening_hour: 8,
            closing_hour: 22,
            retry_budget_multiplier: 3,
            subscription_probability: 0.25,
            paid_probability: 0.8,
            notes_probability: 0.3,
            created_lookback_days: 10,
        }
    }
}

impl SynthesisPolicy {
    /// Parse a policy from JSON. Missing keys keep their default values.
    ///
    /// # Errors
    /// Returns `PitchError::Json` for malformed JSON and
    /// `PitchError::InvalidConfiguration` if the parsed policy is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: SynthesisPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check that every weight is a probability and every window is sampleable.
    pub fn validate(&self) -> Result<()> {
        self.date_window.validate("dateWindow")?;
        self.start_hours.validate("startHours")?;

        for range in [self.date_window.primary, self.date_window.fallback] {
            if range.min < -MAX_DAY_OFFSET || range.max > MAX_DAY_OFFSET {
                return Err(PitchError::InvalidConfiguration(format!(
                    "dateWindow: range [{}, {}] exceeds {MAX_DAY_OFFSET} days",
                    range.min, range.max
                )));
            }
        }

        if self.closing_hour == 0 || self.closing_hour > 24 {
            return Err(PitchError::InvalidConfiguration(format!(
                "closingHour {} is outside 1-24",
                self.closing_hour
            )));
        }
        if self.opening_hour >= self.closing_hour {
            return Err(PitchError::InvalidConfiguration(format!(
                "openingHour {} is not before closingHour {}",
                self.opening_hour, self.closing_hour
            )));
        }

        let (open, close) = (i64::from(self.opening_hour), i64::from(self.closing_hour));
        for range in [self.start_hours.primary, self.start_hours.fallback] {
            if range.min < open || range.max >= close {
                return Err(PitchError::InvalidConfiguration(format!(
                    "startHours: range [{}, {}] is outside opening hours {open}-{close}",
                    range.min, range.max
                )));
            }
        }

        if self.durations.is_empty() {
            return Err(PitchError::InvalidConfiguration(
                "durations must not be empty".to_string(),
            ));
        }
        if let Some(&bad) = self
            .durations
            .iter()
            .find(|&&d| d == 0 || d > MAX_DURATION_HOURS)
        {
            return Err(PitchError::InvalidConfiguration(format!(
                "durations: {bad} is outside 1-{MAX_DURATION_HOURS} hours"
            )));
        }
        if self.retry_budget_multiplier == 0 {
            return Err(PitchError::InvalidConfiguration(
                "retryBudgetMultiplier must be at least 1".to_string(),
            ));
        }
        if self.created_lookback_days == 0 {
            return Err(PitchError::InvalidConfiguration(
                "createdLookbackDays must be at least 1".to_string(),
            ));
        }

        check_probability(self.subscription_probability, "subscriptionProbability")?;
        check_probability(self.paid_probability, "paidProbability")?;
        check_probability(self.notes_probability, "notesProbability")?;

        Ok(())
    }
}

fn check_probability(p: f64, what: &str) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(PitchError::InvalidConfiguration(format!(
            "{what}: {p} is not a probability"
        )))
    }
}

