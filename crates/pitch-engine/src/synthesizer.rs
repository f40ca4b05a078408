//! Schedule synthesis by rejection sampling.
//!
//! Candidates are drawn from the [`SynthesisPolicy`] distributions and accepted
//! only if they fit within opening hours and do not conflict with any booking
//! already accepted for the same field and date. Sampling stops when the target
//! is reached or the attempt budget (`target_count * retry_budget_multiplier`)
//! runs out. Closing-time and conflict rejections draw on the same budget.
//!
//! Running out of budget is not an error: the result simply holds fewer
//! bookings than requested.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use tracing::debug;

use crate::conflict::first_conflict;
use crate::error::{PitchError, Result};
use crate::model::{Booking, BookingStatus, Field, PaymentMethod, PaymentStatus};
use crate::policy::SynthesisPolicy;

const CUSTOMER_NAMES: [&str; 16] = [
    "Ahmed Hassan",
    "Mohamed Ali",
    "Sara Ibrahim",
    "Fatima Ahmed",
    "Omar Khalil",
    "Layla Mohamed",
    "Youssef Samir",
    "Nour Hassan",
    "Karim Zayed",
    "Yasmin Nabil",
    "Hassan Omar",
    "Mariam Fathi",
    "Ali Rahman",
    "Hana Saleh",
    "Tariq Mansour",
    "Dina Youssef",
];

const CUSTOMER_POOL: u32 = 50;
const SUBSCRIPTION_POOL: u32 = 20;
const FIRST_BOOKING_NUMBER: usize = 1000;
const FIRST_SUBSCRIPTION_NUMBER: u32 = 100;
const EQUIPMENT_NOTE: &str = "Special equipment requested";

/// Outcome of one synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisReport {
    /// Accepted bookings, sorted by date descending.
    pub bookings: Vec<Booking>,
    pub target_count: usize,
    pub attempts: usize,
    /// Candidates discarded because they would run past closing time.
    pub closing_rejections: usize,
    /// Candidates discarded because they overlapped an accepted booking.
    pub conflict_rejections: usize,
}

impl SynthesisReport {
    /// Whether the attempt budget ran out before the target was reached.
    pub fn is_under_filled(&self) -> bool {
        self.bookings.len() < self.target_count
    }
}

/// Generate up to `target_count` mutually conflict-free bookings across `fields`.
///
/// Dates are drawn relative to `now`'s date. The result is sorted by date,
/// most recent first; bookings on the same date keep their acceptance order.
///
/// # Errors
/// Returns `PitchError::InvalidConfiguration` if `fields` is empty or `policy`
/// fails validation. No bookings are generated in that case.
pub fn synthesize<R: Rng + ?Sized>(
    target_count: usize,
    fields: &[Field],
    policy: &SynthesisPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<Booking>> {
    synthesize_with_report(target_count, fields, policy, now, rng).map(|report| report.bookings)
}

/// Like [`synthesize`], but also reports how the attempt budget was spent.
pub fn synthesize_with_report<R: Rng + ?Sized>(
    target_count: usize,
    fields: &[Field],
    policy: &SynthesisPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<SynthesisReport> {
    if fields.is_empty() {
        return Err(PitchError::InvalidConfiguration(
            "cannot synthesize bookings without any fields".to_string(),
        ));
    }
    policy.validate()?;

    let max_attempts = target_count.saturating_mul(policy.retry_budget_multiplier);
    let mut accepted: Vec<Booking> = Vec::with_capacity(target_count);
    // Positions in `accepted`, keyed by field and date, so each candidate is
    // only checked against bookings it could possibly conflict with.
    let mut by_slot: HashMap<(String, NaiveDate), Vec<usize>> = HashMap::new();
    let mut attempts = 0;
    let mut closing_rejections = 0;
    let mut conflict_rejections = 0;

    while accepted.len() < target_count && attempts < max_attempts {
        attempts += 1;

        let day = now + Duration::days(policy.date_window.sample(rng));
        // Validation keeps start hours within opening hours and durations
        // within a day, so neither the cast nor the sum can overflow.
        let start_hour = policy.start_hours.sample(rng) as u32;
        let duration_hours = policy.durations[rng.gen_range(0..policy.durations.len())];

        if start_hour + duration_hours > policy.closing_hour {
            closing_rejections += 1;
            continue;
        }

        let field = &fields[rng.gen_range(0..fields.len())];
        let candidate = build_candidate(
            format!("BK-{}", FIRST_BOOKING_NUMBER + accepted.len()),
            field,
            day,
            start_hour,
            duration_hours,
            policy,
            rng,
        );

        let key = (candidate.field_id.clone(), candidate.date);
        let same_slot = by_slot.entry(key).or_default();
        if first_conflict(&candidate, same_slot.iter().map(|&i| &accepted[i])).is_some() {
            conflict_rejections += 1;
            continue;
        }

        same_slot.push(accepted.len());
        accepted.push(candidate);
    }

    accepted.sort_by(|a, b| b.date.cmp(&a.date));

    debug!(
        target_count,
        accepted = accepted.len(),
        attempts,
        closing_rejections,
        conflict_rejections,
        "schedule synthesis finished"
    );

    Ok(SynthesisReport {
        bookings: accepted,
        target_count,
        attempts,
        closing_rejections,
        conflict_rejections,
    })
}

/// Fill in the randomized customer, status and payment attributes of a candidate.
fn build_candidate<R: Rng + ?Sized>(
    id: String,
    field: &Field,
    day: DateTime<Utc>,
    start_hour: u32,
    duration_hours: u32,
    policy: &SynthesisPolicy,
    rng: &mut R,
) -> Booking {
    let customer_number = rng.gen_range(1..=CUSTOMER_POOL);
    let customer_name = CUSTOMER_NAMES[rng.gen_range(0..CUSTOMER_NAMES.len())];
    let phone_number = rng.gen_range(1_000_000..=9_999_999);
    let status = BookingStatus::ALL[rng.gen_range(0..BookingStatus::ALL.len())];
    let payment_status = if rng.gen_bool(policy.paid_probability) {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    };
    let payment_method = PaymentMethod::ALL[rng.gen_range(0..PaymentMethod::ALL.len())];
    let created_days_before = rng.gen_range(0..policy.created_lookback_days);
    let notes = if rng.gen_bool(policy.notes_probability) {
        EQUIPMENT_NOTE.to_string()
    } else {
        String::new()
    };
    let subscription_id = rng.gen_bool(policy.subscription_probability).then(|| {
        format!(
            "SUB-{}",
            FIRST_SUBSCRIPTION_NUMBER + rng.gen_range(0..SUBSCRIPTION_POOL)
        )
    });

    Booking {
        id,
        customer_id: format!("CUS-{customer_number}"),
        customer_name: customer_name.to_string(),
        customer_phone: format!("+212 6 {phone_number}"),
        field_id: field.id.clone(),
        field_name: field.name.clone(),
        date: day.date_naive(),
        start_hour,
        duration_hours,
        price: field.price_for(duration_hours),
        status,
        payment_status,
        payment_method,
        created_at: day - Duration::days(i64::from(created_days_before)),
        notes,
        subscription_id,
        version: 1,
    }
}
