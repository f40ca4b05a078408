//! Detect overlapping bookings.
//!
//! Two bookings conflict only when they reserve the same field on the same date
//! and their hour intervals overlap. Intervals are half-open, so a booking that
//! ends exactly when another starts is NOT a conflict.

use crate::error::{PitchError, Result};
use crate::model::Booking;

/// A detected conflict between two bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub booking_a: Booking,
    pub booking_b: Booking,
    pub overlap_hours: u32,
}

/// Whether `a` and `b` occupy the same field on the same date with overlapping hours.
///
/// Bookings for different fields or different dates never conflict, whatever
/// their hours. Otherwise the test is `start1 < end2 && start2 < end1`.
pub fn conflicts(a: &Booking, b: &Booking) -> bool {
    if a.field_id != b.field_id || a.date != b.date {
        return false;
    }

    u64::from(a.start_hour) < b.end_hour() && u64::from(b.start_hour) < a.end_hour()
}

/// Checked variant of [`conflicts`].
///
/// # Errors
/// Returns `PitchError::InvalidArgument` if either booking has a zero duration
/// or an empty field reference.
pub fn try_conflicts(a: &Booking, b: &Booking) -> Result<bool> {
    validate(a)?;
    validate(b)?;
    Ok(conflicts(a, b))
}

fn validate(booking: &Booking) -> Result<()> {
    if booking.duration_hours == 0 {
        return Err(PitchError::InvalidArgument(format!(
            "booking {} has a zero duration",
            booking.id
        )));
    }
    if booking.field_id.is_empty() {
        return Err(PitchError::InvalidArgument(format!(
            "booking {} has no field reference",
            booking.id
        )));
    }
    Ok(())
}

/// Find every conflicting pair within one booking list.
///
/// Each pair is reported once, in list order. The overlap is
/// `min(a.end, b.end) - max(a.start, b.start)` hours.
pub fn find_conflicts(bookings: &[Booking]) -> Vec<Conflict> {
    let mut found = Vec::new();

    for (i, a) in bookings.iter().enumerate() {
        for b in &bookings[i + 1..] {
            if conflicts(a, b) {
                let overlap_start = u64::from(a.start_hour.max(b.start_hour));
                let overlap_end = a.end_hour().min(b.end_hour());
                // Bounded by either duration, so it always fits.
                let overlap_hours = u32::try_from(overlap_end - overlap_start).unwrap_or(u32::MAX);

                found.push(Conflict {
                    booking_a: a.clone(),
                    booking_b: b.clone(),
                    overlap_hours,
                });
            }
        }
    }

    found
}

/// The first booking in `existing` that conflicts with `candidate`, if any.
pub fn first_conflict<'a, I>(candidate: &Booking, existing: I) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    existing.into_iter().find(|b| conflicts(candidate, b))
}
