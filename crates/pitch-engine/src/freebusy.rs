//! Compute free hour slots on one field for one day.
//!
//! Collects the field's non-cancelled bookings on that date, merges their busy
//! hours, then computes the gaps between merged periods within the opening
//! window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Booking;

/// A free block of whole hours, `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub start_hour: u32,
    pub end_hour: u32,
    pub duration_hours: u32,
}

impl FreeSlot {
    fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            duration_hours: end_hour - start_hour,
        }
    }
}

/// Merge overlapping or adjacent busy periods of `field_id` on `date`, clipped
/// to `[open_hour, close_hour)`.
///
/// Returns a sorted, non-overlapping list of (start, end) hour intervals.
fn merge_busy_hours(
    bookings: &[Booking],
    field_id: &str,
    date: NaiveDate,
    open_hour: u32,
    close_hour: u32,
) -> Vec<(u32, u32)> {
    let mut intervals: Vec<(u32, u32)> = bookings
        .iter()
        .filter(|b| b.field_id == field_id && b.date == date && !b.is_cancelled())
        .filter(|b| b.start_hour < close_hour && b.end_hour() > u64::from(open_hour))
        .map(|b| {
            let end = b.end_hour().min(u64::from(close_hour));
            (b.start_hour.max(open_hour), u32::try_from(end).unwrap_or(close_hour))
        })
        .collect();

    intervals.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Find the free hours of `field_id` on `date` within `[open_hour, close_hour)`.
///
/// Cancelled bookings do not occupy the field. Returns slots sorted by start hour.
pub fn find_free_slots(
    bookings: &[Booking],
    field_id: &str,
    date: NaiveDate,
    open_hour: u32,
    close_hour: u32,
) -> Vec<FreeSlot> {
    if open_hour >= close_hour {
        return Vec::new();
    }

    let merged = merge_busy_hours(bookings, field_id, date, open_hour, close_hour);

    let mut free_slots = Vec::new();
    let mut cursor = open_hour;

    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            free_slots.push(FreeSlot::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < close_hour {
        free_slots.push(FreeSlot::new(cursor, close_hour));
    }

    free_slots
}

/// Find the first free slot of at least `min_hours` hours.
pub fn find_first_free_slot(
    bookings: &[Booking],
    field_id: &str,
    date: NaiveDate,
    open_hour: u32,
    close_hour: u32,
    min_hours: u32,
) -> Option<FreeSlot> {
    find_free_slots(bookings, field_id, date, open_hour, close_hour)
        .into_iter()
        .find(|slot| slot.duration_hours >= min_hours)
}
