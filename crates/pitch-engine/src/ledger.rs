//! The venue's booking ledger.
//!
//! Holds bookings newest first. New bookings are validated against the venue's
//! opening hours and against every non-cancelled booking before they are
//! accepted. Status and payment transitions go through explicit setters and do
//! not re-run the conflict check.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::conflict::first_conflict;
use crate::error::{PitchError, Result};
use crate::model::{Booking, BookingRequest, BookingStatus, Field, PaymentStatus};
use crate::venue::VenueSettings;

/// Paid revenue collected for bookings on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct BookingLedger {
    venue: VenueSettings,
    bookings: Vec<Booking>,
    next_number: u64,
}

impl BookingLedger {
    pub fn new(venue: VenueSettings) -> Self {
        Self::from_bookings(venue, Vec::new())
    }

    /// Ledger seeded with existing bookings (e.g. a synthesized schedule).
    ///
    /// Bookings are taken as-is; they are not re-validated.
    pub fn from_bookings(venue: VenueSettings, bookings: Vec<Booking>) -> Self {
        let next_number = bookings
            .iter()
            .filter_map(|b| b.id.strip_prefix("BK-")?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1);

        Self {
            venue,
            bookings,
            next_number,
        }
    }

    pub fn venue(&self) -> &VenueSettings {
        &self.venue
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Accept a new booking on `field`.
    ///
    /// The booking starts `confirmed` with payment `pending` and is priced at
    /// the field's hourly rate.
    ///
    /// # Errors
    /// - `PitchError::InvalidArgument` if the request has a zero duration, an end
    ///   hour that overflows `u32`, or names a different field than `field`.
    /// - `PitchError::FieldUnavailable` if `field` is not bookable.
    /// - `PitchError::OutsideOpeningHours` if the venue is closed for any part
    ///   of the requested hours.
    /// - `PitchError::UnderMaintenance` if it overlaps one of the field's
    ///   maintenance windows.
    /// - `PitchError::Conflict` if it overlaps a non-cancelled booking.
    pub fn create(
        &mut self,
        request: BookingRequest,
        field: &Field,
        now: DateTime<Utc>,
    ) -> Result<&Booking> {
        if request.duration_hours == 0 {
            return Err(PitchError::InvalidArgument(
                "booking duration must be at least one hour".to_string(),
            ));
        }
        if request.field_id.is_empty() || request.field_id != field.id {
            return Err(PitchError::InvalidArgument(format!(
                "request for field '{}' does not match field {}",
                request.field_id, field.id
            )));
        }
        if !field.is_bookable() {
            return Err(PitchError::FieldUnavailable(field.id.clone()));
        }

        let end_hour = request
            .start_hour
            .checked_add(request.duration_hours)
            .ok_or_else(|| {
                PitchError::InvalidArgument(format!(
                    "booking of {} hours from {}:00 has no representable end",
                    request.duration_hours, request.start_hour
                ))
            })?;
        let within_hours = self
            .venue
            .hours_for(request.date)
            .is_some_and(|(open, close)| request.start_hour >= open && end_hour <= close);
        if !within_hours {
            return Err(PitchError::OutsideOpeningHours {
                date: request.date,
                start_hour: request.start_hour,
                end_hour,
            });
        }
        if let Some(window) = field.maintenance_during(request.date, request.start_hour, end_hour) {
            return Err(PitchError::UnderMaintenance {
                field: field.id.clone(),
                date: window.date,
                start_hour: window.start_hour,
                end_hour: window.end_hour,
            });
        }

        let candidate = Booking {
            id: format!("BK-{}", self.next_number),
            customer_id: request.customer_id,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            field_id: field.id.clone(),
            field_name: field.name.clone(),
            date: request.date,
            start_hour: request.start_hour,
            duration_hours: request.duration_hours,
            price: field.price_for(request.duration_hours),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            payment_method: request.payment_method,
            created_at: now,
            notes: request.notes,
            subscription_id: request.subscription_id,
            version: 1,
        };

        let live = self.bookings.iter().filter(|b| !b.is_cancelled());
        if let Some(existing) = first_conflict(&candidate, live) {
            return Err(PitchError::Conflict {
                candidate: candidate.id,
                existing: existing.id.clone(),
            });
        }

        debug!(
            id = %candidate.id,
            field = %candidate.field_id,
            date = %candidate.date,
            start_hour = candidate.start_hour,
            duration_hours = candidate.duration_hours,
            "booking created"
        );

        self.next_number += 1;
        self.bookings.insert(0, candidate);
        Ok(&self.bookings[0])
    }

    fn booking_mut(&mut self, id: &str) -> Result<&mut Booking> {
        self.bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| PitchError::NotFound(format!("booking {id}")))
    }

    pub fn set_status(&mut self, id: &str, status: BookingStatus) -> Result<&Booking> {
        let booking = self.booking_mut(id)?;
        booking.set_status(status);
        debug!(
            id,
            status = status.as_str(),
            version = booking.version,
            "booking status changed"
        );
        Ok(&*booking)
    }

    pub fn cancel(&mut self, id: &str) -> Result<&Booking> {
        self.set_status(id, BookingStatus::Cancelled)
    }

    pub fn complete(&mut self, id: &str) -> Result<&Booking> {
        self.set_status(id, BookingStatus::Completed)
    }

    pub fn set_payment_status(
        &mut self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> Result<&Booking> {
        let booking = self.booking_mut(id)?;
        booking.set_payment_status(payment_status);
        Ok(&*booking)
    }

    pub fn mark_paid(&mut self, id: &str) -> Result<&Booking> {
        self.set_payment_status(id, PaymentStatus::Paid)
    }

    pub fn set_notes(&mut self, id: &str, notes: &str) -> Result<&Booking> {
        let booking = self.booking_mut(id)?;
        booking.set_notes(notes);
        Ok(&*booking)
    }

    /// Remove a booking, returning whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.bookings.len();
        self.bookings.retain(|b| b.id != id);
        let removed = self.bookings.len() != before;
        if removed {
            debug!(id, "booking deleted");
        }
        removed
    }

    pub fn by_field(&self, field_id: &str) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.field_id == field_id).collect()
    }

    pub fn by_customer(&self, customer_id: &str) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| b.customer_id == customer_id)
            .collect()
    }

    /// Bookings dated within `[from, to]`, both ends inclusive.
    pub fn by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| from <= b.date && b.date <= to)
            .collect()
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.date == date).collect()
    }

    pub fn with_status(&self, status: BookingStatus) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.status == status).collect()
    }

    /// Non-cancelled bookings dated `today` or later, earliest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Booking> {
        let mut upcoming: Vec<&Booking> = self
            .bookings
            .iter()
            .filter(|b| b.date >= today && !b.is_cancelled())
            .collect();
        upcoming.sort_by_key(|b| (b.date, b.start_hour));
        upcoming
    }

    /// The first `limit` non-cancelled bookings in ledger order.
    pub fn recent(&self, limit: usize) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| !b.is_cancelled())
            .take(limit)
            .collect()
    }

    /// Total price of bookings whose payment is still pending.
    pub fn pending_amount(&self) -> u64 {
        self.bookings
            .iter()
            .filter(|b| b.payment_status == PaymentStatus::Pending)
            .map(|b| u64::from(b.price))
            .sum()
    }

    pub fn pending_count(&self) -> usize {
        self.bookings
            .iter()
            .filter(|b| b.payment_status == PaymentStatus::Pending)
            .count()
    }

    /// Paid revenue per date within `[from, to]`, earliest first. Cancelled
    /// bookings and dates without paid bookings are left out.
    pub fn revenue_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<DailyRevenue> {
        let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for booking in self.by_date_range(from, to) {
            if booking.payment_status == PaymentStatus::Paid && !booking.is_cancelled() {
                *by_date.entry(booking.date).or_default() += u64::from(booking.price);
            }
        }
        by_date
            .into_iter()
            .map(|(date, amount)| DailyRevenue { date, amount })
            .collect()
    }

    pub fn total_revenue_between(&self, from: NaiveDate, to: NaiveDate) -> u64 {
        self.revenue_by_date_range(from, to)
            .iter()
            .map(|day| day.amount)
            .sum()
    }
}
