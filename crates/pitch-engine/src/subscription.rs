//! Recurring reservations.
//!
//! A subscription holds one field at the same hours on one weekday for a span
//! of dates, weekly, every other week or once a month. Individual sessions can
//! be materialized as [`Booking`]s so they go through the same conflict rule as
//! one-off bookings.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::conflicts;
use crate::error::{PitchError, Result};
use crate::model::{Booking, BookingStatus, Field, PaymentMethod, PaymentStatus};

/// First id handed out by a fresh [`SubscriptionBook`].
const FIRST_SUBSCRIPTION_NUMBER: u64 = 100;

/// How often a subscription's session recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    /// The first matching weekday of each month.
    Monthly,
}

impl Frequency {
    pub fn sessions_per_month(&self) -> u32 {
        match self {
            Frequency::Weekly => 4,
            Frequency::BiWeekly => 2,
            Frequency::Monthly => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub field_id: String,
    pub field_name: String,
    pub frequency: Frequency,
    pub day_of_week: Weekday,
    pub start_hour: u32,
    pub duration_hours: u32,
    /// `sessions_per_month * duration_hours * hourly_rate` at signup.
    pub monthly_rate: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default = "initial_version")]
    pub version: u32,
}

fn initial_version() -> u32 {
    1
}

impl Subscription {
    pub fn end_hour(&self) -> u64 {
        u64::from(self.start_hour) + u64::from(self.duration_hours)
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Whether a session falls on `date`, ignoring the subscription's status.
    pub fn is_session_day(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date || date.weekday() != self.day_of_week {
            return false;
        }
        match self.frequency {
            Frequency::Weekly => true,
            Frequency::BiWeekly => (date - self.first_session()).num_days() % 14 == 0,
            Frequency::Monthly => date.day() <= 7,
        }
    }

    /// Session dates within `[from, to]`, earliest first.
    pub fn sessions_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let from = from.max(self.start_date);
        let to = to.min(self.end_date);
        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| self.is_session_day(*d))
            .collect()
    }

    /// The session on `date` as a booking. Its price is one month's rate
    /// spread over the month's sessions.
    pub fn session_booking(&self, date: NaiveDate) -> Booking {
        Booking {
            id: format!("{}-{}", self.id, date),
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            customer_phone: String::new(),
            field_id: self.field_id.clone(),
            field_name: self.field_name.clone(),
            date,
            start_hour: self.start_hour,
            duration_hours: self.duration_hours,
            price: self.monthly_rate / self.frequency.sessions_per_month(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Card,
            created_at: self.created_at,
            notes: String::new(),
            subscription_id: Some(self.id.clone()),
            version: 1,
        }
    }

    /// Non-cancelled bookings that overlap one of this subscription's sessions.
    /// Bookings belonging to this subscription are skipped.
    pub fn clashing_bookings<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        bookings
            .iter()
            .filter(|b| !b.is_cancelled() && b.subscription_id.as_deref() != Some(&self.id))
            .filter(|b| b.field_id == self.field_id && self.is_session_day(b.date))
            .filter(|b| conflicts(&self.session_booking(b.date), b))
            .collect()
    }

    fn first_session(&self) -> NaiveDate {
        let ahead = (self.day_of_week.num_days_from_monday() + 7
            - self.start_date.weekday().num_days_from_monday())
            % 7;
        self.start_date + chrono::Duration::days(i64::from(ahead))
    }

    /// Whether the two subscriptions could ever hold the field at the same time.
    fn overlaps(&self, other: &Subscription) -> bool {
        self.field_id == other.field_id
            && self.day_of_week == other.day_of_week
            && self.start_date <= other.end_date
            && other.start_date <= self.end_date
            && u64::from(self.start_hour) < other.end_hour()
            && u64::from(other.start_hour) < self.end_hour()
    }
}

/// The caller-supplied part of a new subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub customer_id: String,
    pub customer_name: String,
    pub field_id: String,
    pub frequency: Frequency,
    pub day_of_week: Weekday,
    pub start_hour: u32,
    pub duration_hours: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// All subscriptions of the venue, in creation order.
#[derive(Debug, Clone)]
pub struct SubscriptionBook {
    subscriptions: Vec<Subscription>,
    next_number: u64,
}

impl Default for SubscriptionBook {
    fn default() -> Self {
        Self::from_subscriptions(Vec::new())
    }
}

impl SubscriptionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book seeded with existing subscriptions; they are not re-validated.
    pub fn from_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let next_number = subscriptions
            .iter()
            .filter_map(|s| s.id.strip_prefix("SUB-")?.parse::<u64>().ok())
            .max()
            .map_or(FIRST_SUBSCRIPTION_NUMBER, |n| n + 1);

        Self {
            subscriptions,
            next_number,
        }
    }

    pub fn all(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn get(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    /// Sign up a new, active subscription on `field`.
    ///
    /// # Errors
    /// - `PitchError::InvalidArgument` for a zero duration, sessions ending
    ///   after midnight, an end date before the start date, or a request naming
    ///   another field.
    /// - `PitchError::FieldUnavailable` if `field` is not bookable.
    /// - `PitchError::Conflict` if a non-cancelled subscription already holds
    ///   overlapping hours on the same field and weekday.
    pub fn create(
        &mut self,
        request: SubscriptionRequest,
        field: &Field,
        now: DateTime<Utc>,
    ) -> Result<&Subscription> {
        validate_slot(request.start_hour, request.duration_hours)?;
        if request.end_date < request.start_date {
            return Err(PitchError::InvalidArgument(format!(
                "subscription ends {} before it starts {}",
                request.end_date, request.start_date
            )));
        }
        if request.field_id != field.id {
            return Err(PitchError::InvalidArgument(format!(
                "request for field '{}' does not match field {}",
                request.field_id, field.id
            )));
        }
        if !field.is_bookable() {
            return Err(PitchError::FieldUnavailable(field.id.clone()));
        }

        let monthly_rate = request
            .frequency
            .sessions_per_month()
            .saturating_mul(field.price_for(request.duration_hours));
        let candidate = Subscription {
            id: format!("SUB-{}", self.next_number),
            customer_id: request.customer_id,
            customer_name: request.customer_name,
            field_id: field.id.clone(),
            field_name: field.name.clone(),
            frequency: request.frequency,
            day_of_week: request.day_of_week,
            start_hour: request.start_hour,
            duration_hours: request.duration_hours,
            monthly_rate,
            start_date: request.start_date,
            end_date: request.end_date,
            status: SubscriptionStatus::Active,
            created_at: now,
            version: 1,
        };

        self.check_slot(&candidate)?;

        debug!(
            id = %candidate.id,
            field = %candidate.field_id,
            day = %candidate.day_of_week,
            start_hour = candidate.start_hour,
            "subscription created"
        );

        self.next_number += 1;
        self.subscriptions.push(candidate);
        let index = self.subscriptions.len() - 1;
        Ok(&self.subscriptions[index])
    }

    /// Move a subscription to another weekday and hours.
    ///
    /// # Errors
    /// As for [`SubscriptionBook::create`], plus `PitchError::NotFound`.
    pub fn reschedule(
        &mut self,
        id: &str,
        day_of_week: Weekday,
        start_hour: u32,
        duration_hours: u32,
    ) -> Result<&Subscription> {
        validate_slot(start_hour, duration_hours)?;
        let mut moved = self
            .get(id)
            .cloned()
            .ok_or_else(|| PitchError::NotFound(format!("subscription {id}")))?;
        if duration_hours != moved.duration_hours {
            moved.monthly_rate = (moved.monthly_rate / moved.duration_hours.max(1))
                .saturating_mul(duration_hours);
        }
        moved.day_of_week = day_of_week;
        moved.start_hour = start_hour;
        moved.duration_hours = duration_hours;
        moved.version += 1;

        self.check_slot(&moved)?;

        let slot = self.subscription_mut(id)?;
        *slot = moved;
        Ok(&*slot)
    }

    pub fn set_status(&mut self, id: &str, status: SubscriptionStatus) -> Result<&Subscription> {
        let subscription = self.subscription_mut(id)?;
        subscription.status = status;
        subscription.version += 1;
        debug!(id, ?status, "subscription status changed");
        Ok(&*subscription)
    }

    pub fn pause(&mut self, id: &str) -> Result<&Subscription> {
        self.set_status(id, SubscriptionStatus::Paused)
    }

    pub fn resume(&mut self, id: &str) -> Result<&Subscription> {
        self.set_status(id, SubscriptionStatus::Active)
    }

    pub fn cancel(&mut self, id: &str) -> Result<&Subscription> {
        self.set_status(id, SubscriptionStatus::Cancelled)
    }

    /// Remove a subscription, returning whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn active(&self) -> Vec<&Subscription> {
        self.with_status(SubscriptionStatus::Active)
    }

    pub fn paused(&self) -> Vec<&Subscription> {
        self.with_status(SubscriptionStatus::Paused)
    }

    pub fn by_customer(&self, customer_id: &str) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .collect()
    }

    pub fn by_field(&self, field_id: &str) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|s| s.field_id == field_id)
            .collect()
    }

    /// Sum of the monthly rates of active subscriptions.
    pub fn total_monthly_revenue(&self) -> u64 {
        self.active()
            .iter()
            .map(|s| u64::from(s.monthly_rate))
            .sum()
    }

    fn with_status(&self, status: SubscriptionStatus) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|s| s.status == status)
            .collect()
    }

    fn subscription_mut(&mut self, id: &str) -> Result<&mut Subscription> {
        self.subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PitchError::NotFound(format!("subscription {id}")))
    }

    fn check_slot(&self, candidate: &Subscription) -> Result<()> {
        let taken = self.subscriptions.iter().find(|s| {
            s.id != candidate.id && s.status != SubscriptionStatus::Cancelled && s.overlaps(candidate)
        });
        match taken {
            Some(existing) => Err(PitchError::Conflict {
                candidate: candidate.id.clone(),
                existing: existing.id.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn validate_slot(start_hour: u32, duration_hours: u32) -> Result<()> {
    if duration_hours == 0 {
        return Err(PitchError::InvalidArgument(
            "subscription sessions must last at least one hour".to_string(),
        ));
    }
    match start_hour.checked_add(duration_hours) {
        Some(end) if end <= 24 => Ok(()),
        _ => Err(PitchError::InvalidArgument(format!(
            "session of {duration_hours} hours from {start_hour}:00 runs past midnight"
        ))),
    }
}
