//! Domain records: bookable fields and the bookings made against them.
//!
//! Records are plain owned data. A [`Booking`] accepted into a schedule only
//! changes through its setters, each of which bumps [`Booking::version`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Capacity class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "5v5")]
    FiveASide,
    #[serde(rename = "11v11")]
    ElevenASide,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::FiveASide => "5v5",
            FieldType::ElevenASide => "11v11",
        }
    }
}

/// Operational status of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    #[default]
    Available,
    Maintenance,
    Unavailable,
}

/// A bookable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Price of one hour, in whole currency units.
    pub hourly_rate: u32,
    #[serde(default)]
    pub status: FieldStatus,
    #[serde(default)]
    pub size: String,
    #[serde(default, rename = "surfaceType")]
    pub surface: String,
    #[serde(default)]
    pub lighting: bool,
    #[serde(default)]
    pub covered: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Planned closures of this field, in the order they were scheduled.
    #[serde(default)]
    pub maintenance_schedule: Vec<MaintenanceWindow>,
}

impl Field {
    pub fn new(id: &str, name: &str, field_type: FieldType, hourly_rate: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            field_type,
            hourly_rate,
            status: FieldStatus::Available,
            size: String::new(),
            surface: String::new(),
            lighting: false,
            covered: false,
            amenities: Vec::new(),
            maintenance_schedule: Vec::new(),
        }
    }

    /// The venue's three fields: two small-sided pitches and one full-sided pitch.
    pub fn reference_set() -> Vec<Field> {
        let amenities = |extra: &[&str]| {
            ["Changing Rooms", "Parking", "WiFi"]
                .iter()
                .chain(extra)
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        };
        let outfit = |mut field: Field, size: &str, extra: &[&str]| {
            field.size = size.to_string();
            field.surface = "Artificial Grass".to_string();
            field.lighting = true;
            field.amenities = amenities(extra);
            field
        };

        vec![
            outfit(Field::new("FLD-1", "5v5 #1", FieldType::FiveASide, 350), "30x20m", &[]),
            outfit(Field::new("FLD-2", "5v5 #2", FieldType::FiveASide, 350), "30x20m", &[]),
            outfit(
                Field::new("FLD-3", "11v11 #1", FieldType::ElevenASide, 500),
                "100x64m",
                &["Seating Area"],
            ),
        ]
    }

    pub fn is_bookable(&self) -> bool {
        self.status == FieldStatus::Available
    }

    /// Price of a booking of `duration_hours` on this field.
    pub fn price_for(&self, duration_hours: u32) -> u32 {
        duration_hours.saturating_mul(self.hourly_rate)
    }

    /// The first maintenance window on `date` overlapping `[start_hour, end_hour)`.
    pub fn maintenance_during(
        &self,
        date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
    ) -> Option<&MaintenanceWindow> {
        self.maintenance_schedule
            .iter()
            .find(|w| w.date == date && w.start_hour < end_hour && start_hour < w.end_hour)
    }
}

/// A planned closure of one field for `[start_hour, end_hour)` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    pub date: NaiveDate,
    pub start_hour: u32,
    pub end_hour: u32,
    #[serde(default)]
    pub reason: String,
}

impl MaintenanceWindow {
    pub fn new(date: NaiveDate, start_hour: u32, end_hour: u32, reason: &str) -> Self {
        Self {
            date,
            start_hour,
            end_hour,
            reason: reason.to_string(),
        }
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Confirmed,
        BookingStatus::Pending,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::Wallet,
    ];
}

/// A reservation of one field for a contiguous block of whole hours on one day.
///
/// The occupied interval is half-open: `[start_hour, start_hour + duration_hours)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub field_id: String,
    pub field_name: String,
    pub date: NaiveDate,
    pub start_hour: u32,
    pub duration_hours: u32,
    pub price: u32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Incremented by every setter. Starts at 1.
    #[serde(default = "initial_version")]
    pub version: u32,
}

fn initial_version() -> u32 {
    1
}

impl Booking {
    /// Exclusive end of the occupied interval.
    ///
    /// Widened to `u64` so that any `u32` duration has an exact end.
    pub fn end_hour(&self) -> u64 {
        u64::from(self.start_hour) + u64::from(self.duration_hours)
    }

    pub fn is_subscription(&self) -> bool {
        self.subscription_id.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.version += 1;
    }

    pub fn set_payment_status(&mut self, payment_status: PaymentStatus) {
        self.payment_status = payment_status;
        self.version += 1;
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
        self.version += 1;
    }
}

/// The caller-supplied part of a new booking; the ledger fills in the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub field_id: String,
    pub date: NaiveDate,
    pub start_hour: u32,
    pub duration_hours: u32,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
}
