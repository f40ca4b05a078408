//! # pitch-engine
//!
//! Conflict-free booking scheduler for a sports-field rental venue.
//!
//! Fields are physically exclusive: two bookings on the same field and date
//! must never overlap. The engine provides the overlap rule, a rejection-sampling
//! schedule synthesizer built on it, and the small ledger, registry and settings
//! types a dashboard needs to create bookings against the same rule.
//!
//! ## Modules
//!
//! - [`model`] — `Field`, `Booking` and their status enums
//! - [`conflict`] — Half-open interval conflict detection between bookings
//! - [`policy`] — Tunable demand distributions for synthesis
//! - [`synthesizer`] — Randomized, conflict-free schedule generation
//! - [`freebusy`] — Free hour slots on a field for a day
//! - [`ledger`] — Validated booking creation, status transitions and queries
//! - [`registry`] — The venue's fields and their maintenance windows
//! - [`subscription`] — Recurring weekly, bi-weekly and monthly reservations
//! - [`venue`] — Venue settings and weekly opening hours
//! - [`error`] — Error types

pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod ledger;
pub mod model;
pub mod policy;
pub mod registry;
pub mod subscription;
pub mod synthesizer;
pub mod venue;

pub use conflict::{conflicts, find_conflicts, try_conflicts};
pub use error::PitchError;
pub use freebusy::find_free_slots;
pub use ledger::{BookingLedger, DailyRevenue};
pub use model::{
    Booking, BookingStatus, Field, FieldStatus, FieldType, MaintenanceWindow, PaymentStatus,
};
pub use policy::SynthesisPolicy;
pub use registry::FieldRegistry;
pub use subscription::{Subscription, SubscriptionBook, SubscriptionStatus};
pub use synthesizer::{synthesize, synthesize_with_report, SynthesisReport};
pub use venue::VenueSettings;
