//! WASM bindings for pitch-engine.
//!
//! Exposes conflict detection, schedule synthesis, and free-slot computation to
//! the browser dashboard via `wasm-bindgen`. All complex types are passed as
//! JSON strings using the same camelCase layout the dashboard stores use.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p pitch-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/pitch-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/pitch_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use pitch_engine::model::{Booking, Field};
use pitch_engine::SynthesisPolicy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto {
    booking_a: String,
    booking_b: String,
    field_id: String,
    date: NaiveDate,
    overlap_hours: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisDto {
    bookings: Vec<Booking>,
    attempts: usize,
    closing_rejections: usize,
    conflict_rejections: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn parse_booking(json: &str) -> Result<Booking, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error("Invalid booking JSON", e))
}

fn parse_bookings(json: &str) -> Result<Vec<Booking>, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error("Invalid bookings JSON", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    s.parse()
        .map_err(|e| js_error(&format!("Invalid date '{}'", s), e))
}

/// Parse an RFC 3339 timestamp; a bare date is taken as noon UTC.
fn parse_now(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = parse_date(s)?;
    date.and_hms_opt(12, 0, 0)
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| JsValue::from_str(&format!("Invalid date '{}'", s)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Whether two bookings (JSON objects) occupy the same field on the same date
/// with overlapping hours.
///
/// Fails if either booking has a zero duration or no field reference.
#[wasm_bindgen(js_name = "bookingsConflict")]
pub fn bookings_conflict(booking_a_json: &str, booking_b_json: &str) -> Result<bool, JsValue> {
    let a = parse_booking(booking_a_json)?;
    let b = parse_booking(booking_b_json)?;

    pitch_engine::try_conflicts(&a, &b).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Find every conflicting pair in a JSON array of bookings.
///
/// Returns a JSON array of `{bookingA, bookingB, fieldId, date, overlapHours}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(bookings_json: &str) -> Result<String, JsValue> {
    let bookings = parse_bookings(bookings_json)?;

    let dtos: Vec<ConflictDto> = pitch_engine::find_conflicts(&bookings)
        .into_iter()
        .map(|c| ConflictDto {
            booking_a: c.booking_a.id,
            booking_b: c.booking_b.id,
            field_id: c.booking_a.field_id,
            date: c.booking_a.date,
            overlap_hours: c.overlap_hours,
        })
        .collect();

    to_json(&dtos)
}

/// Generate a conflict-free demonstration schedule.
///
/// # Arguments
/// - `target_count` -- Number of bookings to aim for
/// - `seed` -- Random seed; the same seed and inputs give the same schedule
/// - `now` -- Anchor for the rolling date window (RFC 3339 or `YYYY-MM-DD`)
/// - `fields_json` -- Optional JSON array of fields (defaults to the venue's three)
/// - `policy_json` -- Optional synthesis policy JSON (missing keys use defaults)
///
/// Returns `{bookings, attempts, closingRejections, conflictRejections}` as JSON.
#[wasm_bindgen(js_name = "synthesizeBookings")]
pub fn synthesize_bookings(
    target_count: u32,
    seed: u64,
    now: &str,
    fields_json: Option<String>,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let now = parse_now(now)?;
    let fields: Vec<Field> = match fields_json {
        Some(json) => {
            serde_json::from_str(&json).map_err(|e| js_error("Invalid fields JSON", e))?
        }
        None => Field::reference_set(),
    };
    let policy = match policy_json {
        Some(json) => {
            SynthesisPolicy::from_json(&json).map_err(|e| js_error("Invalid policy", e))?
        }
        None => SynthesisPolicy::default(),
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let report = pitch_engine::synthesize_with_report(
        target_count as usize,
        &fields,
        &policy,
        now,
        &mut rng,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_json(&SynthesisDto {
        bookings: report.bookings,
        attempts: report.attempts,
        closing_rejections: report.closing_rejections,
        conflict_rejections: report.conflict_rejections,
    })
}

/// Free hour slots for one field on one date within `[open_hour, close_hour)`.
///
/// Returns a JSON array of `{startHour, endHour, durationHours}`.
#[wasm_bindgen(js_name = "findFreeSlots")]
pub fn find_free_slots(
    bookings_json: &str,
    field_id: &str,
    date: &str,
    open_hour: u32,
    close_hour: u32,
) -> Result<String, JsValue> {
    let bookings = parse_bookings(bookings_json)?;
    let date = parse_date(date)?;

    let slots = pitch_engine::find_free_slots(&bookings, field_id, date, open_hour, close_hour);

    to_json(&slots)
}
