//! Tests for venue settings: opening hours and JSON persistence.

use chrono::{NaiveDate, Weekday};
use pitch_engine::venue::{DayHours, VenueSettings};
use pitch_engine::PitchError;
use tempfile::tempdir;

#[test]
fn default_hours_are_longer_on_friday_and_saturday() {
    let venue = VenueSettings::default();

    // 2025-06-05 is a Thursday
    let thursday = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    let friday = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
    let saturday = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();

    assert_eq!(venue.hours_for(thursday), Some((8, 22)));
    assert_eq!(venue.hours_for(friday), Some((8, 23)));
    assert_eq!(venue.hours_for(saturday), Some((8, 23)));
}

#[test]
fn closed_day_has_no_hours() {
    let mut venue = VenueSettings::default();
    venue
        .set_day_hours(Weekday::Mon, DayHours::closed())
        .unwrap();

    let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    assert_eq!(venue.hours_for(monday), None);
}

#[test]
fn invalid_day_hours_are_rejected_and_not_applied() {
    let mut venue = VenueSettings::default();

    let err = venue
        .set_day_hours(Weekday::Tue, DayHours::new(22, 8))
        .unwrap_err();
    assert!(matches!(err, PitchError::InvalidConfiguration(_)));
    assert!(venue
        .set_day_hours(Weekday::Tue, DayHours::new(8, 25))
        .is_err());

    assert_eq!(venue.working_hours.tuesday, DayHours::new(8, 22));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("create temp dir");
    let loaded = VenueSettings::load(&dir.path().join("venue.json")).unwrap();
    assert_eq!(loaded, VenueSettings::default());
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("venue.json");

    let mut venue = VenueSettings::default();
    venue.name = "Marina Five".to_string();
    venue
        .set_day_hours(Weekday::Sun, DayHours::new(10, 20))
        .unwrap();
    venue.save(&path).unwrap();

    let loaded = VenueSettings::load(&path).unwrap();
    assert_eq!(loaded, venue);
}

#[test]
fn partial_file_keeps_default_hours() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("venue.json");
    std::fs::write(&path, r#"{"name": "Pitch Nine"}"#).unwrap();

    let loaded = VenueSettings::load(&path).unwrap();
    assert_eq!(loaded.name, "Pitch Nine");
    assert_eq!(loaded.working_hours, VenueSettings::default().working_hours);
}

#[test]
fn file_with_invalid_hours_is_rejected() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("venue.json");

    let mut venue = VenueSettings::default();
    venue.working_hours.friday = DayHours::new(23, 8);
    venue.save(&path).unwrap();

    assert!(matches!(
        VenueSettings::load(&path),
        Err(PitchError::InvalidConfiguration(_))
    ));
}

#[test]
fn malformed_file_is_a_json_error() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("venue.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(VenueSettings::load(&path), Err(PitchError::Json(_))));
}
