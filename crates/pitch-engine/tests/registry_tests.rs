//! Tests for the field registry.

use chrono::NaiveDate;
use pitch_engine::model::{Field, FieldStatus, FieldType, MaintenanceWindow};
use pitch_engine::{FieldRegistry, PitchError};

#[test]
fn reference_registry_has_three_fields() {
    let registry = FieldRegistry::reference();

    assert_eq!(registry.all().len(), 3);
    assert_eq!(registry.get("FLD-1").unwrap().hourly_rate, 350);
    assert_eq!(registry.get("FLD-2").unwrap().hourly_rate, 350);
    assert_eq!(registry.get("FLD-3").unwrap().hourly_rate, 500);
    assert_eq!(
        registry.get("FLD-3").unwrap().field_type,
        FieldType::ElevenASide
    );
}

#[test]
fn status_changes_affect_bookable_and_active_views() {
    let mut registry = FieldRegistry::reference();
    registry
        .set_status("FLD-1", FieldStatus::Maintenance)
        .unwrap();
    registry
        .set_status("FLD-2", FieldStatus::Unavailable)
        .unwrap();

    let bookable: Vec<String> = registry.bookable().into_iter().map(|f| f.id).collect();
    assert_eq!(bookable, vec!["FLD-3"]);
    assert_eq!(registry.active().len(), 2);
    assert_eq!(registry.under_maintenance().len(), 1);
}

#[test]
fn grouped_by_type() {
    let registry = FieldRegistry::reference();
    let grouped = registry.by_type();

    assert_eq!(grouped[&FieldType::FiveASide].len(), 2);
    assert_eq!(grouped[&FieldType::ElevenASide].len(), 1);
}

#[test]
fn insert_rejects_duplicate_and_empty_ids() {
    let mut registry = FieldRegistry::reference();

    let dup = Field::new("FLD-1", "Copy", FieldType::FiveASide, 300);
    assert!(matches!(
        registry.insert(dup),
        Err(PitchError::InvalidArgument(_))
    ));

    let unnamed = Field::new("", "Nameless", FieldType::FiveASide, 300);
    assert!(registry.insert(unnamed).is_err());

    let fresh = Field::new("FLD-4", "7v7 #1", FieldType::FiveASide, 400);
    registry.insert(fresh).unwrap();
    assert_eq!(registry.all().len(), 4);
}

#[test]
fn rate_update_and_removal() {
    let mut registry = FieldRegistry::reference();

    assert_eq!(registry.set_hourly_rate("FLD-3", 550).unwrap().hourly_rate, 550);
    assert!(matches!(
        registry.set_hourly_rate("FLD-9", 1),
        Err(PitchError::NotFound(_))
    ));

    assert!(registry.remove("FLD-2"));
    assert!(!registry.remove("FLD-2"));
    assert!(registry.get("FLD-2").is_none());
}

#[test]
fn field_json_uses_dashboard_names() {
    let field = &Field::reference_set()[2];
    let json = serde_json::to_value(field).unwrap();

    assert_eq!(json["type"], "11v11");
    assert_eq!(json["hourlyRate"], 500);
    assert_eq!(json["status"], "available");
    assert_eq!(json["surfaceType"], "Artificial Grass");
    assert_eq!(json["maintenanceSchedule"], serde_json::json!([]));
}

#[test]
fn dashboard_field_json_deserializes() {
    let json = r#"{
        "id": "FLD-9",
        "name": "Futsal",
        "type": "5v5",
        "hourlyRate": 300,
        "status": "maintenance",
        "surfaceType": "Parquet",
        "maintenanceSchedule": [
            {"date": "2025-06-03", "startHour": 8, "endHour": 12, "reason": "Resurfacing"}
        ]
    }"#;

    let field: Field = serde_json::from_str(json).unwrap();

    assert_eq!(field.surface, "Parquet");
    assert_eq!(field.status, FieldStatus::Maintenance);
    assert_eq!(field.maintenance_schedule.len(), 1);
    assert_eq!(field.maintenance_schedule[0].end_hour, 12);
}

#[test]
fn maintenance_windows_are_appended_and_validated() {
    let mut registry = FieldRegistry::reference();
    let day = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

    let field = registry
        .add_maintenance_window("FLD-1", MaintenanceWindow::new(day, 8, 12, "Line painting"))
        .unwrap();
    assert_eq!(field.maintenance_schedule.len(), 1);
    assert!(field.maintenance_during(day, 11, 13).is_some());
    assert!(field.maintenance_during(day, 12, 14).is_none());

    assert!(matches!(
        registry.add_maintenance_window("FLD-1", MaintenanceWindow::new(day, 12, 12, "")),
        Err(PitchError::InvalidArgument(_))
    ));
    assert!(matches!(
        registry.add_maintenance_window("FLD-1", MaintenanceWindow::new(day, 20, 25, "")),
        Err(PitchError::InvalidArgument(_))
    ));
    assert!(matches!(
        registry.add_maintenance_window("FLD-9", MaintenanceWindow::new(day, 8, 9, "")),
        Err(PitchError::NotFound(_))
    ));
}
