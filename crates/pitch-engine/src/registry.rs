//! The venue's set of fields.

use std::collections::BTreeMap;

use crate::error::{PitchError, Result};
use crate::model::{Field, FieldStatus, FieldType, MaintenanceWindow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Registry holding [`Field::reference_set`].
    pub fn reference() -> Self {
        Self::new(Field::reference_set())
    }

    pub fn all(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Add a field.
    ///
    /// # Errors
    /// Returns `PitchError::InvalidArgument` if the id is empty or already taken.
    pub fn insert(&mut self, field: Field) -> Result<()> {
        if field.id.is_empty() {
            return Err(PitchError::InvalidArgument(
                "field id must not be empty".to_string(),
            ));
        }
        if self.get(&field.id).is_some() {
            return Err(PitchError::InvalidArgument(format!(
                "field {} already exists",
                field.id
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn set_status(&mut self, id: &str, status: FieldStatus) -> Result<&Field> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PitchError::NotFound(format!("field {id}")))?;
        field.status = status;
        Ok(&*field)
    }

    pub fn set_hourly_rate(&mut self, id: &str, hourly_rate: u32) -> Result<&Field> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PitchError::NotFound(format!("field {id}")))?;
        field.hourly_rate = hourly_rate;
        Ok(&*field)
    }

    /// Schedule a maintenance closure on a field.
    ///
    /// # Errors
    /// - `PitchError::InvalidArgument` unless `start_hour < end_hour <= 24`.
    /// - `PitchError::NotFound` for an unknown field id.
    pub fn add_maintenance_window(
        &mut self,
        id: &str,
        window: MaintenanceWindow,
    ) -> Result<&Field> {
        if window.start_hour >= window.end_hour || window.end_hour > 24 {
            return Err(PitchError::InvalidArgument(format!(
                "maintenance window {}:00-{}:00 is not a valid range of hours",
                window.start_hour, window.end_hour
            )));
        }
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PitchError::NotFound(format!("field {id}")))?;
        field.maintenance_schedule.push(window);
        Ok(&*field)
    }

    /// Remove a field, returning whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        self.fields.len() != before
    }

    /// Fields that can take new bookings right now.
    pub fn bookable(&self) -> Vec<Field> {
        self.fields.iter().filter(|f| f.is_bookable()).cloned().collect()
    }

    /// Fields not permanently out of service.
    pub fn active(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.status != FieldStatus::Unavailable)
            .collect()
    }

    pub fn under_maintenance(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.status == FieldStatus::Maintenance)
            .collect()
    }

    pub fn by_type(&self) -> BTreeMap<FieldType, Vec<&Field>> {
        let mut grouped: BTreeMap<FieldType, Vec<&Field>> = BTreeMap::new();
        for field in &self.fields {
            grouped.entry(field.field_type).or_default().push(field);
        }
        grouped
    }
}
