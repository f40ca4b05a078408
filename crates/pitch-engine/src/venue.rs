//! Venue settings: contact details and weekly opening hours.
//!
//! Settings persist as a JSON file. A missing file means "use the defaults".

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PitchError, Result};

/// Opening window for one weekday, `[open, close)` in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: u32,
    pub close: u32,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    pub const fn new(open: u32, close: u32) -> Self {
        Self {
            open,
            close,
            closed: false,
        }
    }

    pub const fn closed() -> Self {
        Self {
            open: 0,
            close: 0,
            closed: true,
        }
    }

    fn validate(&self, day: Weekday) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.open >= self.close || self.close > 24 {
            return Err(PitchError::InvalidConfiguration(format!(
                "{day}: opening hours {}-{} are not a valid window",
                self.open, self.close
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for WorkingHours {
    fn default() -> Self {
        let weekday = DayHours::new(8, 22);
        let weekend = DayHours::new(8, 23);
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekend,
            saturday: weekend,
            sunday: weekday,
        }
    }
}

impl WorkingHours {
    pub fn day(&self, day: Weekday) -> &DayHours {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn day_mut(&mut self, day: Weekday) -> &mut DayHours {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VenueSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub working_hours: WorkingHours,
}

impl Default for VenueSettings {
    fn default() -> Self {
        Self {
            name: "BookMyPitch Arena".to_string(),
            address: "Dubai Sports City, UAE".to_string(),
            phone: String::new(),
            email: "info@bookmypitch.com".to_string(),
            description: "Premium football field rental facility".to_string(),
            working_hours: WorkingHours::default(),
        }
    }
}

impl VenueSettings {
    /// Opening window on `date`, or `None` if the venue is closed that day.
    pub fn hours_for(&self, date: NaiveDate) -> Option<(u32, u32)> {
        let hours = self.working_hours.day(date.weekday());
        (!hours.closed).then_some((hours.open, hours.close))
    }

    /// Replace the opening hours of one weekday.
    ///
    /// # Errors
    /// Returns `PitchError::InvalidConfiguration` if `hours` is not a valid window;
    /// the settings are left unchanged.
    pub fn set_day_hours(&mut self, day: Weekday, hours: DayHours) -> Result<()> {
        hours.validate(day)?;
        *self.working_hours.day_mut(day) = hours;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            self.working_hours.day(day).validate(day)?;
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults if it does not exist.
    ///
    /// # Errors
    /// Returns `PitchError::Io` if the file exists but cannot be read,
    /// `PitchError::Json` if it is not valid settings JSON, and
    /// `PitchError::InvalidConfiguration` if its opening hours are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no venue settings file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let settings: VenueSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        debug!(path = %path.display(), venue = %settings.name, "loaded venue settings");
        Ok(settings)
    }

    /// Write settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), "saved venue settings");
        Ok(())
    }
}
