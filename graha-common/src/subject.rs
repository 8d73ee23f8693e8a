//! Subject birth parameters
//!
//! **[COM-SUB-010]** Validated birth data for one report subject. Validation
//! runs before the report pipeline is invoked; the pipeline itself assumes
//! parameters are in range.

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Subject gender (used by the provider for gender-specific rules)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Birth parameters for one report subject
///
/// Coordinates are decimal degrees; the UTC offset is in hours and admits
/// half- and quarter-hour zones (e.g. 5.5 for IST, 5.75 for Nepal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectParams {
    /// Display name (also used for the artifact filename)
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub birth_time: NaiveTime,
    /// Valid range: [-90.0, 90.0] degrees
    pub latitude: f64,
    /// Valid range: [-180.0, 180.0] degrees
    pub longitude: f64,
    /// Valid range: [-12.0, 14.0] hours
    pub tz_offset_hours: f64,
    /// Birth place display string (not used for computation)
    pub place: String,
}

impl SubjectParams {
    /// Validate all fields are present and in range
    ///
    /// **[COM-SUB-020]** Rejects out-of-range coordinates and offsets before
    /// any provider call is made.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("subject name is required".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude out of range [-90, 90]: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude out of range [-180, 180]: {}",
                self.longitude
            )));
        }
        if !(-12.0..=14.0).contains(&self.tz_offset_hours) {
            return Err(Error::InvalidInput(format!(
                "timezone offset out of range [-12, 14]: {}",
                self.tz_offset_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> SubjectParams {
        SubjectParams {
            name: "Asha Sharma".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1992, 3, 14).unwrap(),
            birth_time: NaiveTime::from_hms_opt(6, 45, 0).unwrap(),
            latitude: 28.6139,
            longitude: 77.2090,
            tz_offset_hours: 5.5,
            place: "New Delhi".to_string(),
        }
    }

    #[test]
    fn test_valid_subject() {
        assert!(subject().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut s = subject();
        s.name = "  ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut s = subject();
        s.latitude = 95.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        let mut s = subject();
        s.longitude = -181.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_tz_offset_out_of_range() {
        let mut s = subject();
        s.tz_offset_hours = 15.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_quarter_hour_offset_accepted() {
        let mut s = subject();
        s.tz_offset_hours = 5.75;
        assert!(s.validate().is_ok());
    }
}
