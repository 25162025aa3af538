//! Encounter records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::dates::days_elapsed;

/// One hospital encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub encounter_id: u64,
    pub admitted_at: Option<NaiveDateTime>,
    pub discharged_at: Option<NaiveDateTime>,
    /// Patient type description, e.g. "Emergency" or "Inpatient"
    pub encounter_type: Option<String>,
    pub discharge_disposition: Option<String>,
    pub care_setting: Option<String>,
    pub payer: Option<String>,
}

impl EncounterRecord {
    #[must_use]
    pub fn new(encounter_id: u64) -> Self {
        Self {
            encounter_id,
            admitted_at: None,
            discharged_at: None,
            encounter_type: None,
            discharge_disposition: None,
            care_setting: None,
            payer: None,
        }
    }

    #[must_use]
    pub fn with_stay(mut self, admitted_at: NaiveDateTime, discharged_at: Option<NaiveDateTime>) -> Self {
        self.admitted_at = Some(admitted_at);
        self.discharged_at = discharged_at;
        self
    }

    #[must_use]
    pub fn with_type(mut self, encounter_type: &str) -> Self {
        self.encounter_type = Some(encounter_type.to_string());
        self
    }

    #[must_use]
    pub fn with_discharge_disposition(mut self, disposition: &str) -> Self {
        self.discharge_disposition = Some(disposition.to_string());
        self
    }

    #[must_use]
    pub fn with_care_setting(mut self, care_setting: &str) -> Self {
        self.care_setting = Some(care_setting.to_string());
        self
    }

    #[must_use]
    pub fn with_payer(mut self, payer: &str) -> Self {
        self.payer = Some(payer.to_string());
        self
    }

    /// Whole days between admission and discharge, if both are recorded
    #[must_use]
    pub fn recorded_stay_days(&self) -> Option<u32> {
        match (&self.admitted_at, &self.discharged_at) {
            (Some(admitted), Some(discharged)) => Some(days_elapsed(admitted, discharged)),
            _ => None,
        }
    }

    /// Length of stay in whole days, 0 when either date is missing
    #[must_use]
    pub fn length_of_stay_days(&self) -> u32 {
        self.recorded_stay_days().unwrap_or(0)
    }

    /// Case-insensitive check of the encounter type description
    #[must_use]
    pub fn type_contains(&self, needle: &str) -> bool {
        self.encounter_type
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&needle.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_length_of_stay() {
        let enc = EncounterRecord::new(1).with_stay(day(1), Some(day(4)));
        assert_eq!(enc.length_of_stay_days(), 3);
        assert_eq!(enc.recorded_stay_days(), Some(3));

        let open = EncounterRecord::new(2).with_stay(day(1), None);
        assert_eq!(open.length_of_stay_days(), 0);
        assert_eq!(open.recorded_stay_days(), None);
    }

    #[test]
    fn test_type_contains_is_case_insensitive() {
        let enc = EncounterRecord::new(1).with_type("EMERGENCY Department");
        assert!(enc.type_contains("emergency"));
        assert!(!enc.type_contains("inpatient"));
        assert!(!EncounterRecord::new(2).type_contains("emergency"));
    }
}
