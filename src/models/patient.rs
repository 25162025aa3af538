//! Patient demographics

use serde::{Deserialize, Serialize};

use crate::utils::coalesce::{CoalesceText, count_or_zero};

/// Demographic record for one patient
///
/// Fields mirror the source encounter table and may be absent; the accessor
/// methods apply the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDemographics {
    pub patient_id: u64,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub marital_status: Option<String>,
    pub total_encounters: Option<u32>,
}

impl PatientDemographics {
    /// An all-default record, used when the source has no demographics row
    #[must_use]
    pub fn unknown(patient_id: u64) -> Self {
        Self {
            patient_id,
            age: None,
            gender: None,
            race: None,
            marital_status: None,
            total_encounters: None,
        }
    }

    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    #[must_use]
    pub fn with_race(mut self, race: &str) -> Self {
        self.race = Some(race.to_string());
        self
    }

    #[must_use]
    pub fn with_marital_status(mut self, marital_status: &str) -> Self {
        self.marital_status = Some(marital_status.to_string());
        self
    }

    #[must_use]
    pub fn with_total_encounters(mut self, total: u32) -> Self {
        self.total_encounters = Some(total);
        self
    }

    /// Age in years, 0 when unknown
    #[must_use]
    pub fn age(&self) -> u32 {
        count_or_zero(self.age)
    }

    #[must_use]
    pub fn gender(&self) -> String {
        (&self.gender).or_unknown()
    }

    #[must_use]
    pub fn race(&self) -> String {
        (&self.race).or_unknown()
    }

    #[must_use]
    pub fn marital_status(&self) -> String {
        (&self.marital_status).or_unknown()
    }

    #[must_use]
    pub fn total_encounters(&self) -> u32 {
        count_or_zero(self.total_encounters)
    }
}
