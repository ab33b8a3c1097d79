//! Row types produced by the report decoders
//!
//! Every report decodes into a sequence of one of these immutable value
//! records. Rows carry no identity beyond field equality and are never
//! mutated after construction.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Per-report rows
// ============================================================================

/// Daily first/second dose administration counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationByDayRow {
    /// Calendar day (UTC)
    pub date: NaiveDateTime,
    /// People who received at least one dose
    pub first_dose: i64,
    /// People fully vaccinated
    pub second_dose: i64,
}

/// Vaccination coverage for one age group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationByAgeRow {
    /// Age group label, e.g. "90+"
    pub age_group: String,
    pub count_first: i64,
    pub count_second: i64,
    /// Fraction of the group with a first dose, in `0..=1`
    pub share_first: f64,
    /// Fraction of the group fully vaccinated, in `0..=1`
    pub share_second: f64,
}

/// Cumulative supplied/used doses for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineSupplyUsage {
    pub date: NaiveDateTime,
    pub supplied: i64,
    pub used: i64,
}

/// Vaccination coverage for one administrative region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationByRegionRow {
    pub region: String,
    pub count_first: i64,
    pub count_second: i64,
    pub share_first: f64,
    pub share_second: f64,
}

/// One manufacturer supply event
///
/// Exactly one of the manufacturer fields is populated per row; the others
/// are `None`, never zero. Several rows may share a date (one per
/// manufacturer event on that day), so callers needing per-date totals must
/// aggregate themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationByManufacturerRow {
    pub date: NaiveDateTime,
    pub pfizer: Option<i64>,
    pub moderna: Option<i64>,
    pub az: Option<i64>,
}

/// One point of a per-age-range dose time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationDose {
    pub date: NaiveDateTime,
    pub dose: i64,
}

/// Paired dose time series for one age range
///
/// `dose1` is at least as long as `dose2`: second-dose rollout lags the
/// first within a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationByAgeRange {
    pub dose1: Vec<VaccinationDose>,
    pub dose2: Vec<VaccinationDose>,
}

// ============================================================================
// Manufacturer
// ============================================================================

/// Vaccine manufacturers tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manufacturer {
    Pfizer,
    Moderna,
    AstraZeneca,
}

impl Manufacturer {
    /// Map a supply-report dictionary index to a manufacturer.
    ///
    /// Any index outside the known set means the upstream schema grew a
    /// manufacturer this decoder does not map yet.
    pub fn from_supply_index(index: i64) -> Result<Self> {
        match index {
            0 => Ok(Self::Pfizer),
            1 => Ok(Self::Moderna),
            2 => Ok(Self::AstraZeneca),
            other => Err(Error::unknown_manufacturer(other)),
        }
    }

    /// Build a supply row with only this manufacturer's field populated
    pub fn supply_row(self, date: NaiveDateTime, value: i64) -> VaccinationByManufacturerRow {
        let mut row = VaccinationByManufacturerRow {
            date,
            pfizer: None,
            moderna: None,
            az: None,
        };
        match self {
            Self::Pfizer => row.pfizer = Some(value),
            Self::Moderna => row.moderna = Some(value),
            Self::AstraZeneca => row.az = Some(value),
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn day(millis: i64) -> NaiveDateTime {
        DateTime::from_timestamp_millis(millis).unwrap().naive_utc()
    }

    #[test]
    fn test_manufacturer_from_supply_index() {
        assert_eq!(
            Manufacturer::from_supply_index(0).unwrap(),
            Manufacturer::Pfizer
        );
        assert_eq!(
            Manufacturer::from_supply_index(1).unwrap(),
            Manufacturer::Moderna
        );
        assert_eq!(
            Manufacturer::from_supply_index(2).unwrap(),
            Manufacturer::AstraZeneca
        );
        assert!(matches!(
            Manufacturer::from_supply_index(3),
            Err(Error::UnknownManufacturer { index: 3 })
        ));
    }

    #[test]
    fn test_supply_row_populates_single_field() {
        let date = day(1_609_286_400_000);
        let row = Manufacturer::Moderna.supply_row(date, 8400);
        assert_eq!(row.moderna, Some(8400));
        assert_eq!(row.pfizer, None);
        assert_eq!(row.az, None);
        assert_eq!(row.date, date);
    }
}
